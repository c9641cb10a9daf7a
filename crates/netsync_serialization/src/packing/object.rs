//! # Runtime-Typed Packing
//!
//! The object path: values whose type is only known at runtime travel as a
//! [`PackedValue`] next to a [`TypeTag`]. The wire bytes are exactly the
//! ones the typed path produces, so a message written through one path can
//! be read through the other.

use netsync_shared::{Color, Color32, Quaternion, Ray, Ray2D, Vec2, Vec3, Vec4};

use super::dispatch::{EnumBacking, Packable, PackedEnum};
use crate::buffer::{BufferReader, BufferWriter};
use crate::error::{SerializationError, SerializationResult};

/// Backing integer of an enum on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnumRepr {
    /// `u8`
    U8,
    /// `i8`
    I8,
    /// `u16`
    U16,
    /// `i16`
    I16,
    /// `u32`
    U32,
    /// `i32`
    I32,
    /// `u64`
    U64,
    /// `i64`
    I64,
}

impl EnumRepr {
    /// Width of the backing integer in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 | Self::I8 => 8,
            Self::U16 | Self::I16 => 16,
            Self::U32 | Self::I32 => 32,
            Self::U64 | Self::I64 => 64,
        }
    }

    /// True for the signed backings.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    fn write_value(self, writer: &mut BufferWriter, value: i128) -> SerializationResult<()> {
        let overflow = |_| SerializationError::DomainOverflow {
            bits: i128_bit_length(value),
            max_bits: self.bits(),
        };
        match self {
            Self::U8 => u8::try_from(value).map_err(overflow)?.write_packed(writer),
            Self::I8 => i8::try_from(value).map_err(overflow)?.write_packed(writer),
            Self::U16 => u16::try_from(value).map_err(overflow)?.write_packed(writer),
            Self::I16 => i16::try_from(value).map_err(overflow)?.write_packed(writer),
            Self::U32 => u32::try_from(value).map_err(overflow)?.write_packed(writer),
            Self::I32 => i32::try_from(value).map_err(overflow)?.write_packed(writer),
            Self::U64 => u64::try_from(value).map_err(overflow)?.write_packed(writer),
            Self::I64 => i64::try_from(value).map_err(overflow)?.write_packed(writer),
        }
    }

    fn read_value(self, reader: &mut BufferReader<'_>) -> SerializationResult<i128> {
        Ok(match self {
            Self::U8 => u8::read_packed(reader)?.into(),
            Self::I8 => i8::read_packed(reader)?.into(),
            Self::U16 => u16::read_packed(reader)?.into(),
            Self::I16 => i16::read_packed(reader)?.into(),
            Self::U32 => u32::read_packed(reader)?.into(),
            Self::I32 => i32::read_packed(reader)?.into(),
            Self::U64 => u64::read_packed(reader)?.into(),
            Self::I64 => i64::read_packed(reader)?.into(),
        })
    }
}

fn i128_bit_length(value: i128) -> u32 {
    i128::BITS - value.unsigned_abs().leading_zeros()
}

/// Names one of the packable types at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum TypeTag {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Bool,
    Char,
    F32,
    F64,
    /// Enum carried by the given backing integer.
    Enum(EnumRepr),
    Vec2,
    Vec3,
    Vec4,
    Quaternion,
    Color,
    Color32,
    Ray,
    Ray2D,
}

/// A value of any packable type, tagged with what it is.
#[derive(Clone, Copy, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum PackedValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Bool(bool),
    Char(char),
    F32(f32),
    F64(f64),
    /// An enum by its backing integer.
    Enum { repr: EnumRepr, value: i128 },
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Quaternion(Quaternion),
    Color(Color),
    Color32(Color32),
    Ray(Ray),
    Ray2D(Ray2D),
}

impl PackedValue {
    /// Tag describing this value.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        match self {
            Self::U8(_) => TypeTag::U8,
            Self::I8(_) => TypeTag::I8,
            Self::U16(_) => TypeTag::U16,
            Self::I16(_) => TypeTag::I16,
            Self::U32(_) => TypeTag::U32,
            Self::I32(_) => TypeTag::I32,
            Self::U64(_) => TypeTag::U64,
            Self::I64(_) => TypeTag::I64,
            Self::Bool(_) => TypeTag::Bool,
            Self::Char(_) => TypeTag::Char,
            Self::F32(_) => TypeTag::F32,
            Self::F64(_) => TypeTag::F64,
            Self::Enum { repr, .. } => TypeTag::Enum(*repr),
            Self::Vec2(_) => TypeTag::Vec2,
            Self::Vec3(_) => TypeTag::Vec3,
            Self::Vec4(_) => TypeTag::Vec4,
            Self::Quaternion(_) => TypeTag::Quaternion,
            Self::Color(_) => TypeTag::Color,
            Self::Color32(_) => TypeTag::Color32,
            Self::Ray(_) => TypeTag::Ray,
            Self::Ray2D(_) => TypeTag::Ray2D,
        }
    }

    /// Wraps an enum value.
    #[must_use]
    pub fn from_enum<E: PackedEnum>(value: E) -> Self {
        Self::Enum {
            repr: <E::Repr as EnumBacking>::REPR,
            value: value.to_repr().into(),
        }
    }

    /// Unwraps an enum value of type `E`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::TypeMismatch`] if this is not an enum
    /// with `E`'s backing, and [`SerializationError::InvalidEnumValue`] if
    /// no variant of `E` has this value.
    pub fn into_enum<E: PackedEnum>(self) -> SerializationResult<E> {
        let expected = TypeTag::Enum(<E::Repr as EnumBacking>::REPR);
        let Self::Enum { repr, value } = self else {
            return Err(SerializationError::TypeMismatch {
                expected,
                actual: self.type_tag(),
            });
        };
        if TypeTag::Enum(repr) != expected {
            return Err(SerializationError::TypeMismatch {
                expected,
                actual: TypeTag::Enum(repr),
            });
        }
        <E::Repr as TryFrom<i128>>::try_from(value)
            .ok()
            .and_then(E::from_repr)
            .ok_or(SerializationError::InvalidEnumValue { value })
    }
}

macro_rules! impl_packed_value_conversions {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl From<$ty> for PackedValue {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }

        impl TryFrom<PackedValue> for $ty {
            type Error = SerializationError;

            fn try_from(value: PackedValue) -> SerializationResult<Self> {
                match value {
                    PackedValue::$variant(inner) => Ok(inner),
                    other => Err(SerializationError::TypeMismatch {
                        expected: TypeTag::$variant,
                        actual: other.type_tag(),
                    }),
                }
            }
        }
    )+};
}

impl_packed_value_conversions! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    bool => Bool,
    char => Char,
    f32 => F32,
    f64 => F64,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Quaternion => Quaternion,
    Color => Color,
    Color32 => Color32,
    Ray => Ray,
    Ray2D => Ray2D,
}

/// Writes `value`, checking it against the declared `tag`.
///
/// # Errors
///
/// Returns [`SerializationError::TypeMismatch`] if `value` is not of type
/// `tag`, and otherwise whatever the typed write for `tag` returns.
pub fn write_object_packed(
    writer: &mut BufferWriter,
    value: &PackedValue,
    tag: TypeTag,
) -> SerializationResult<()> {
    let actual = value.type_tag();
    if actual != tag {
        tracing::debug!(?tag, ?actual, "Rejected object write with mismatched tag");
        return Err(SerializationError::TypeMismatch {
            expected: tag,
            actual,
        });
    }

    match *value {
        PackedValue::U8(v) => v.write_packed(writer),
        PackedValue::I8(v) => v.write_packed(writer),
        PackedValue::U16(v) => v.write_packed(writer),
        PackedValue::I16(v) => v.write_packed(writer),
        PackedValue::U32(v) => v.write_packed(writer),
        PackedValue::I32(v) => v.write_packed(writer),
        PackedValue::U64(v) => v.write_packed(writer),
        PackedValue::I64(v) => v.write_packed(writer),
        PackedValue::Bool(v) => v.write_packed(writer),
        PackedValue::Char(v) => v.write_packed(writer),
        PackedValue::F32(v) => v.write_packed(writer),
        PackedValue::F64(v) => v.write_packed(writer),
        PackedValue::Enum { repr, value } => repr.write_value(writer, value),
        PackedValue::Vec2(v) => v.write_packed(writer),
        PackedValue::Vec3(v) => v.write_packed(writer),
        PackedValue::Vec4(v) => v.write_packed(writer),
        PackedValue::Quaternion(v) => v.write_packed(writer),
        PackedValue::Color(v) => v.write_packed(writer),
        PackedValue::Color32(v) => v.write_packed(writer),
        PackedValue::Ray(v) => v.write_packed(writer),
        PackedValue::Ray2D(v) => v.write_packed(writer),
    }
}

/// Reads a value of the type named by `tag`.
///
/// # Errors
///
/// Whatever the typed read for `tag` returns.
pub fn read_object_packed(
    reader: &mut BufferReader<'_>,
    tag: TypeTag,
) -> SerializationResult<PackedValue> {
    Ok(match tag {
        TypeTag::U8 => PackedValue::U8(Packable::read_packed(reader)?),
        TypeTag::I8 => PackedValue::I8(Packable::read_packed(reader)?),
        TypeTag::U16 => PackedValue::U16(Packable::read_packed(reader)?),
        TypeTag::I16 => PackedValue::I16(Packable::read_packed(reader)?),
        TypeTag::U32 => PackedValue::U32(Packable::read_packed(reader)?),
        TypeTag::I32 => PackedValue::I32(Packable::read_packed(reader)?),
        TypeTag::U64 => PackedValue::U64(Packable::read_packed(reader)?),
        TypeTag::I64 => PackedValue::I64(Packable::read_packed(reader)?),
        TypeTag::Bool => PackedValue::Bool(Packable::read_packed(reader)?),
        TypeTag::Char => PackedValue::Char(Packable::read_packed(reader)?),
        TypeTag::F32 => PackedValue::F32(Packable::read_packed(reader)?),
        TypeTag::F64 => PackedValue::F64(Packable::read_packed(reader)?),
        TypeTag::Enum(repr) => PackedValue::Enum {
            repr,
            value: repr.read_value(reader)?,
        },
        TypeTag::Vec2 => PackedValue::Vec2(Packable::read_packed(reader)?),
        TypeTag::Vec3 => PackedValue::Vec3(Packable::read_packed(reader)?),
        TypeTag::Vec4 => PackedValue::Vec4(Packable::read_packed(reader)?),
        TypeTag::Quaternion => PackedValue::Quaternion(Packable::read_packed(reader)?),
        TypeTag::Color => PackedValue::Color(Packable::read_packed(reader)?),
        TypeTag::Color32 => PackedValue::Color32(Packable::read_packed(reader)?),
        TypeTag::Ray => PackedValue::Ray(Packable::read_packed(reader)?),
        TypeTag::Ray2D => PackedValue::Ray2D(Packable::read_packed(reader)?),
    })
}

/// Reads a `T`, checking it against the declared `tag`.
///
/// # Errors
///
/// Returns [`SerializationError::TypeMismatch`] if `T` is not the type
/// named by `tag`; nothing is consumed in that case.
pub fn read_object_packed_as<T: Packable>(
    reader: &mut BufferReader<'_>,
    tag: TypeTag,
) -> SerializationResult<T> {
    if T::TYPE_TAG != tag {
        tracing::debug!(?tag, actual = ?T::TYPE_TAG, "Rejected object read with mismatched tag");
        return Err(SerializationError::TypeMismatch {
            expected: tag,
            actual: T::TYPE_TAG,
        });
    }
    T::read_packed(reader)
}
