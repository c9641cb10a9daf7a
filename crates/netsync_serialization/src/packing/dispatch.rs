//! # Type Dispatch
//!
//! Compile-time mapping from a value's type to its wire form.
//!
//! | Type | Encoding |
//! |------|----------|
//! | `u8`..`u64`, `i8`..`i64` | value-packed (signed via zigzag) |
//! | `bool` | 1 raw byte, 0 or 1 |
//! | `char` | 2 raw bytes, one UTF-16 code unit |
//! | `f32`, `f64` | raw IEEE bits, little-endian |
//! | enums | backing integer, value-packed |
//! | vectors, colors, rays | each component in declaration order |
//!
//! Floats are never varint-compressed: their bit patterns do not cluster
//! near zero.

use netsync_shared::{Color, Color32, Quaternion, Ray, Ray2D, Vec2, Vec3, Vec4};

use super::object::{EnumRepr, TypeTag};
use super::value;
use crate::arithmetic::used_bit_count;
use crate::buffer::{BufferReader, BufferWriter};
use crate::error::{SerializationError, SerializationResult};

/// A type with a fixed packed wire form.
///
/// Reads must be issued in exactly the order the writes were; nothing on
/// the wire says what type comes next.
pub trait Packable: Sized {
    /// Runtime tag naming this type on the object path.
    const TYPE_TAG: TypeTag;

    /// Appends the packed form of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::CapacityExceeded`] if the buffer is
    /// full, or [`SerializationError::DomainOverflow`] if the value has no
    /// wire form.
    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()>;

    /// Decodes a value written by [`Packable::write_packed`].
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::OutOfBounds`] on truncated input, or a
    /// validation error if the bytes do not form a valid value.
    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self>;
}

/// Writes `value` in its packed form.
///
/// # Errors
///
/// See [`Packable::write_packed`].
#[inline]
pub fn write_packed<T: Packable>(writer: &mut BufferWriter, value: &T) -> SerializationResult<()> {
    value.write_packed(writer)
}

/// Reads a `T` in its packed form.
///
/// # Errors
///
/// See [`Packable::read_packed`].
#[inline]
pub fn read_packed<T: Packable>(reader: &mut BufferReader<'_>) -> SerializationResult<T> {
    T::read_packed(reader)
}

macro_rules! impl_packable_integer {
    ($($ty:ty => $tag:ident, $write:ident, $read:ident);+ $(;)?) => {$(
        impl Packable for $ty {
            const TYPE_TAG: TypeTag = TypeTag::$tag;

            #[inline]
            fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
                value::$write(writer, *self)
            }

            #[inline]
            fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
                value::$read(reader)
            }
        }
    )+};
}

impl_packable_integer! {
    u8 => U8, write_u8_packed, read_u8_packed;
    i8 => I8, write_i8_packed, read_i8_packed;
    u16 => U16, write_u16_packed, read_u16_packed;
    i16 => I16, write_i16_packed, read_i16_packed;
    u32 => U32, write_u32_packed, read_u32_packed;
    i32 => I32, write_i32_packed, read_i32_packed;
    u64 => U64, write_u64_packed, read_u64_packed;
    i64 => I64, write_i64_packed, read_i64_packed;
}

impl Packable for bool {
    const TYPE_TAG: TypeTag = TypeTag::Bool;

    #[inline]
    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        writer.write_byte(u8::from(*self))
    }

    #[inline]
    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        Ok(reader.read_byte()? != 0)
    }
}

impl Packable for char {
    const TYPE_TAG: TypeTag = TypeTag::Char;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        let scalar = u32::from(*self);
        let unit = u16::try_from(scalar).map_err(|_| SerializationError::DomainOverflow {
            bits: used_bit_count(u64::from(scalar)),
            max_bits: u16::BITS,
        })?;
        writer.write_bytes(&unit.to_le_bytes())
    }

    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let code_unit = u16::from_le_bytes(reader.read_array()?);
        char::from_u32(u32::from(code_unit)).ok_or(SerializationError::InvalidChar { code_unit })
    }
}

impl Packable for f32 {
    const TYPE_TAG: TypeTag = TypeTag::F32;

    #[inline]
    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        writer.write_bytes(&self.to_bits().to_le_bytes())
    }

    #[inline]
    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        Ok(Self::from_bits(u32::from_le_bytes(reader.read_array()?)))
    }
}

impl Packable for f64 {
    const TYPE_TAG: TypeTag = TypeTag::F64;

    #[inline]
    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        writer.write_bytes(&self.to_bits().to_le_bytes())
    }

    #[inline]
    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        Ok(Self::from_bits(u64::from_le_bytes(reader.read_array()?)))
    }
}

impl Packable for Vec2 {
    const TYPE_TAG: TypeTag = TypeTag::Vec2;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.x.write_packed(writer)?;
        self.y.write_packed(writer)
    }

    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let x = f32::read_packed(reader)?;
        let y = f32::read_packed(reader)?;
        Ok(Self::new(x, y))
    }
}

impl Packable for Vec3 {
    const TYPE_TAG: TypeTag = TypeTag::Vec3;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.x.write_packed(writer)?;
        self.y.write_packed(writer)?;
        self.z.write_packed(writer)
    }

    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let x = f32::read_packed(reader)?;
        let y = f32::read_packed(reader)?;
        let z = f32::read_packed(reader)?;
        Ok(Self::new(x, y, z))
    }
}

impl Packable for Vec4 {
    const TYPE_TAG: TypeTag = TypeTag::Vec4;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.x.write_packed(writer)?;
        self.y.write_packed(writer)?;
        self.z.write_packed(writer)?;
        self.w.write_packed(writer)
    }

    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let x = f32::read_packed(reader)?;
        let y = f32::read_packed(reader)?;
        let z = f32::read_packed(reader)?;
        let w = f32::read_packed(reader)?;
        Ok(Self::new(x, y, z, w))
    }
}

impl Packable for Quaternion {
    const TYPE_TAG: TypeTag = TypeTag::Quaternion;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.x.write_packed(writer)?;
        self.y.write_packed(writer)?;
        self.z.write_packed(writer)?;
        self.w.write_packed(writer)
    }

    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let x = f32::read_packed(reader)?;
        let y = f32::read_packed(reader)?;
        let z = f32::read_packed(reader)?;
        let w = f32::read_packed(reader)?;
        Ok(Self::new(x, y, z, w))
    }
}

impl Packable for Color {
    const TYPE_TAG: TypeTag = TypeTag::Color;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.r.write_packed(writer)?;
        self.g.write_packed(writer)?;
        self.b.write_packed(writer)?;
        self.a.write_packed(writer)
    }

    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let r = f32::read_packed(reader)?;
        let g = f32::read_packed(reader)?;
        let b = f32::read_packed(reader)?;
        let a = f32::read_packed(reader)?;
        Ok(Self::new(r, g, b, a))
    }
}

impl Packable for Color32 {
    const TYPE_TAG: TypeTag = TypeTag::Color32;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.r.write_packed(writer)?;
        self.g.write_packed(writer)?;
        self.b.write_packed(writer)?;
        self.a.write_packed(writer)
    }

    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let r = u8::read_packed(reader)?;
        let g = u8::read_packed(reader)?;
        let b = u8::read_packed(reader)?;
        let a = u8::read_packed(reader)?;
        Ok(Self::new(r, g, b, a))
    }
}

impl Packable for Ray {
    const TYPE_TAG: TypeTag = TypeTag::Ray;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.origin.write_packed(writer)?;
        self.direction.write_packed(writer)
    }

    /// Rebuilt through [`Ray::new`], which renormalizes the direction.
    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let origin = Vec3::read_packed(reader)?;
        let direction = Vec3::read_packed(reader)?;
        Ok(Self::new(origin, direction))
    }
}

impl Packable for Ray2D {
    const TYPE_TAG: TypeTag = TypeTag::Ray2D;

    fn write_packed(&self, writer: &mut BufferWriter) -> SerializationResult<()> {
        self.origin.write_packed(writer)?;
        self.direction.write_packed(writer)
    }

    /// Rebuilt through [`Ray2D::new`], which renormalizes the direction.
    fn read_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
        let origin = Vec2::read_packed(reader)?;
        let direction = Vec2::read_packed(reader)?;
        Ok(Self::new(origin, direction))
    }
}

/// Integer types an enum may be backed by.
pub trait EnumBacking: Packable + Copy + Into<i128> + TryFrom<i128> {
    /// Width and signedness of this backing type.
    const REPR: EnumRepr;
}

impl EnumBacking for u8 {
    const REPR: EnumRepr = EnumRepr::U8;
}
impl EnumBacking for i8 {
    const REPR: EnumRepr = EnumRepr::I8;
}
impl EnumBacking for u16 {
    const REPR: EnumRepr = EnumRepr::U16;
}
impl EnumBacking for i16 {
    const REPR: EnumRepr = EnumRepr::I16;
}
impl EnumBacking for u32 {
    const REPR: EnumRepr = EnumRepr::U32;
}
impl EnumBacking for i32 {
    const REPR: EnumRepr = EnumRepr::I32;
}
impl EnumBacking for u64 {
    const REPR: EnumRepr = EnumRepr::U64;
}
impl EnumBacking for i64 {
    const REPR: EnumRepr = EnumRepr::I64;
}

/// A fieldless enum carried as its backing integer.
///
/// ```rust,ignore
/// #[derive(Clone, Copy)]
/// #[repr(u8)]
/// enum Team { Red = 0, Blue = 1 }
///
/// impl PackedEnum for Team {
///     type Repr = u8;
///     fn to_repr(self) -> u8 { self as u8 }
///     fn from_repr(repr: u8) -> Option<Self> {
///         match repr { 0 => Some(Self::Red), 1 => Some(Self::Blue), _ => None }
///     }
/// }
/// impl_packable_enum!(Team);
/// ```
pub trait PackedEnum: Copy {
    /// Declared backing integer.
    type Repr: EnumBacking;

    /// The backing value of `self`.
    fn to_repr(self) -> Self::Repr;

    /// The variant with backing value `repr`, if any.
    fn from_repr(repr: Self::Repr) -> Option<Self>;
}

/// Writes an enum as its value-packed backing integer.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if the buffer is full.
#[inline]
pub fn write_enum_packed<E: PackedEnum>(
    writer: &mut BufferWriter,
    value: E,
) -> SerializationResult<()> {
    value.to_repr().write_packed(writer)
}

/// Reads an enum written by [`write_enum_packed`].
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input and
/// [`SerializationError::InvalidEnumValue`] for an unknown discriminant.
pub fn read_enum_packed<E: PackedEnum>(reader: &mut BufferReader<'_>) -> SerializationResult<E> {
    let repr = E::Repr::read_packed(reader)?;
    E::from_repr(repr).ok_or_else(|| SerializationError::InvalidEnumValue {
        value: repr.into(),
    })
}

/// Implements [`Packable`] for types implementing [`PackedEnum`].
#[macro_export]
macro_rules! impl_packable_enum {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Packable for $ty {
            const TYPE_TAG: $crate::TypeTag = $crate::TypeTag::Enum(
                <<$ty as $crate::PackedEnum>::Repr as $crate::EnumBacking>::REPR,
            );

            fn write_packed(
                &self,
                writer: &mut $crate::BufferWriter,
            ) -> $crate::SerializationResult<()> {
                $crate::write_enum_packed(writer, *self)
            }

            fn read_packed(
                reader: &mut $crate::BufferReader<'_>,
            ) -> $crate::SerializationResult<Self> {
                $crate::read_enum_packed(reader)
            }
        }
    )+};
}
