//! # Bit Packing
//!
//! Denser variable-length integers for values whose upper bound the
//! protocol fixes in advance (tick deltas, table indices).
//!
//! The low bits of the first byte are a tag holding `byte_count - 1`; the
//! value follows least-significant bit first, directly above the tag:
//!
//! ```text
//! Bits61:  byte 0 = vvvvv ttt    1..=8 bytes, value < 2^61
//! Bits30:  byte 0 = vvvvvv tt    1..=4 bytes, value < 2^30
//! Bits15:  byte 0 = vvvvvvv t    1..=2 bytes, value < 2^15
//! ```
//!
//! The class is not on the wire: reader and writer must agree on it.
//! Signed values are zigzag-mapped first, which costs one bit of range
//! (60/29/14 magnitude bits).

use crate::arithmetic::{used_bit_count, zigzag_decode, zigzag_encode};
use crate::buffer::{BufferReader, BufferWriter};
use crate::error::{SerializationError, SerializationResult};

/// Declared maximum width of a bit-packed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidthClass {
    /// Up to 61 value bits in at most 8 bytes, 3 tag bits.
    Bits61,
    /// Up to 30 value bits in at most 4 bytes, 2 tag bits.
    Bits30,
    /// Up to 15 value bits in at most 2 bytes, 1 tag bit.
    Bits15,
}

impl WidthClass {
    /// Bits reserved for the length tag.
    #[inline]
    #[must_use]
    pub const fn tag_bits(self) -> u32 {
        match self {
            Self::Bits61 => 3,
            Self::Bits30 => 2,
            Self::Bits15 => 1,
        }
    }

    /// Container size in bytes.
    #[inline]
    #[must_use]
    pub const fn max_bytes(self) -> usize {
        match self {
            Self::Bits61 => 8,
            Self::Bits30 => 4,
            Self::Bits15 => 2,
        }
    }

    /// Widest unsigned value the class accepts.
    #[inline]
    #[must_use]
    pub const fn max_bits(self) -> u32 {
        self.max_bytes() as u32 * 8 - self.tag_bits()
    }

    /// Widest signed magnitude the class accepts.
    #[inline]
    #[must_use]
    pub const fn max_signed_bits(self) -> u32 {
        self.max_bits() - 1
    }

    #[inline]
    const fn tag_mask(self) -> u8 {
        (1u8 << self.tag_bits()) - 1
    }

    /// Smallest byte count with `bytes * 8 - tag_bits >= bit_length`.
    #[inline]
    #[must_use]
    pub const fn byte_count(self, bit_length: u32) -> usize {
        (bit_length + self.tag_bits()).div_ceil(8) as usize
    }
}

/// Bytes `value` takes in `class`, or `None` if it does not fit the class.
#[must_use]
pub const fn bit_packed_size(value: u64, class: WidthClass) -> Option<usize> {
    let bits = used_bit_count(value);
    if bits > class.max_bits() {
        None
    } else {
        Some(class.byte_count(bits))
    }
}

/// Writes an unsigned value in `class`.
///
/// # Errors
///
/// Returns [`SerializationError::DomainOverflow`] if `value` is wider than
/// the class, and [`SerializationError::CapacityExceeded`] if the encoding
/// does not fit. Nothing is written in either case.
pub fn write_bit_packed(
    writer: &mut BufferWriter,
    value: u64,
    class: WidthClass,
) -> SerializationResult<()> {
    let bits = used_bit_count(value);
    if bits > class.max_bits() {
        tracing::debug!(
            "Bit-packed value {} rejected: {} bits exceed {:?}",
            value,
            bits,
            class
        );
        return Err(SerializationError::DomainOverflow {
            bits,
            max_bits: class.max_bits(),
        });
    }

    let byte_count = class.byte_count(bits);
    let encoded = (value << class.tag_bits()) | (byte_count as u64 - 1);
    writer.write_bytes(&encoded.to_le_bytes()[..byte_count])
}

/// Reads an unsigned value in `class`.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] if the region ends inside the
/// encoding; the cursor does not move in that case.
pub fn read_bit_packed(reader: &mut BufferReader<'_>, class: WidthClass) -> SerializationResult<u64> {
    let first = reader.peek_byte()?;
    let byte_count = usize::from(first & class.tag_mask()) + 1;
    let mut bytes = [0u8; 8];
    reader.read_into(&mut bytes[..byte_count])?;
    Ok(u64::from_le_bytes(bytes) >> class.tag_bits())
}

/// Writes a signed value in `class` after zigzag mapping.
///
/// # Errors
///
/// Returns [`SerializationError::DomainOverflow`] if the zigzag form is
/// wider than the class, and [`SerializationError::CapacityExceeded`] if the
/// encoding does not fit.
#[inline]
pub fn write_bit_packed_signed(
    writer: &mut BufferWriter,
    value: i64,
    class: WidthClass,
) -> SerializationResult<()> {
    write_bit_packed(writer, zigzag_encode(value), class)
}

/// Reads a signed value in `class`.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input.
#[inline]
pub fn read_bit_packed_signed(
    reader: &mut BufferReader<'_>,
    class: WidthClass,
) -> SerializationResult<i64> {
    read_bit_packed(reader, class).map(zigzag_decode)
}

/// Integer types with a natural bit-packed width class.
///
/// `u64`/`i64` use [`WidthClass::Bits61`], `u32`/`i32` use
/// [`WidthClass::Bits30`], `u16`/`i16` use [`WidthClass::Bits15`].
pub trait BitPackable: Sized + Copy {
    /// Class used for this type.
    const WIDTH_CLASS: WidthClass;

    /// Writes `self` in [`Self::WIDTH_CLASS`].
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::DomainOverflow`] if `self` does not fit
    /// the class, or [`SerializationError::CapacityExceeded`] if the buffer
    /// is full.
    fn write_bit_packed(self, writer: &mut BufferWriter) -> SerializationResult<()>;

    /// Reads a value in [`Self::WIDTH_CLASS`].
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::OutOfBounds`] on truncated input.
    fn read_bit_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self>;
}

macro_rules! impl_bit_packable_unsigned {
    ($($ty:ty => $class:expr),+ $(,)?) => {$(
        impl BitPackable for $ty {
            const WIDTH_CLASS: WidthClass = $class;

            #[inline]
            fn write_bit_packed(self, writer: &mut BufferWriter) -> SerializationResult<()> {
                write_bit_packed(writer, u64::from(self), Self::WIDTH_CLASS)
            }

            #[inline]
            fn read_bit_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
                let value = read_bit_packed(reader, Self::WIDTH_CLASS)?;
                <$ty>::try_from(value).map_err(|_| SerializationError::DomainOverflow {
                    bits: used_bit_count(value),
                    max_bits: <$ty>::BITS,
                })
            }
        }
    )+};
}

macro_rules! impl_bit_packable_signed {
    ($($ty:ty => $class:expr),+ $(,)?) => {$(
        impl BitPackable for $ty {
            const WIDTH_CLASS: WidthClass = $class;

            #[inline]
            fn write_bit_packed(self, writer: &mut BufferWriter) -> SerializationResult<()> {
                write_bit_packed_signed(writer, i64::from(self), Self::WIDTH_CLASS)
            }

            #[inline]
            fn read_bit_packed(reader: &mut BufferReader<'_>) -> SerializationResult<Self> {
                let value = read_bit_packed_signed(reader, Self::WIDTH_CLASS)?;
                <$ty>::try_from(value).map_err(|_| SerializationError::DomainOverflow {
                    bits: used_bit_count(zigzag_encode(value)),
                    max_bits: <$ty>::BITS,
                })
            }
        }
    )+};
}

impl_bit_packable_unsigned! {
    u64 => WidthClass::Bits61,
    u32 => WidthClass::Bits30,
    u16 => WidthClass::Bits15,
}

impl_bit_packable_signed! {
    i64 => WidthClass::Bits61,
    i32 => WidthClass::Bits30,
    i16 => WidthClass::Bits15,
}

/// Writes `value` in its type's width class.
///
/// # Errors
///
/// See [`BitPackable::write_bit_packed`].
#[inline]
pub fn write_value_bit_packed<T: BitPackable>(
    writer: &mut BufferWriter,
    value: T,
) -> SerializationResult<()> {
    value.write_bit_packed(writer)
}

/// Reads a `T` in its type's width class.
///
/// # Errors
///
/// See [`BitPackable::read_bit_packed`].
#[inline]
pub fn read_value_bit_packed<T: BitPackable>(reader: &mut BufferReader<'_>) -> SerializationResult<T> {
    T::read_bit_packed(reader)
}
