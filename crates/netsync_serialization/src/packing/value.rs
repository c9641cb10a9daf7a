//! # Value Packing
//!
//! Byte-aligned variable-length integers. The first byte is a header that
//! either is the value itself or selects a size class:
//!
//! ```text
//! header      bytes   value
//! 0..=240     1       header
//! 241..=248   2       240 + 256 * (header - 241) + b1
//! 249..=255   1 + k   k = header - 247 data bytes, little-endian
//! ```
//!
//! So 0..=240 costs one byte, 241..=2287 two bytes, and anything larger one
//! byte plus the minimal number of bytes holding the magnitude.
//!
//! Signed integers are zigzag-mapped in their own width first.

use crate::arithmetic::{
    used_bit_count, used_byte_count, zigzag_decode_i16, zigzag_decode_i32, zigzag_decode_i8,
    zigzag_decode, zigzag_encode_i16, zigzag_encode_i32, zigzag_encode_i8, zigzag_encode,
};
use crate::buffer::{BufferReader, BufferWriter};
use crate::error::{SerializationError, SerializationResult};

/// Largest value stored directly in the header byte.
const SINGLE_BYTE_MAX: u64 = 240;

/// Largest value of the two-byte class.
const TWO_BYTE_MAX: u64 = SINGLE_BYTE_MAX + 256 * 8 - 1;

/// First header of the two-byte class.
const TWO_BYTE_HEADER: u8 = 241;

/// `header - MULTI_BYTE_BIAS` is the data byte count of the wide classes.
const MULTI_BYTE_BIAS: u8 = 247;

/// Longest possible encoding: header plus eight data bytes.
pub const MAX_VALUE_PACKED_SIZE: usize = 9;

/// Bytes [`write_u64_packed`] will use for `value`.
#[inline]
#[must_use]
pub const fn packed_size_u64(value: u64) -> usize {
    if value <= SINGLE_BYTE_MAX {
        1
    } else if value <= TWO_BYTE_MAX {
        2
    } else {
        1 + used_byte_count(value) as usize
    }
}

/// Encodes into a stack buffer, returning the used length.
#[inline]
fn encode(value: u64, out: &mut [u8; MAX_VALUE_PACKED_SIZE]) -> usize {
    if value <= SINGLE_BYTE_MAX {
        out[0] = value as u8;
        return 1;
    }
    if value <= TWO_BYTE_MAX {
        let offset = value - SINGLE_BYTE_MAX;
        out[0] = TWO_BYTE_HEADER + (offset / 256) as u8;
        out[1] = (offset % 256) as u8;
        return 2;
    }
    let data_len = used_byte_count(value) as usize;
    out[0] = MULTI_BYTE_BIAS + data_len as u8;
    out[1..=data_len].copy_from_slice(&value.to_le_bytes()[..data_len]);
    1 + data_len
}

/// Writes an unsigned 64-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if the encoding does not
/// fit; nothing is written in that case.
pub fn write_u64_packed(writer: &mut BufferWriter, value: u64) -> SerializationResult<()> {
    let mut scratch = [0u8; MAX_VALUE_PACKED_SIZE];
    let len = encode(value, &mut scratch);
    writer.write_bytes(&scratch[..len])
}

/// Reads an unsigned 64-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] if the region ends inside the
/// encoding; the cursor does not move in that case.
pub fn read_u64_packed(reader: &mut BufferReader<'_>) -> SerializationResult<u64> {
    let header = reader.peek_byte()?;
    if u64::from(header) <= SINGLE_BYTE_MAX {
        return reader.read_byte().map(u64::from);
    }
    if header <= MULTI_BYTE_BIAS + 1 {
        let [_, low] = reader.read_array::<2>()?;
        return Ok(SINGLE_BYTE_MAX + 256 * u64::from(header - TWO_BYTE_HEADER) + u64::from(low));
    }
    let data_len = usize::from(header - MULTI_BYTE_BIAS);
    let encoded = reader.read_bytes(1 + data_len)?;
    let mut bytes = [0u8; 8];
    bytes[..data_len].copy_from_slice(&encoded[1..]);
    Ok(u64::from_le_bytes(bytes))
}

/// Reads an unsigned value and checks it fits `T`.
fn read_narrow<T: TryFrom<u64>>(
    reader: &mut BufferReader<'_>,
    max_bits: u32,
) -> SerializationResult<T> {
    let value = read_u64_packed(reader)?;
    T::try_from(value).map_err(|_| SerializationError::DomainOverflow {
        bits: used_bit_count(value),
        max_bits,
    })
}

/// Writes an unsigned 32-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if it does not fit.
#[inline]
pub fn write_u32_packed(writer: &mut BufferWriter, value: u32) -> SerializationResult<()> {
    write_u64_packed(writer, u64::from(value))
}

/// Reads an unsigned 32-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input and
/// [`SerializationError::DomainOverflow`] if the decoded value is wider
/// than 32 bits.
#[inline]
pub fn read_u32_packed(reader: &mut BufferReader<'_>) -> SerializationResult<u32> {
    read_narrow(reader, u32::BITS)
}

/// Writes an unsigned 16-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if it does not fit.
#[inline]
pub fn write_u16_packed(writer: &mut BufferWriter, value: u16) -> SerializationResult<()> {
    write_u64_packed(writer, u64::from(value))
}

/// Reads an unsigned 16-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input and
/// [`SerializationError::DomainOverflow`] if the decoded value is wider
/// than 16 bits.
#[inline]
pub fn read_u16_packed(reader: &mut BufferReader<'_>) -> SerializationResult<u16> {
    read_narrow(reader, u16::BITS)
}

/// Writes an unsigned 8-bit value. Values above 240 take two bytes.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if it does not fit.
#[inline]
pub fn write_u8_packed(writer: &mut BufferWriter, value: u8) -> SerializationResult<()> {
    write_u64_packed(writer, u64::from(value))
}

/// Reads an unsigned 8-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input and
/// [`SerializationError::DomainOverflow`] if the decoded value is wider
/// than 8 bits.
#[inline]
pub fn read_u8_packed(reader: &mut BufferReader<'_>) -> SerializationResult<u8> {
    read_narrow(reader, u8::BITS)
}

/// Writes a signed 64-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if it does not fit.
#[inline]
pub fn write_i64_packed(writer: &mut BufferWriter, value: i64) -> SerializationResult<()> {
    write_u64_packed(writer, zigzag_encode(value))
}

/// Reads a signed 64-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input.
#[inline]
pub fn read_i64_packed(reader: &mut BufferReader<'_>) -> SerializationResult<i64> {
    read_u64_packed(reader).map(zigzag_decode)
}

/// Writes a signed 32-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if it does not fit.
#[inline]
pub fn write_i32_packed(writer: &mut BufferWriter, value: i32) -> SerializationResult<()> {
    write_u32_packed(writer, zigzag_encode_i32(value))
}

/// Reads a signed 32-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input and
/// [`SerializationError::DomainOverflow`] if the zigzag form is wider than
/// 32 bits.
#[inline]
pub fn read_i32_packed(reader: &mut BufferReader<'_>) -> SerializationResult<i32> {
    read_u32_packed(reader).map(zigzag_decode_i32)
}

/// Writes a signed 16-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if it does not fit.
#[inline]
pub fn write_i16_packed(writer: &mut BufferWriter, value: i16) -> SerializationResult<()> {
    write_u16_packed(writer, zigzag_encode_i16(value))
}

/// Reads a signed 16-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input and
/// [`SerializationError::DomainOverflow`] if the zigzag form is wider than
/// 16 bits.
#[inline]
pub fn read_i16_packed(reader: &mut BufferReader<'_>) -> SerializationResult<i16> {
    read_u16_packed(reader).map(zigzag_decode_i16)
}

/// Writes a signed 8-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::CapacityExceeded`] if it does not fit.
#[inline]
pub fn write_i8_packed(writer: &mut BufferWriter, value: i8) -> SerializationResult<()> {
    write_u8_packed(writer, zigzag_encode_i8(value))
}

/// Reads a signed 8-bit value.
///
/// # Errors
///
/// Returns [`SerializationError::OutOfBounds`] on truncated input and
/// [`SerializationError::DomainOverflow`] if the zigzag form is wider than
/// 8 bits.
#[inline]
pub fn read_i8_packed(reader: &mut BufferReader<'_>) -> SerializationResult<i8> {
    read_u8_packed(reader).map(zigzag_decode_i8)
}
