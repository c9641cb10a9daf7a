//! # Arithmetic Helpers
//!
//! Zigzag mapping and magnitude measurement shared by both integer codecs.

/// Maps a signed 64-bit integer onto the unsigned domain so small
/// magnitudes stay small: `0, -1, 1, -2, 2, ...` become `0, 1, 2, 3, 4, ...`.
#[inline]
#[must_use]
pub const fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode`].
#[inline]
#[must_use]
pub const fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Zigzag in the 32-bit domain.
#[inline]
#[must_use]
pub const fn zigzag_encode_i32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode_i32`].
#[inline]
#[must_use]
pub const fn zigzag_decode_i32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Zigzag in the 16-bit domain.
#[inline]
#[must_use]
pub const fn zigzag_encode_i16(value: i16) -> u16 {
    ((value << 1) ^ (value >> 15)) as u16
}

/// Inverse of [`zigzag_encode_i16`].
#[inline]
#[must_use]
pub const fn zigzag_decode_i16(value: u16) -> i16 {
    ((value >> 1) as i16) ^ -((value & 1) as i16)
}

/// Zigzag in the 8-bit domain.
#[inline]
#[must_use]
pub const fn zigzag_encode_i8(value: i8) -> u8 {
    ((value << 1) ^ (value >> 7)) as u8
}

/// Inverse of [`zigzag_encode_i8`].
#[inline]
#[must_use]
pub const fn zigzag_decode_i8(value: u8) -> i8 {
    ((value >> 1) as i8) ^ -((value & 1) as i8)
}

/// Number of significant bits in `value` (0 for 0).
#[inline]
#[must_use]
pub const fn used_bit_count(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// Smallest number of bytes able to hold `value`'s magnitude (0 for 0).
#[inline]
#[must_use]
pub const fn used_byte_count(value: u64) -> u32 {
    used_bit_count(value).div_ceil(8)
}
