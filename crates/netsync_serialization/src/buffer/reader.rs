//! # Buffer Reader
//!
//! Bounds-checked read cursor over an immutable byte region.

use std::borrow::Cow;

use crate::error::{SerializationError, SerializationResult};

/// Read cursor over a received message.
///
/// The region is either borrowed (zero-copy, e.g. from
/// [`BufferWriter::reader`](crate::BufferWriter::reader)) or owned. It is
/// never mutated, so any number of readers may walk the same bytes.
#[derive(Clone, Debug)]
pub struct BufferReader<'a> {
    data: Cow<'a, [u8]>,
    position: usize,
}

impl<'a> BufferReader<'a> {
    /// Creates a reader over a borrowed region.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self {
            data: Cow::Borrowed(data),
            position: 0,
        }
    }

    /// Creates a reader starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::SeekOutOfRange`] if `offset` is past the
    /// end of `data`.
    pub fn with_offset(data: &'a [u8], offset: usize) -> SerializationResult<Self> {
        let mut reader = Self::new(data);
        reader.seek(offset)?;
        Ok(reader)
    }

    /// Returns the number of bytes in the region.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the region is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current cursor.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Returns true once every byte has been consumed.
    #[inline]
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole region, independent of the cursor.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Moves the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::SeekOutOfRange`] if `position` is past
    /// the end of the region.
    pub fn seek(&mut self, position: usize) -> SerializationResult<()> {
        if position > self.data.len() {
            return Err(SerializationError::SeekOutOfRange {
                position,
                length: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Checks that `n` more bytes can be read.
    #[inline]
    fn ensure(&self, n: usize) -> SerializationResult<()> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(SerializationError::OutOfBounds {
                requested: n,
                remaining,
            });
        }
        Ok(())
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::OutOfBounds`] at the end of the region.
    #[inline]
    pub fn read_byte(&mut self) -> SerializationResult<u8> {
        self.ensure(1)?;
        let value = self.data[self.position];
        self.position += 1;
        Ok(value)
    }

    /// Reads the next byte without advancing.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::OutOfBounds`] at the end of the region.
    #[inline]
    pub fn peek_byte(&self) -> SerializationResult<u8> {
        self.ensure(1)?;
        Ok(self.data[self.position])
    }

    /// Reads `n` bytes as a slice of the region.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::OutOfBounds`] if fewer than `n` bytes
    /// remain; the cursor does not move.
    pub fn read_bytes(&mut self, n: usize) -> SerializationResult<&[u8]> {
        self.ensure(n)?;
        let start = self.position;
        self.position += n;
        Ok(&self.data[start..self.position])
    }

    /// Fills `out` from the region.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::OutOfBounds`] if fewer than `out.len()`
    /// bytes remain.
    pub fn read_into(&mut self, out: &mut [u8]) -> SerializationResult<()> {
        let bytes = self.read_bytes(out.len())?;
        out.copy_from_slice(bytes);
        Ok(())
    }

    /// Reads a fixed-size array.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::OutOfBounds`] if fewer than `N` bytes
    /// remain.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> SerializationResult<[u8; N]> {
        let mut out = [0u8; N];
        self.read_into(&mut out)?;
        Ok(out)
    }
}

impl BufferReader<'static> {
    /// Creates a reader that owns its region.
    #[must_use]
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: Cow::Owned(data),
            position: 0,
        }
    }
}
