//! # Buffer Writer
//!
//! Bounded scratch buffer with a write cursor.
//!
//! ```text
//! 0            position        length          capacity      max_capacity
//! ├──────────────┼───────────────┼────────────────┼─────────────────┤
//! │  committed   │  stale bytes  │   allocated    │  reachable by   │
//! │  (rewritten  │  kept until   │   but unused   │  growth only    │
//! │   on write)  │  truncate()   │                │                 │
//! ```
//!
//! Invariant: `position <= length <= capacity <= max_capacity`.

use super::reader::BufferReader;
use crate::config::BufferConfig;
use crate::error::{SerializationError, SerializationResult};

/// A saved cursor position.
///
/// Used to patch a length prefix after the payload is known, or to drop a
/// partially written message with [`BufferWriter::rewind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorMark(usize);

impl CursorMark {
    /// Byte offset this mark points at.
    #[inline]
    #[must_use]
    pub const fn position(self) -> usize {
        self.0
    }
}

/// Scratch buffer that values are packed into.
///
/// One writer builds one message; it is not meant to be shared between
/// threads. Reuse it with [`reset`](Self::reset) to avoid reallocating.
#[derive(Clone, Debug)]
pub struct BufferWriter {
    /// Backing storage; `buffer.len()` is the allocated capacity.
    buffer: Vec<u8>,
    /// Write cursor.
    position: usize,
    /// Logical content size.
    length: usize,
    /// Growth limit (equals capacity for fixed buffers).
    max_capacity: usize,
}

impl BufferWriter {
    /// Creates a fixed-size writer.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity],
            position: 0,
            length: 0,
            max_capacity: capacity,
        }
    }

    /// Creates a writer that starts at `initial_capacity` and doubles on
    /// demand, never beyond `max_capacity`.
    #[must_use]
    pub fn growable(initial_capacity: usize, max_capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; initial_capacity],
            position: 0,
            length: 0,
            max_capacity: max_capacity.max(initial_capacity),
        }
    }

    /// Creates a writer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::InvalidConfig`] if `config` fails
    /// validation.
    pub fn from_config(config: &BufferConfig) -> SerializationResult<Self> {
        config.validate()?;
        Ok(Self::growable(
            config.initial_capacity,
            config.effective_max_capacity(),
        ))
    }

    /// Current cursor.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Logical content size.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns true if no bytes are held.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bytes currently allocated.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Growth limit.
    #[inline]
    #[must_use]
    pub const fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Returns true if the buffer can still grow.
    #[inline]
    #[must_use]
    pub fn is_growable(&self) -> bool {
        self.max_capacity > self.buffer.len()
    }

    /// Bytes that can still be written past the cursor, counting growth.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.max_capacity - self.position
    }

    /// Makes room for `n` bytes past the cursor.
    ///
    /// Growable buffers double (clamped to the maximum). Existing content
    /// keeps its offsets.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::CapacityExceeded`] if `n` bytes do not
    /// fit even at maximum capacity, or if the allocation fails. The buffer
    /// is unchanged in that case.
    pub fn reserve(&mut self, n: usize) -> SerializationResult<()> {
        let Some(needed) = self.position.checked_add(n) else {
            return Err(self.capacity_exceeded(n));
        };
        if needed <= self.buffer.len() {
            return Ok(());
        }
        if needed > self.max_capacity {
            return Err(self.capacity_exceeded(n));
        }

        let new_capacity = self
            .buffer
            .len()
            .saturating_mul(2)
            .max(needed)
            .min(self.max_capacity);
        let additional = new_capacity - self.buffer.len();
        if self.buffer.try_reserve_exact(additional).is_err() {
            tracing::debug!("Buffer growth to {} bytes failed", new_capacity);
            return Err(self.capacity_exceeded(n));
        }
        tracing::trace!(
            "Buffer grown: {} -> {} bytes (max {})",
            self.buffer.len(),
            new_capacity,
            self.max_capacity
        );
        self.buffer.resize(new_capacity, 0);
        Ok(())
    }

    fn capacity_exceeded(&self, requested: usize) -> SerializationError {
        let available = self.remaining();
        tracing::debug!(
            "Write rejected: {} bytes requested, {} available",
            requested,
            available
        );
        SerializationError::CapacityExceeded {
            requested,
            available,
        }
    }

    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::CapacityExceeded`] if the byte does not fit.
    #[inline]
    pub fn write_byte(&mut self, value: u8) -> SerializationResult<()> {
        self.write_bytes(&[value])
    }

    /// Appends `bytes` at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::CapacityExceeded`] if the span does not
    /// fit; nothing is written in that case.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> SerializationResult<()> {
        self.reserve(bytes.len())?;
        let end = self.position + bytes.len();
        self.buffer[self.position..end].copy_from_slice(bytes);
        self.position = end;
        self.length = self.length.max(end);
        Ok(())
    }

    /// Moves the cursor without touching the logical length.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::SeekOutOfRange`] if `position` is past
    /// the current length.
    pub fn seek(&mut self, position: usize) -> SerializationResult<()> {
        if position > self.length {
            return Err(SerializationError::SeekOutOfRange {
                position,
                length: self.length,
            });
        }
        self.position = position;
        Ok(())
    }

    /// Drops everything past the cursor.
    #[inline]
    pub fn truncate(&mut self) {
        self.length = self.position;
    }

    /// Saves the current cursor.
    #[inline]
    #[must_use]
    pub const fn mark(&self) -> CursorMark {
        CursorMark(self.position)
    }

    /// Returns to `mark` and discards everything written after it.
    ///
    /// # Errors
    ///
    /// Returns [`SerializationError::SeekOutOfRange`] if the content was
    /// already truncated below `mark`.
    pub fn rewind(&mut self, mark: CursorMark) -> SerializationResult<()> {
        self.seek(mark.0)?;
        self.truncate();
        Ok(())
    }

    /// Empties the writer for reuse. Capacity is kept.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
        self.length = 0;
    }

    /// The written region `[0, length)`.
    #[inline]
    #[must_use]
    pub fn to_slice(&self) -> &[u8] {
        &self.buffer[..self.length]
    }

    /// Owned copy of the written region.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.to_slice().to_vec()
    }

    /// Zero-copy reader over the written region.
    #[must_use]
    pub fn reader(&self) -> BufferReader<'_> {
        BufferReader::new(self.to_slice())
    }

    /// Consumes the writer into a reader that owns the written bytes.
    #[must_use]
    pub fn into_reader(mut self) -> BufferReader<'static> {
        self.buffer.truncate(self.length);
        BufferReader::from_vec(self.buffer)
    }
}

impl Default for BufferWriter {
    fn default() -> Self {
        let config = BufferConfig::default();
        Self::growable(config.initial_capacity, config.effective_max_capacity())
    }
}
