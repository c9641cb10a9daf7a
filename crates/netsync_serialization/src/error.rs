//! # Serialization Error Types
//!
//! All errors the codec can report. Every one of them is raised at the call
//! site before any byte is committed, so a buffer that returned an error is
//! still in a consistent state.

use thiserror::Error;

use crate::packing::TypeTag;

/// Errors that can occur while packing or unpacking values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// A write does not fit the buffer and the buffer cannot grow far enough.
    #[error("capacity exceeded: requested {requested} bytes, {available} available")]
    CapacityExceeded {
        /// Bytes the write needed past the cursor.
        requested: usize,
        /// Bytes the buffer could still provide past the cursor.
        available: usize,
    },

    /// A read asks for more bytes than remain in the region.
    #[error("out of bounds: requested {requested} bytes, {remaining} remaining")]
    OutOfBounds {
        /// Bytes the read needed.
        requested: usize,
        /// Bytes left after the cursor.
        remaining: usize,
    },

    /// A magnitude is wider than the declared width allows.
    #[error("domain overflow: value needs {bits} bits, width allows {max_bits}")]
    DomainOverflow {
        /// Bit length of the offending value.
        bits: u32,
        /// Widest value the target accepts.
        max_bits: u32,
    },

    /// The runtime-typed path was handed a tag that does not match the value.
    #[error("type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        /// Tag the caller asked for.
        expected: TypeTag,
        /// Tag of the value or type actually involved.
        actual: TypeTag,
    },

    /// A cursor move past the logical end of the buffer.
    #[error("seek out of range: position {position}, length {length}")]
    SeekOutOfRange {
        /// Requested cursor position.
        position: usize,
        /// Logical length of the buffer.
        length: usize,
    },

    /// A decoded enum discriminant has no matching variant.
    #[error("invalid enum value: {value}")]
    InvalidEnumValue {
        /// The decoded backing integer.
        value: i128,
    },

    /// A decoded UTF-16 code unit is a lone surrogate.
    #[error("invalid character code unit: {code_unit:#06x}")]
    InvalidChar {
        /// The decoded code unit.
        code_unit: u16,
    },

    /// Invalid buffer configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for serialization operations.
pub type SerializationResult<T> = Result<T, SerializationError>;
