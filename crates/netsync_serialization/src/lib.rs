//! # Netsync Serialization - Compact Wire Codec
//!
//! Byte-level encoding layer for state-sync messages.
//!
//! ## Architecture
//!
//! - **Buffers**: [`BufferWriter`] assembles one outgoing message with
//!   bounded growth, [`BufferReader`] walks one incoming message
//! - **Value packing**: header-byte varints, 1 byte for 0..=240
//! - **Bit packing**: width-class tagged integers up to 61 bits
//! - **Dispatch**: [`Packable`] for primitives, enums and math types
//! - **Object path**: [`PackedValue`] + [`TypeTag`] for runtime-typed values
//!
//! ## Guarantees
//!
//! - A failed write commits nothing; a failed read never moves past the
//!   end of the region
//! - Object-path bytes are identical to typed-path bytes
//! - Little-endian everywhere, independent of the host
//!
//! ## Example
//!
//! ```rust,ignore
//! use netsync_serialization::{read_packed, write_packed, BufferWriter};
//! use netsync_shared::Vec3;
//!
//! let mut writer = BufferWriter::new(1200);
//! write_packed(&mut writer, &42u32)?;
//! write_packed(&mut writer, &Vec3::new(1.0, 2.0, 3.0))?;
//!
//! let mut reader = writer.reader();
//! let id: u32 = read_packed(&mut reader)?;
//! let position: Vec3 = read_packed(&mut reader)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod arithmetic;
pub mod buffer;
pub mod config;
pub mod error;
pub mod packing;

// Re-exports for convenience
pub use buffer::{BufferReader, BufferWriter, CursorMark};
pub use config::BufferConfig;
pub use error::{SerializationError, SerializationResult};
pub use packing::{
    bit_packed_size, packed_size_u64, read_bit_packed, read_bit_packed_signed, read_enum_packed,
    read_object_packed, read_object_packed_as, read_packed, read_value_bit_packed,
    write_bit_packed, write_bit_packed_signed, write_enum_packed, write_object_packed,
    write_packed, write_value_bit_packed, BitPackable, EnumBacking, EnumRepr, Packable,
    PackedEnum, PackedValue, TypeTag, WidthClass, MAX_VALUE_PACKED_SIZE,
};
