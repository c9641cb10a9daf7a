//! # Packing
//!
//! Compact encodings for gameplay values.
//!
//! ## Layers
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ object    PackedValue + TypeTag, chosen at runtime         │
//! ├────────────────────────────────────────────────────────────┤
//! │ dispatch  Packable: primitives, enums, vectors, rays       │
//! ├──────────────────────────────┬─────────────────────────────┤
//! │ value     header-byte varint │ bit       tagged width class│
//! └──────────────────────────────┴─────────────────────────────┘
//! ```
//!
//! - Every write is built on the stack first and committed with one copy,
//!   so a failed write leaves the buffer as it was.
//! - Nothing on the wire is self-describing: reads mirror writes in order.

mod bit;
mod dispatch;
mod object;
mod value;

pub use bit::{
    bit_packed_size, read_bit_packed, read_bit_packed_signed, read_value_bit_packed,
    write_bit_packed, write_bit_packed_signed, write_value_bit_packed, BitPackable, WidthClass,
};
pub use dispatch::{
    read_enum_packed, read_packed, write_enum_packed, write_packed, EnumBacking, Packable,
    PackedEnum,
};
pub use object::{
    read_object_packed, read_object_packed_as, write_object_packed, EnumRepr, PackedValue,
    TypeTag,
};
pub use value::{
    packed_size_u64, read_i16_packed, read_i32_packed, read_i64_packed, read_i8_packed,
    read_u16_packed, read_u32_packed, read_u64_packed, read_u8_packed, write_i16_packed,
    write_i32_packed, write_i64_packed, write_i8_packed, write_u16_packed, write_u32_packed,
    write_u64_packed, write_u8_packed, MAX_VALUE_PACKED_SIZE,
};
