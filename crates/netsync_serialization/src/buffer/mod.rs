//! # Scratch Buffers
//!
//! One [`BufferWriter`] assembles one outgoing message; one [`BufferReader`]
//! walks one incoming message. Both carry their own cursor and no locks.

mod reader;
mod writer;

pub use reader::BufferReader;
pub use writer::{BufferWriter, CursorMark};
