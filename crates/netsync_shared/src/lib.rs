//! # NETSYNC Shared
//!
//! Common types used by both client and server.
//!
//! Everything here is `#[repr(C)]` and `Pod`, so the serialization crate can
//! encode the types component by component and tests can compare decoded
//! values byte for byte.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::MAX_PACKET_SIZE;
pub use math::{Color, Color32, Quaternion, Ray, Ray2D, Vec2, Vec3, Vec4};
