//! # Network Constants
//!
//! Values both peers must agree on.

/// Maximum Transmission Unit budget for a single message.
///
/// 1200 bytes stays below the 1500 byte Ethernet MTU on every path we care
/// about, including tunnels.
pub const MAX_PACKET_SIZE: usize = 1200;
