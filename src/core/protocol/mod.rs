//! Wire protocol for THZ/LWZ heat pumps
//!
//! Covers the byte-level codec (checksum and escape stuffing), frame
//! construction and parsing, and the 3-step serial handshake the control
//! board requires before it releases a data frame.

pub mod codec;
pub mod frame;
pub mod handshake;

pub use frame::{build_read, build_write, parse, ProtocolError};
pub use handshake::{HandshakeDriver, HandshakePolicy};

/// Start of Text - opens every handshake.
pub const STX: u8 = 0x02;

/// End of Text - second footer byte.
pub const ETX: u8 = 0x03;

/// Data Link Escape - acknowledgement byte and escape prefix.
pub const DLE: u8 = 0x10;

/// Negative acknowledge.
pub const NAK: u8 = 0x15;

/// Header of a register read request and its reply.
pub const HEADER_GET: [u8; 2] = [0x01, 0x00];

/// Header of a register write request and its acknowledgement.
pub const HEADER_SET: [u8; 2] = [0x01, 0x80];

/// Frame footer: DLE ETX.
pub const FOOTER: [u8; 2] = [DLE, ETX];
