//! # Thzlink
//!
//! Protocol engine for Stiebel Eltron / Tecalor THZ and LWZ integral
//! heat pumps, talking their proprietary half-duplex frame protocol over
//! a local serial port or a ser2net-style TCP bridge.
//!
//! The stack, bottom up:
//! - byte codec (sum-mod-256 checksum, DLE escape stuffing)
//! - frame builder/parser with the device's error headers
//! - 3-step handshake driver with bounded retry
//! - firmware-dependent register maps with layered overrides
//! - field decoder covering the pump's seven value encodings
//! - a session tying it together: firmware detection, bulk reads,
//!   validated parameter writes, raw dumps
//!
//! ## Example
//!
//! ```rust,no_run
//! use thzlink::{DeviceConfig, Session};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = DeviceConfig::default();
//!     let session = Session::connect(&config)?;
//!
//!     println!("firmware {}", session.firmware().version);
//!     for (name, value) in session.read_register("sGlobal")? {
//!         println!("{name}: {value}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;

// Re-exports for convenience
pub use crate::config::DeviceConfig;
pub use crate::core::decode::Value;
pub use crate::core::protocol::{HandshakePolicy, ProtocolError};
pub use crate::core::registers::{
    DecodeKind, EnumTable, FieldRule, FirmwareVariant, Register, RegisterMap, WriteRule,
};
pub use crate::core::session::{FirmwareInfo, Reading, Session, SessionError};
pub use crate::core::transport::{
    create_channel, Channel, ConnectionConfig, SerialConfig, TcpConfig, TransportError,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
