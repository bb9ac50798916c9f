//! Byte channels for talking to the heat pump
//!
//! The protocol runs half-duplex over either a local serial port or a
//! ser2net-style TCP bridge. Both are blocking: the bus allows a single
//! request in flight, so async plumbing would buy nothing here.

mod serial;
mod tcp;

pub use serial::{list_ports, SerialChannel, SerialConfig};
pub use tcp::{TcpChannel, TcpConfig};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Settle delay after opening a channel, before the first handshake.
pub(crate) const OPEN_SETTLE: Duration = Duration::from_millis(100);

/// Per-read timeout on the underlying descriptor. Kept short; the
/// handshake driver does its own polling on top.
pub(crate) const READ_POLL: Duration = Duration::from_millis(10);

/// Connection endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConnectionConfig {
    /// Local serial port
    Serial(SerialConfig),
    /// TCP bridge (ser2net or similar)
    Tcp(TcpConfig),
}

impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial(cfg) => write!(f, "{} @ {} baud", cfg.port, cfg.baud_rate),
            Self::Tcp(cfg) => write!(f, "{}:{}", cfg.host, cfg.port),
        }
    }
}

/// Transport error types
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Not connected
    #[error("Not connected")]
    NotConnected,

    /// Disconnected
    #[error("Disconnected")]
    Disconnected,
}

/// Blocking byte channel the handshake driver runs over
pub trait Channel: Send {
    /// Open the channel
    fn open(&mut self) -> Result<(), TransportError>;

    /// Close the channel
    fn close(&mut self) -> Result<(), TransportError>;

    /// Check if the channel is open
    fn is_open(&self) -> bool;

    /// Write all bytes and flush
    fn write(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// Read whatever is available right now; empty when nothing arrived
    /// within the short per-read timeout
    fn read_available(&mut self) -> Result<Bytes, TransportError>;

    /// Discard pending input and output
    fn clear_buffers(&mut self) -> Result<(), TransportError>;

    /// Human-readable endpoint description
    fn endpoint(&self) -> String;
}

/// Create a channel from an endpoint configuration
pub fn create_channel(config: &ConnectionConfig) -> Box<dyn Channel> {
    match config {
        ConnectionConfig::Serial(cfg) => Box::new(SerialChannel::new(cfg.clone())),
        ConnectionConfig::Tcp(cfg) => Box::new(TcpChannel::new(cfg.clone())),
    }
}
