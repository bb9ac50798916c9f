//! Serial port channel implementation

use super::{Channel, TransportError, OPEN_SETTLE, READ_POLL};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};

/// Serial port configuration
///
/// The heat pump bus is fixed at 8N1; only port and baud rate vary
/// between installations (115200 on current boards, 9600 on some very
/// old ones).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port name (e.g., COM3, /dev/ttyUSB0)
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
}

impl SerialConfig {
    /// Create a new serial configuration
    pub fn new(port: &str, baud_rate: u32) -> Self {
        Self {
            port: port.to_string(),
            baud_rate,
        }
    }

    /// Set baud rate
    #[must_use]
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new("/dev/ttyUSB0", 115200)
    }
}

/// Serial port channel
pub struct SerialChannel {
    config: SerialConfig,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialChannel {
    /// Create a new serial channel (not yet open)
    pub fn new(config: SerialConfig) -> Self {
        Self { config, port: None }
    }
}

impl Channel for SerialChannel {
    fn open(&mut self) -> Result<(), TransportError> {
        let port = serialport::new(&self.config.port, self.config.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(READ_POLL)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => {
                    TransportError::PortNotFound(self.config.port.clone())
                }
                serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                    TransportError::PermissionDenied(self.config.port.clone())
                }
                _ => TransportError::ConnectionFailed(e.to_string()),
            })?;

        self.port = Some(port);

        // Give USB adapters time to assert their lines before the first STX.
        std::thread::sleep(OPEN_SETTLE);
        self.clear_buffers()?;

        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.port = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::NotConnected)?;
        port.write_all(data)?;
        port.flush()?;
        Ok(())
    }

    fn read_available(&mut self) -> Result<Bytes, TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::NotConnected)?;

        let mut buffer = vec![0u8; 4096];
        match port.read(&mut buffer) {
            Ok(0) => Err(TransportError::Disconnected),
            Ok(n) => {
                buffer.truncate(n);
                Ok(Bytes::from(buffer))
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                // No data available
                Ok(Bytes::new())
            }
            Err(e) => Err(TransportError::IoError(e)),
        }
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        let port = self.port.as_mut().ok_or(TransportError::NotConnected)?;
        port.clear(ClearBuffer::All)
            .map_err(|e| TransportError::IoError(e.into()))?;
        Ok(())
    }

    fn endpoint(&self) -> String {
        format!("{} @ {} baud (8N1)", self.config.port, self.config.baud_rate)
    }
}

/// List available serial ports
pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>, TransportError> {
    serialport::available_ports().map_err(|e| TransportError::IoError(e.into()))
}
