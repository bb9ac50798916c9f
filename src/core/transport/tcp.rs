//! TCP channel implementation (ser2net bridge)

use super::{Channel, TransportError, OPEN_SETTLE, READ_POLL};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// TCP endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl TcpConfig {
    /// Create a new TCP configuration
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 2000)
    }
}

/// TCP channel to a serial-over-network bridge
pub struct TcpChannel {
    config: TcpConfig,
    stream: Option<TcpStream>,
}

impl TcpChannel {
    /// Create a new TCP channel (not yet connected)
    pub fn new(config: TcpConfig) -> Self {
        Self {
            config,
            stream: None,
        }
    }
}

impl Channel for TcpChannel {
    fn open(&mut self) -> Result<(), TransportError> {
        let addr = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()
            .map_err(|e| TransportError::ConfigError(e.to_string()))?
            .next()
            .ok_or_else(|| {
                TransportError::ConfigError(format!("cannot resolve {}", self.config.host))
            })?;

        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        stream.set_read_timeout(Some(READ_POLL))?;
        stream.set_nodelay(true)?;

        self.stream = Some(stream);

        std::thread::sleep(OPEN_SETTLE);
        self.clear_buffers()?;

        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        stream.write_all(data)?;
        stream.flush()?;
        Ok(())
    }

    fn read_available(&mut self) -> Result<Bytes, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        let mut buffer = vec![0u8; 4096];
        match stream.read(&mut buffer) {
            Ok(0) => Err(TransportError::Disconnected),
            Ok(n) => {
                buffer.truncate(n);
                Ok(Bytes::from(buffer))
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                Ok(Bytes::new())
            }
            Err(e) => Err(TransportError::IoError(e)),
        }
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        // No kernel-side flush for sockets; drain whatever the bridge has
        // already queued instead.
        loop {
            match self.read_available() {
                Ok(data) if data.is_empty() => return Ok(()),
                Ok(_) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn endpoint(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}
