//! Device configuration with TOML load/save

use crate::core::protocol::HandshakePolicy;
use crate::core::transport::{ConnectionConfig, SerialConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything needed to talk to one heat pump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Connection endpoint (serial port or TCP bridge)
    pub connection: ConnectionConfig,
    /// Handshake timing and retry policy
    #[serde(default)]
    pub handshake: HandshakePolicy,
    /// Pause between consecutive register reads, in milliseconds
    #[serde(default = "default_pause_ms")]
    pub inter_request_pause_ms: u64,
    /// Error out instead of falling back to the default register map
    /// when the firmware version is unrecognised
    #[serde(default)]
    pub strict_firmware: bool,
    /// Force a register map variant regardless of the detected version
    /// (e.g. "5.39technician")
    #[serde(default)]
    pub firmware_override: Option<String>,
}

fn default_pause_ms() -> u64 {
    100
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::Serial(SerialConfig::default()),
            handshake: HandshakePolicy::default(),
            inter_request_pause_ms: default_pause_ms(),
            strict_firmware: false,
            firmware_override: None,
        }
    }
}

impl DeviceConfig {
    /// Load config from a TOML file; missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
