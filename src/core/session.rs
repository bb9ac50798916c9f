//! Device session: firmware detection, register reads and writes
//!
//! A session owns its channel behind a mutex; the bus is half-duplex
//! with a single request in flight, so every exchange takes the lock for
//! the full handshake.

use crate::config::DeviceConfig;
use crate::core::decode::{self, Value};
use crate::core::protocol::{frame, HandshakeDriver, HandshakePolicy, ProtocolError};
use crate::core::registers::{FirmwareVariant, Register, RegisterMap};
use crate::core::transport::{create_channel, Channel, TransportError};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Decoded readings keyed by field name
pub type Reading = BTreeMap<String, Value>;

/// Firmware variant every unrecognised version falls back to
const FALLBACK_VARIANT: FirmwareVariant = FirmwareVariant::Fw439;

/// Session error types
#[derive(Error, Debug)]
pub enum SessionError {
    /// Protocol-level failure
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Channel failure outside an exchange
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Register name not present in the active map
    #[error("unknown register: {0}")]
    UnknownRegisterName(String),

    /// Parameter name not writable in the active map
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Write value outside the parameter's accepted range
    #[error("value {value} out of range {min}..{max} for {name}")]
    ValueOutOfRange {
        /// Parameter name
        name: String,
        /// Rejected value
        value: f64,
        /// Minimum accepted value
        min: f64,
        /// Maximum accepted value
        max: f64,
    },

    /// Firmware version has no register map and strict mode is on
    #[error("unrecognised firmware version {0} (strict mode)")]
    UnknownFirmware(String),

    /// Reply shorter than the expected word
    #[error("short reply for {0}")]
    ShortReply(String),

    /// Every register of a read-all failed
    #[error("all register reads failed, last error: {0}")]
    CommunicationFailure(String),
}

/// Detected firmware identity
#[derive(Debug, Clone)]
pub struct FirmwareInfo {
    /// Raw scaled word from the FD register (e.g. 439)
    pub raw: u16,
    /// Formatted version, two-digit minor (e.g. "4.39")
    pub version: String,
    /// Register map variant in use (after any fallback or override)
    pub variant: FirmwareVariant,
}

/// Format a raw firmware word as `major.minor` with a two-digit minor
pub fn format_version(raw: u16) -> String {
    format!("{}.{:02}", raw / 100, raw % 100)
}

/// An open connection to one heat pump
pub struct Session {
    channel: Mutex<Box<dyn Channel>>,
    policy: HandshakePolicy,
    pause: Duration,
    firmware: FirmwareInfo,
    map: RegisterMap,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("policy", &self.policy)
            .field("pause", &self.pause)
            .field("firmware", &self.firmware)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Open the configured endpoint, detect firmware and build the map
    pub fn connect(config: &DeviceConfig) -> Result<Self, SessionError> {
        let channel = create_channel(&config.connection);
        Self::from_channel(channel, config)
    }

    /// Run session setup over an already-constructed channel
    pub fn from_channel(
        mut channel: Box<dyn Channel>,
        config: &DeviceConfig,
    ) -> Result<Self, SessionError> {
        if !channel.is_open() {
            channel.open()?;
        }
        info!(endpoint = %channel.endpoint(), "channel open");

        let policy = config.handshake.clone();
        let raw = detect_firmware(channel.as_mut(), &policy)?;
        let version = format_version(raw);

        let variant = match &config.firmware_override {
            Some(forced) => FirmwareVariant::from_version(forced)
                .ok_or_else(|| SessionError::UnknownFirmware(forced.clone()))?,
            None => match FirmwareVariant::from_version(&version) {
                Some(variant) => variant,
                None if config.strict_firmware => {
                    return Err(SessionError::UnknownFirmware(version));
                }
                None => {
                    warn!(
                        version = %version,
                        fallback = %FALLBACK_VARIANT,
                        "unrecognised firmware version, using fallback register map"
                    );
                    FALLBACK_VARIANT
                }
            },
        };
        info!(version = %version, variant = %variant, "firmware detected");

        Ok(Self {
            channel: Mutex::new(channel),
            policy,
            pause: Duration::from_millis(config.inter_request_pause_ms),
            firmware: FirmwareInfo {
                raw,
                version,
                variant,
            },
            map: RegisterMap::for_variant(variant),
        })
    }

    /// Detected firmware identity
    pub fn firmware(&self) -> &FirmwareInfo {
        &self.firmware
    }

    /// Active register map
    pub fn map(&self) -> &RegisterMap {
        &self.map
    }

    /// Close the channel
    pub fn close(&self) -> Result<(), SessionError> {
        self.channel.lock().close()?;
        Ok(())
    }

    /// One full handshake for a prebuilt request frame
    fn exchange(&self, request: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let mut channel = self.channel.lock();
        let raw = HandshakeDriver::new(channel.as_mut(), &self.policy).exchange(request)?;
        frame::parse(&raw)
    }

    /// Read the unsigned word following the command echo
    fn read_word(&self, name: &str, command: &[u8]) -> Result<u16, SessionError> {
        let payload = self.exchange(&frame::build_read(command))?;
        word_after_echo(&payload, command.len())
            .ok_or_else(|| SessionError::ShortReply(name.to_string()))
    }

    /// Read and decode one register by name
    pub fn read_register(&self, name: &str) -> Result<Reading, SessionError> {
        let register = self
            .map
            .register(name)
            .ok_or_else(|| SessionError::UnknownRegisterName(name.to_string()))?
            .clone();

        match register.pair_command {
            Some(pair) => {
                let low = self.read_word(register.name, register.command)?;
                std::thread::sleep(self.pause);
                let high = self.read_word(register.name, pair)?;
                let value = f64::from(high) * 1000.0 + f64::from(low);
                debug!(register = register.name, low, high, value, "combined counter");

                let mut out = Reading::new();
                out.insert(register.name.to_string(), Value::Number(value));
                Ok(out)
            }
            None => {
                let payload = self.exchange(&frame::build_read(register.command))?;
                Ok(decode::decode_fields(&payload, &register.fields))
            }
        }
    }

    /// Read every register of the active map into one flat reading.
    /// Failed registers are logged and skipped; later fields win name
    /// collisions. Errors out only when nothing could be read at all.
    pub fn read_all(&self) -> Result<Reading, SessionError> {
        let names: Vec<&str> = self.map.registers().map(|r| r.name).collect();

        let mut out = Reading::new();
        let mut last_err: Option<SessionError> = None;
        let mut any_ok = false;

        for name in names {
            match self.read_register(name) {
                Ok(reading) => {
                    out.extend(reading);
                    any_ok = true;
                }
                Err(e) => {
                    warn!(register = name, error = %e, "register read failed, skipping");
                    last_err = Some(e);
                }
            }
            std::thread::sleep(self.pause);
        }

        match (any_ok, last_err) {
            (false, Some(e)) => Err(SessionError::CommunicationFailure(e.to_string())),
            _ => Ok(out),
        }
    }

    /// Write a parameter after validating it against the map's range
    pub fn write_parameter(&self, name: &str, value: f64) -> Result<(), SessionError> {
        let rule = *self
            .map
            .write_rule(name)
            .ok_or_else(|| SessionError::UnknownParameter(name.to_string()))?;

        if value < rule.min || value > rule.max {
            return Err(SessionError::ValueOutOfRange {
                name: name.to_string(),
                value,
                min: rule.min,
                max: rule.max,
            });
        }

        let encoded = decode::encode_value(value, &rule);
        info!(parameter = name, value, encoded = %hex::encode(&encoded), "writing parameter");
        self.exchange(&frame::build_write(rule.command, &encoded))?;
        Ok(())
    }

    /// Read every distinct command once and return raw payload hex keyed
    /// by command hex. Failed commands are skipped with a warning.
    pub fn dump_raw(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let commands = self.map.commands();

        let mut out = BTreeMap::new();
        for (name, command) in commands {
            let key = hex::encode_upper(command);
            match self.exchange(&frame::build_read(command)) {
                Ok(payload) => {
                    out.insert(key, hex::encode_upper(payload));
                }
                Err(e) => {
                    warn!(register = name, command = %key, error = %e, "dump read failed");
                }
            }
            std::thread::sleep(self.pause);
        }
        Ok(out)
    }

    /// Registers readable with the active map, in read-all order
    pub fn register_names(&self) -> Vec<&'static str> {
        self.map.registers().map(|r| r.name).collect()
    }

    /// Reference to a register definition, for CLI listings
    pub fn register_info(&self, name: &str) -> Option<&Register> {
        self.map.register(name)
    }
}

/// Detect the firmware word by reading the FD register outside any map
fn detect_firmware(
    channel: &mut dyn Channel,
    policy: &HandshakePolicy,
) -> Result<u16, SessionError> {
    const FIRMWARE_COMMAND: &[u8] = &[0xFD];

    let raw = HandshakeDriver::new(channel, policy).exchange(&frame::build_read(FIRMWARE_COMMAND))?;
    let payload = frame::parse(&raw)?;
    word_after_echo(&payload, FIRMWARE_COMMAND.len())
        .ok_or_else(|| SessionError::ShortReply("sFirmware".to_string()))
}

/// Big-endian u16 immediately following the command echo
fn word_after_echo(payload: &[u8], echo_len: usize) -> Option<u16> {
    let bytes = payload.get(echo_len..echo_len + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}
