//! Frame construction and parsing
//!
//! Wire layout: `header(2) + checksum(1) + payload + footer(2)`. The
//! checksum covers header and payload with the checksum slot counted as
//! zero; checksum and payload are escape-stuffed on the wire, header and
//! footer never are. A reply payload starts with the echoed register
//! command.

use super::codec;
use super::{FOOTER, HEADER_GET, HEADER_SET};
use crate::core::transport::TransportError;
use thiserror::Error;

/// Protocol error types
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// No acknowledgement arrived within the step timeout
    #[error("handshake step {step} timed out")]
    HandshakeTimeout {
        /// Handshake step (0 = STX, 1 = command echo, 2 = data)
        step: u8,
    },

    /// The device answered a handshake step with something other than
    /// the expected acknowledgement (usually NAK)
    #[error("handshake step {step} rejected, got {got:#04x}")]
    HandshakeRejected {
        /// Handshake step (0 = STX, 1 = command echo, 2 = data)
        step: u8,
        /// First offending byte
        got: u8,
    },

    /// The data phase ended without a complete frame
    #[error("reply timed out with {} byte(s) of partial data", partial.len())]
    Timeout {
        /// Whatever arrived before the deadline, for diagnostics
        partial: Vec<u8>,
    },

    /// Frame shorter than header + checksum + footer
    #[error("frame too short: {0} byte(s)")]
    FrameTooShort(usize),

    /// Reply checksum does not match the frame contents
    #[error("checksum mismatch: received {received:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch {
        /// Checksum byte from the frame
        received: u8,
        /// Checksum calculated over the frame
        calculated: u8,
    },

    /// Device error header 01 01
    #[error("device reported a timing error")]
    TimingError,

    /// Device error header 01 02
    #[error("device rejected the request checksum")]
    ChecksumRejected,

    /// Device error header 01 03
    #[error("device does not know this command")]
    UnknownCommand,

    /// Device error header 01 04
    #[error("device does not know this register")]
    UnknownRegister,

    /// Reply header outside the known set
    #[error("unknown reply header {0:#06x}")]
    UnknownHeader(u16),

    /// Channel failure during the exchange
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

impl ProtocolError {
    /// Whether a retry of the whole handshake can reasonably help.
    /// Transport failures and device rejections are surfaced immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::HandshakeTimeout { .. } | Self::HandshakeRejected { .. } | Self::Timeout { .. }
        )
    }
}

fn build(header: [u8; 2], payload: &[u8]) -> Vec<u8> {
    // Checksum over header + zeroed checksum slot + payload.
    let mut sum_input = Vec::with_capacity(3 + payload.len());
    sum_input.extend_from_slice(&header);
    sum_input.push(0x00);
    sum_input.extend_from_slice(payload);
    let checksum = codec::checksum(&sum_input);

    let mut body = Vec::with_capacity(1 + payload.len());
    body.push(checksum);
    body.extend_from_slice(payload);

    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&header);
    frame.extend_from_slice(&codec::escape(&body));
    frame.extend_from_slice(&FOOTER);
    frame
}

/// Build a register read request (`01 00` header)
pub fn build_read(command: &[u8]) -> Vec<u8> {
    build(HEADER_GET, command)
}

/// Build a register write request (`01 80` header); `value` carries the
/// already-encoded parameter bytes
pub fn build_write(command: &[u8], value: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(command.len() + value.len());
    payload.extend_from_slice(command);
    payload.extend_from_slice(value);
    build(HEADER_SET, &payload)
}

/// Parse a raw reply frame into its payload (command echo + data).
///
/// Unescapes first, then dispatches on the header: read replies are
/// checksum-verified, write acknowledgements are returned verbatim after
/// the header, and the four device error headers map to their errors.
pub fn parse(raw: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if raw.len() < 5 {
        return Err(ProtocolError::FrameTooShort(raw.len()));
    }

    let data = codec::unescape(raw);
    if data.len() < 5 {
        return Err(ProtocolError::FrameTooShort(data.len()));
    }

    let header = [data[0], data[1]];
    match header {
        HEADER_GET => {
            let body = &data[..data.len() - 2]; // footer excluded from the sum
            let received = body[2];
            let calculated = body
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != 2)
                .fold(0u8, |acc, (_, &b)| acc.wrapping_add(b));
            if received != calculated {
                return Err(ProtocolError::ChecksumMismatch {
                    received,
                    calculated,
                });
            }
            Ok(body[3..].to_vec())
        }
        HEADER_SET => Ok(data[2..].to_vec()),
        [0x01, 0x01] => Err(ProtocolError::TimingError),
        [0x01, 0x02] => Err(ProtocolError::ChecksumRejected),
        [0x01, 0x03] => Err(ProtocolError::UnknownCommand),
        [0x01, 0x04] => Err(ProtocolError::UnknownRegister),
        _ => Err(ProtocolError::UnknownHeader(u16::from_be_bytes(header))),
    }
}
