//! 3-step request handshake
//!
//! The control board is strictly master/slave and wants to be talked to
//! like this:
//!
//! 1. send STX, wait for DLE
//! 2. send the request frame, wait for DLE STX (the STX may lag or the
//!    DLE may be swallowed by slow adapters)
//! 3. send DLE, accumulate the reply until it starts with 0x01 and ends
//!    with the 10 03 footer, then send a final DLE
//!
//! A NAK at any step aborts the attempt. Attempts are retried a bounded
//! number of times with cleared buffers and a fixed delay in between.

use super::frame::ProtocolError;
use super::{DLE, NAK, STX};
use crate::core::transport::Channel;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Timing and retry policy for the handshake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakePolicy {
    /// Timeout for the DLE acknowledgement of STX, in milliseconds
    pub ack_timeout_ms: u64,
    /// Timeout for the DLE STX acknowledgement of the frame, in milliseconds
    pub echo_timeout_ms: u64,
    /// Overall deadline for the data phase, in milliseconds
    pub read_timeout_ms: u64,
    /// Poll interval while waiting for bytes, in milliseconds
    pub poll_interval_ms: u64,
    /// Upper bound on data-phase poll iterations
    pub max_iterations: u32,
    /// Number of attempts before giving up
    pub retries: u32,
    /// Delay between attempts, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for HandshakePolicy {
    fn default() -> Self {
        Self {
            ack_timeout_ms: 1000,
            echo_timeout_ms: 1000,
            read_timeout_ms: 2000,
            poll_interval_ms: 5,
            max_iterations: 300,
            retries: 3,
            retry_delay_ms: 800,
        }
    }
}

impl HandshakePolicy {
    /// STX acknowledgement timeout
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }

    /// Frame acknowledgement timeout
    pub fn echo_timeout(&self) -> Duration {
        Duration::from_millis(self.echo_timeout_ms)
    }

    /// Data phase deadline
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Poll interval
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Inter-attempt delay
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Drives the handshake over a channel
pub struct HandshakeDriver<'a> {
    channel: &'a mut dyn Channel,
    policy: &'a HandshakePolicy,
    /// Bytes read past what the current step consumed. The DLE and STX of
    /// step 1 often arrive in one chunk.
    pending: Vec<u8>,
}

impl<'a> HandshakeDriver<'a> {
    /// Create a driver borrowing the channel for one or more exchanges
    pub fn new(channel: &'a mut dyn Channel, policy: &'a HandshakePolicy) -> Self {
        Self {
            channel,
            policy,
            pending: Vec::new(),
        }
    }

    /// Send a request frame and return the raw reply frame, retrying
    /// transient failures up to the policy's attempt count
    pub fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let mut last_err = None;
        for attempt in 1..=self.policy.retries.max(1) {
            match self.attempt(request) {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_transient() => {
                    warn!(attempt, error = %e, "handshake attempt failed");
                    last_err = Some(e);
                    if attempt < self.policy.retries {
                        let _ = self.channel.clear_buffers();
                        std::thread::sleep(self.policy.retry_delay());
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_err.unwrap_or(ProtocolError::HandshakeTimeout { step: 0 }))
    }

    fn attempt(&mut self, request: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        self.pending.clear();
        self.channel.clear_buffers()?;

        // Step 0: STX, expect DLE.
        trace!("step 0: sending STX");
        self.channel.write(&[STX])?;
        match self.read_one(self.policy.ack_timeout())? {
            None => return Err(ProtocolError::HandshakeTimeout { step: 0 }),
            Some(DLE) => {}
            Some(got) => return Err(ProtocolError::HandshakeRejected { step: 0, got }),
        }

        // Step 1: request frame, expect DLE STX. Some adapters deliver the
        // two bytes separately, some drop the DLE entirely.
        trace!(frame = %hex::encode(request), "step 1: sending request");
        self.channel.write(request)?;
        match self.read_one(self.policy.echo_timeout())? {
            None => return Err(ProtocolError::HandshakeTimeout { step: 1 }),
            Some(STX) => {}
            Some(DLE) => match self.read_one(self.policy.echo_timeout())? {
                Some(STX) => {}
                Some(got) => return Err(ProtocolError::HandshakeRejected { step: 1, got }),
                None => return Err(ProtocolError::HandshakeTimeout { step: 1 }),
            },
            Some(got) => return Err(ProtocolError::HandshakeRejected { step: 1, got }),
        }

        // Step 2: DLE releases the data frame.
        trace!("step 2: requesting data");
        self.channel.write(&[DLE])?;
        let reply = self.read_frame()?;

        // Final acknowledgement; without it the board stalls the next poll.
        self.channel.write(&[DLE])?;

        debug!(frame = %hex::encode(&reply), "reply received");
        Ok(reply)
    }

    /// Read a single byte, polling until the deadline
    fn read_one(&mut self, timeout: Duration) -> Result<Option<u8>, ProtocolError> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.pending.is_empty() {
                return Ok(Some(self.pending.remove(0)));
            }
            let chunk = self.channel.read_available()?;
            if !chunk.is_empty() {
                self.pending.extend_from_slice(&chunk);
                continue;
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(self.policy.poll_interval());
        }
    }

    /// Accumulate the data frame until it is complete
    fn read_frame(&mut self) -> Result<Vec<u8>, ProtocolError> {
        let mut buffer: Vec<u8> = std::mem::take(&mut self.pending);
        let deadline = Instant::now() + self.policy.read_timeout();

        if buffer == [NAK] {
            return Err(ProtocolError::HandshakeRejected { step: 2, got: NAK });
        }
        if frame_complete(&buffer) {
            return Ok(buffer);
        }

        for _ in 0..self.policy.max_iterations {
            let chunk = self.channel.read_available()?;
            if chunk.is_empty() {
                if Instant::now() >= deadline {
                    break;
                }
                std::thread::sleep(self.policy.poll_interval());
                continue;
            }

            buffer.extend_from_slice(&chunk);

            if buffer == [NAK] {
                return Err(ProtocolError::HandshakeRejected { step: 2, got: NAK });
            }
            if frame_complete(&buffer) {
                return Ok(buffer);
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        Err(ProtocolError::Timeout { partial: buffer })
    }
}

/// A frame is complete when it opens with 0x01 and closes with the
/// 10 03 footer. Escaped DLEs inside the body cannot produce a false
/// footer because they arrive doubled.
fn frame_complete(buffer: &[u8]) -> bool {
    buffer.len() >= 5 && buffer[0] == 0x01 && buffer.ends_with(&[0x10, 0x03])
}
