//! Scripted in-memory channel for driving handshake and session tests

#![allow(dead_code)]

use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thzlink::{Channel, DeviceConfig, HandshakePolicy, TransportError};

/// Channel that answers each write with the next scripted reply.
///
/// The handshake writes STX, the request frame and two DLEs per
/// exchange; a successful exchange therefore consumes four script
/// entries (DLE ack, DLE STX ack, data frame, nothing).
pub struct ScriptedChannel {
    replies: VecDeque<Vec<u8>>,
    read_queue: VecDeque<u8>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
    clears: usize,
    byte_at_a_time: bool,
    open: bool,
}

impl ScriptedChannel {
    pub fn new(replies: Vec<Vec<u8>>) -> Self {
        Self {
            replies: replies.into(),
            read_queue: VecDeque::new(),
            writes: Arc::new(Mutex::new(Vec::new())),
            clears: 0,
            byte_at_a_time: false,
            open: true,
        }
    }

    /// Deliver replies one byte per read, exercising split
    /// acknowledgements and chunked frames
    pub fn byte_at_a_time(mut self) -> Self {
        self.byte_at_a_time = true;
        self
    }

    /// Shared handle on the write log, usable after the channel moved
    /// into a session
    pub fn write_log(&self) -> Arc<Mutex<Vec<Vec<u8>>>> {
        Arc::clone(&self.writes)
    }

    /// Number of `clear_buffers` calls seen so far
    pub fn clear_count(&self) -> usize {
        self.clears
    }
}

impl Channel for ScriptedChannel {
    fn open(&mut self) -> Result<(), TransportError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn write(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writes.lock().unwrap().push(data.to_vec());
        if let Some(reply) = self.replies.pop_front() {
            self.read_queue.extend(reply);
        }
        Ok(())
    }

    fn read_available(&mut self) -> Result<Bytes, TransportError> {
        if self.byte_at_a_time {
            match self.read_queue.pop_front() {
                Some(byte) => Ok(Bytes::copy_from_slice(&[byte])),
                None => Ok(Bytes::new()),
            }
        } else {
            let drained: Vec<u8> = self.read_queue.drain(..).collect();
            Ok(Bytes::from(drained))
        }
    }

    fn clear_buffers(&mut self) -> Result<(), TransportError> {
        self.clears += 1;
        self.read_queue.clear();
        Ok(())
    }

    fn endpoint(&self) -> String {
        "scripted".to_string()
    }
}

// ============ Frame and script builders ============

pub const DLE: u8 = 0x10;
pub const STX: u8 = 0x02;
pub const NAK: u8 = 0x15;

/// Build a read-reply frame around a payload (command echo + data)
pub fn reply_frame(payload: &[u8]) -> Vec<u8> {
    let mut sum_input = vec![0x01, 0x00, 0x00];
    sum_input.extend_from_slice(payload);
    let checksum = sum_input
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));

    let mut body = vec![checksum];
    body.extend_from_slice(payload);

    let mut escaped = Vec::new();
    for &byte in &body {
        match byte {
            0x10 => escaped.extend_from_slice(&[0x10, 0x10]),
            0x2B => escaped.extend_from_slice(&[0x2B, 0x18]),
            _ => escaped.push(byte),
        }
    }

    let mut frame = vec![0x01, 0x00];
    frame.extend_from_slice(&escaped);
    frame.extend_from_slice(&[0x10, 0x03]);
    frame
}

/// Write-acknowledgement frame
pub fn set_ack_frame() -> Vec<u8> {
    vec![0x01, 0x80, 0x7D, 0x10, 0x03]
}

/// Script entries for one successful exchange answering with `frame`
pub fn exchange_script(frame: Vec<u8>) -> Vec<Vec<u8>> {
    vec![vec![DLE], vec![DLE, STX], frame, vec![]]
}

/// Script entries for consecutive successful exchanges
pub fn script(frames: &[Vec<u8>]) -> Vec<Vec<u8>> {
    frames
        .iter()
        .flat_map(|frame| exchange_script(frame.clone()))
        .collect()
}

/// Firmware-detection reply for a raw version word
pub fn firmware_frame(raw: u16) -> Vec<u8> {
    let word = raw.to_be_bytes();
    reply_frame(&[0xFD, word[0], word[1]])
}

/// Config with near-zero timing for tests
pub fn test_config() -> DeviceConfig {
    DeviceConfig {
        handshake: test_policy(),
        inter_request_pause_ms: 0,
        ..DeviceConfig::default()
    }
}

/// Policy with near-zero timing for tests
pub fn test_policy() -> HandshakePolicy {
    HandshakePolicy {
        ack_timeout_ms: 20,
        echo_timeout_ms: 20,
        read_timeout_ms: 50,
        poll_interval_ms: 1,
        max_iterations: 300,
        retries: 3,
        retry_delay_ms: 5,
    }
}
