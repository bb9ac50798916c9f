//! Handshake driver behaviour over a scripted channel

mod common;

use common::{
    exchange_script, reply_frame, test_policy, ScriptedChannel, DLE, NAK, STX,
};
use thzlink::core::protocol::{build_read, HandshakeDriver, ProtocolError};

#[test]
fn exchange_happy_path() {
    let frame = reply_frame(&[0xFB, 0x00, 0xC8]);
    let mut channel = ScriptedChannel::new(exchange_script(frame.clone()));
    let log = channel.write_log();
    let policy = test_policy();

    let request = build_read(&[0xFB]);
    let reply = HandshakeDriver::new(&mut channel, &policy)
        .exchange(&request)
        .unwrap();
    assert_eq!(reply, frame);

    let writes = log.lock().unwrap();
    assert_eq!(writes.len(), 4);
    assert_eq!(writes[0], vec![STX]);
    assert_eq!(writes[1], request);
    assert_eq!(writes[2], vec![DLE]);
    assert_eq!(writes[3], vec![DLE]);
}

#[test]
fn exchange_handles_split_acknowledgements() {
    let frame = reply_frame(&[0xFB, 0x00, 0xC8]);
    let mut channel = ScriptedChannel::new(exchange_script(frame.clone())).byte_at_a_time();
    let policy = test_policy();

    let reply = HandshakeDriver::new(&mut channel, &policy)
        .exchange(&build_read(&[0xFB]))
        .unwrap();
    assert_eq!(reply, frame);
}

#[test]
fn exchange_accepts_bare_stx_acknowledgement() {
    let frame = reply_frame(&[0xFB, 0x00, 0xC8]);
    let script = vec![vec![DLE], vec![STX], frame.clone(), vec![]];
    let mut channel = ScriptedChannel::new(script);
    let policy = test_policy();

    let reply = HandshakeDriver::new(&mut channel, &policy)
        .exchange(&build_read(&[0xFB]))
        .unwrap();
    assert_eq!(reply, frame);
}

#[test]
fn silent_device_exhausts_retries() {
    let mut channel = ScriptedChannel::new(Vec::new());
    let log = channel.write_log();
    let policy = test_policy();

    let err = HandshakeDriver::new(&mut channel, &policy)
        .exchange(&build_read(&[0xFB]))
        .unwrap_err();
    assert!(matches!(err, ProtocolError::HandshakeTimeout { step: 0 }));

    // one STX per attempt
    let stx_writes = log
        .lock()
        .unwrap()
        .iter()
        .filter(|w| w.as_slice() == [STX])
        .count();
    assert_eq!(stx_writes, 3);

    // buffers are cleared at the start of every attempt and again
    // between attempts, so a stale reply never leaks into a resend
    assert_eq!(channel.clear_count(), 5);
}

#[test]
fn nak_aborts_the_attempt_then_retry_succeeds() {
    let frame = reply_frame(&[0xFB, 0x00, 0xC8]);
    let mut script = vec![vec![NAK]];
    script.extend(exchange_script(frame.clone()));
    let mut channel = ScriptedChannel::new(script);
    let policy = test_policy();

    let reply = HandshakeDriver::new(&mut channel, &policy)
        .exchange(&build_read(&[0xFB]))
        .unwrap();
    assert_eq!(reply, frame);
}

#[test]
fn nak_during_data_phase_is_a_rejection() {
    let mut policy = test_policy();
    policy.retries = 1;
    let script = vec![vec![DLE], vec![DLE, STX], vec![NAK]];
    let mut channel = ScriptedChannel::new(script);

    let err = HandshakeDriver::new(&mut channel, &policy)
        .exchange(&build_read(&[0xFB]))
        .unwrap_err();
    assert!(matches!(
        err,
        ProtocolError::HandshakeRejected { step: 2, got } if got == NAK
    ));
}

#[test]
fn incomplete_frame_times_out_with_partial_data() {
    let mut policy = test_policy();
    policy.retries = 1;
    // data phase delivers a frame with no footer
    let script = vec![vec![DLE], vec![DLE, STX], vec![0x01, 0x00, 0xFC, 0xFB]];
    let mut channel = ScriptedChannel::new(script);

    let err = HandshakeDriver::new(&mut channel, &policy)
        .exchange(&build_read(&[0xFB]))
        .unwrap_err();
    match err {
        ProtocolError::Timeout { partial } => assert_eq!(partial, vec![0x01, 0x00, 0xFC, 0xFB]),
        other => panic!("expected Timeout, got {other:?}"),
    }
}
