//! Session behaviour over a scripted channel

mod common;

use common::{
    firmware_frame, reply_frame, script, set_ack_frame, test_config, ScriptedChannel,
};
use thzlink::{FirmwareVariant, Session, SessionError, Value};

#[test]
fn probe_detects_firmware() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(439)]));
    let session = Session::from_channel(Box::new(channel), &test_config()).unwrap();

    assert_eq!(session.firmware().raw, 439);
    assert_eq!(session.firmware().version, "4.39");
    assert_eq!(session.firmware().variant, FirmwareVariant::Fw439);
}

#[test]
fn unknown_firmware_falls_back() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(702)]));
    let session = Session::from_channel(Box::new(channel), &test_config()).unwrap();

    assert_eq!(session.firmware().version, "7.02");
    assert_eq!(session.firmware().variant, FirmwareVariant::Fw439);
}

#[test]
fn unknown_firmware_errors_in_strict_mode() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(702)]));
    let mut config = test_config();
    config.strict_firmware = true;

    let err = Session::from_channel(Box::new(channel), &config).unwrap_err();
    assert!(matches!(err, SessionError::UnknownFirmware(v) if v == "7.02"));
}

#[test]
fn firmware_override_forces_the_map() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(439)]));
    let mut config = test_config();
    config.firmware_override = Some("5.39technician".to_string());

    let session = Session::from_channel(Box::new(channel), &config).unwrap();
    assert_eq!(session.firmware().variant, FirmwareVariant::Fw539Technician);
    // technician map carries the pump-rate parameters
    assert!(session.map().write_rule("p99PumpRateHC").is_some());
}

#[test]
fn read_register_decodes_a_captured_frame() {
    let global = hex::decode("FBFDA8002A01170116022F01C18001FDA8").unwrap();
    let channel =
        ScriptedChannel::new(script(&[firmware_frame(439), reply_frame(&global)]));
    let session = Session::from_channel(Box::new(channel), &test_config()).unwrap();

    let reading = session.read_register("sGlobal").unwrap();
    assert_eq!(reading.get("collectorTemp"), Some(&Value::Number(-60.0)));
    assert_eq!(reading.get("outsideTemp"), Some(&Value::Number(4.2)));
    assert_eq!(reading.get("dhwTemp"), Some(&Value::Number(44.9)));
    // truncated frame leaves later fields out
    assert!(!reading.contains_key("flowRate"));
}

#[test]
fn read_register_rejects_unknown_names() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(439)]));
    let session = Session::from_channel(Box::new(channel), &test_config()).unwrap();

    let err = session.read_register("sNonsense").unwrap_err();
    assert!(matches!(err, SessionError::UnknownRegisterName(name) if name == "sNonsense"));
}

#[test]
fn combined_energy_counter_reads_both_words() {
    let low = reply_frame(&[0x0A, 0x09, 0x24, 0x01, 0x23]); // 291
    let high = reply_frame(&[0x0A, 0x09, 0x25, 0x00, 0x02]); // 2
    let channel = ScriptedChannel::new(script(&[firmware_frame(439), low, high]));
    let session = Session::from_channel(Box::new(channel), &test_config()).unwrap();

    let reading = session.read_register("sBoostDHWTotal").unwrap();
    assert_eq!(
        reading.get("sBoostDHWTotal"),
        Some(&Value::Number(2291.0))
    );
}

#[test]
fn read_all_returns_partial_results() {
    // only sGlobal answers; every later register times out
    let global = hex::decode("FBFDA8002A01170116022F01C18001FDA8").unwrap();
    let channel =
        ScriptedChannel::new(script(&[firmware_frame(206), reply_frame(&global)]));
    let mut config = test_config();
    config.handshake.retries = 1;

    let session = Session::from_channel(Box::new(channel), &config).unwrap();
    assert_eq!(session.firmware().variant, FirmwareVariant::Fw206);

    let reading = session.read_all().unwrap();
    assert_eq!(reading.get("outsideTemp"), Some(&Value::Number(4.2)));
    assert!(!reading.is_empty());
}

#[test]
fn read_all_with_nothing_readable_fails() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(206)]));
    let mut config = test_config();
    config.handshake.retries = 1;

    let session = Session::from_channel(Box::new(channel), &config).unwrap();
    let err = session.read_all().unwrap_err();
    assert!(matches!(err, SessionError::CommunicationFailure(_)));
}

#[test]
fn write_parameter_builds_a_set_frame() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(539), set_ack_frame()]));
    let log = channel.write_log();
    let session = Session::from_channel(Box::new(channel), &test_config()).unwrap();

    session.write_parameter("p99CoolingHC1SetTemp", 21.5).unwrap();

    // detection takes the first four writes; the set frame is the sixth
    let writes = log.lock().unwrap();
    let set_frame = &writes[5];
    assert_eq!(
        set_frame,
        &vec![0x01, 0x80, 0xEA, 0x0B, 0x05, 0x82, 0x00, 0xD7, 0x10, 0x03]
    );
}

#[test]
fn write_parameter_validates_range() {
    let channel = ScriptedChannel::new(script(&[firmware_frame(539)]));
    let session = Session::from_channel(Box::new(channel), &test_config()).unwrap();

    let err = session
        .write_parameter("p99CoolingHC1SetTemp", 40.0)
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::ValueOutOfRange { value, max, .. } if value == 40.0 && max == 27.0
    ));

    let err = session.write_parameter("pNonsense", 1.0).unwrap_err();
    assert!(matches!(err, SessionError::UnknownParameter(_)));
}

#[test]
fn dump_raw_skips_failed_commands() {
    // firmware 2.06 map: 11 commands; only the first two answer
    let global = hex::decode("FBFDA8002A0117").unwrap();
    let control = hex::decode("F2000102").unwrap();
    let channel = ScriptedChannel::new(script(&[
        firmware_frame(206),
        reply_frame(&global),
        reply_frame(&control),
    ]));
    let mut config = test_config();
    config.handshake.retries = 1;

    let session = Session::from_channel(Box::new(channel), &config).unwrap();
    let dump = session.dump_raw().unwrap();

    assert_eq!(dump.get("FB").map(String::as_str), Some("FBFDA8002A0117"));
    assert_eq!(dump.get("F2").map(String::as_str), Some("F2000102"));
    assert!(!dump.contains_key("F3"));
}
