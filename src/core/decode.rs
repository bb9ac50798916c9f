//! Field decoding and write-value encoding
//!
//! The decoder works on the hex rendering of a reply payload. Field
//! positions in the register tables are counted from the frame checksum
//! byte, so the payload (command echo + data) is prefixed with a dummy
//! checksum slot before slicing. A field whose slice falls outside the
//! reply is silently omitted; shorter frames from older boards simply
//! yield fewer fields.

use crate::core::registers::{lookups, DecodeKind, FieldRule, WriteRule};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Scaled numeric value
    Number(f64),
    /// Relay / sensor bit
    Bool(bool),
    /// Enum label or raw hex passthrough
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Decode all fields of a register block from its reply payload
/// (command echo included). Field order follows the table; the map is
/// keyed by field name.
pub fn decode_fields(payload: &[u8], fields: &[FieldRule]) -> BTreeMap<String, Value> {
    // Dummy checksum slot so table positions apply unchanged.
    let mut hex = String::with_capacity(2 + payload.len() * 2);
    hex.push_str("00");
    hex.push_str(&hex::encode(payload));

    let mut out = BTreeMap::new();
    for rule in fields {
        if let Some(value) = decode_field(&hex, rule) {
            out.insert(rule.name.to_string(), value);
        }
    }
    out
}

/// Decode a single field; `None` when the slice is out of range or not
/// valid hex
fn decode_field(hex: &str, rule: &FieldRule) -> Option<Value> {
    let end = rule.position.checked_add(rule.length)?;
    if end > hex.len() {
        return None;
    }
    let slice = &hex[rule.position..end];

    match rule.kind {
        DecodeKind::Unsigned => {
            let raw = u64::from_str_radix(slice, 16).ok()?;
            Some(Value::Number(raw as f64 / rule.scale))
        }
        DecodeKind::Signed => {
            let raw = i64::from_str_radix(slice, 16).ok()?;
            // 16-bit two's complement
            let signed = if rule.length == 4 && raw > 32767 {
                raw - 65536
            } else {
                raw
            };
            Some(Value::Number(signed as f64 / rule.scale))
        }
        DecodeKind::Bit(bit) => {
            let nibble = u8::from_str_radix(slice, 16).ok()?;
            Some(Value::Bool(nibble & (1 << bit) != 0))
        }
        DecodeKind::InvertedBit(bit) => {
            let nibble = u8::from_str_radix(slice, 16).ok()?;
            Some(Value::Bool(nibble & (1 << bit) == 0))
        }
        DecodeKind::Enum(table) => {
            let code = u64::from_str_radix(slice, 16).ok()?;
            Some(Value::Text(lookups::label(table, code)))
        }
        DecodeKind::ExponentMantissa => {
            if slice.len() != 8 {
                return None;
            }
            let mantissa = u32::from_str_radix(&slice[..4], 16).ok()? as f64;
            let exponent = i32::from_str_radix(&slice[4..], 16).ok()?;
            let exponent = if exponent > 32767 {
                exponent - 65536
            } else {
                exponent
            };
            Some(Value::Number(mantissa * (exponent as f64).exp2()))
        }
        DecodeKind::RawHex => Some(Value::Text(slice.to_uppercase())),
    }
}

/// Encode a validated parameter value for a write frame: scale, round,
/// and serialise big-endian at the rule's byte length. Range checking is
/// the caller's job; the encoder never clamps.
pub fn encode_value(value: f64, rule: &WriteRule) -> Vec<u8> {
    let scaled = (value * rule.scale).round() as i64;
    let wide = scaled.to_be_bytes();
    wide[wide.len() - rule.length..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registers::{DecodeKind, EnumTable, FieldRule, WriteRule};

    fn rule(position: usize, length: usize, kind: DecodeKind, scale: f64) -> FieldRule {
        FieldRule::new("field", position, length, kind, scale)
    }

    fn decode(payload: &[u8], rule: &FieldRule) -> Option<Value> {
        let fields = [*rule];
        decode_fields(payload, &fields).remove("field")
    }

    #[test]
    fn test_signed_negative() {
        // 0xFDA8 / 10 = -60.0
        let payload = [0xFB, 0xFD, 0xA8];
        let r = rule(4, 4, DecodeKind::Signed, 10.0);
        assert_eq!(decode(&payload, &r), Some(Value::Number(-60.0)));
    }

    #[test]
    fn test_signed_positive() {
        // 0x00C8 / 10 = 20.0
        let payload = [0xFB, 0x00, 0xC8];
        let r = rule(4, 4, DecodeKind::Signed, 10.0);
        assert_eq!(decode(&payload, &r), Some(Value::Number(20.0)));
    }

    #[test]
    fn test_unsigned_keeps_high_values() {
        let payload = [0xFB, 0xFD, 0xA8];
        let r = rule(4, 4, DecodeKind::Unsigned, 1.0);
        assert_eq!(decode(&payload, &r), Some(Value::Number(64936.0)));
    }

    #[test]
    fn test_bits() {
        // nibble 0x5 = 0101
        let payload = [0xFB, 0x05];
        assert_eq!(
            decode(&payload, &rule(5, 1, DecodeKind::Bit(0), 1.0)),
            Some(Value::Bool(true))
        );
        assert_eq!(
            decode(&payload, &rule(5, 1, DecodeKind::Bit(1), 1.0)),
            Some(Value::Bool(false))
        );
        assert_eq!(
            decode(&payload, &rule(5, 1, DecodeKind::InvertedBit(1), 1.0)),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_enum_lookup_and_unknown() {
        let payload = [0xF4, 0x01];
        let r = rule(4, 2, DecodeKind::Enum(EnumTable::SeasonMode), 1.0);
        assert_eq!(decode(&payload, &r), Some(Value::Text("winter".into())));

        let payload = [0xF4, 0x07];
        assert_eq!(decode(&payload, &r), Some(Value::Text("unknown(7)".into())));
    }

    #[test]
    fn test_exponent_mantissa() {
        // mantissa 3, exponent 2 -> 12
        let payload = [0xFB, 0x00, 0x03, 0x00, 0x02];
        let r = rule(4, 8, DecodeKind::ExponentMantissa, 1.0);
        assert_eq!(decode(&payload, &r), Some(Value::Number(12.0)));

        // negative exponent: mantissa 6, exponent -1 -> 3
        let payload = [0xFB, 0x00, 0x06, 0xFF, 0xFF];
        assert_eq!(decode(&payload, &r), Some(Value::Number(3.0)));
    }

    #[test]
    fn test_out_of_range_omitted() {
        let payload = [0xFB, 0x00, 0xC8];
        let r = rule(8, 4, DecodeKind::Signed, 10.0);
        assert_eq!(decode(&payload, &r), None);
    }

    #[test]
    fn test_captured_global_frame() {
        // sGlobal reply captured from a 4.39 board (truncated)
        let payload = hex::decode("FBFDA8002A01170116022F01C18001FDA8").unwrap();
        let map = crate::core::registers::RegisterMap::for_variant(
            crate::core::registers::FirmwareVariant::Fw439,
        );
        let fields = &map.register("sGlobal").unwrap().fields;
        let decoded = decode_fields(&payload, fields);

        assert_eq!(decoded.get("collectorTemp"), Some(&Value::Number(-60.0)));
        assert_eq!(decoded.get("outsideTemp"), Some(&Value::Number(4.2)));
        assert_eq!(decoded.get("flowTemp"), Some(&Value::Number(27.9)));
        assert_eq!(decoded.get("returnTemp"), Some(&Value::Number(27.8)));
        assert_eq!(decoded.get("hotGasTemp"), Some(&Value::Number(55.9)));
        assert_eq!(decoded.get("dhwTemp"), Some(&Value::Number(44.9)));
        assert_eq!(decoded.get("insideTemp"), Some(&Value::Number(-60.0)));
        // truncated frame: later fields are absent, not errors
        assert!(!decoded.contains_key("outputVentilatorPower"));
        assert!(!decoded.contains_key("flowRate"));
    }

    #[test]
    fn test_global_power_fields() {
        // sGlobal long enough to reach the exponent-mantissa power pair
        let mut payload = vec![0u8; 54];
        payload[0] = 0xFB;
        payload[46..50].copy_from_slice(&[0x00, 0x03, 0x00, 0x02]); // Qc: 3 * 2^2
        payload[50..54].copy_from_slice(&[0x00, 0x06, 0xFF, 0xFF]); // Pel: 6 * 2^-1

        let map = crate::core::registers::RegisterMap::for_variant(
            crate::core::registers::FirmwareVariant::Fw439,
        );
        let fields = &map.register("sGlobal").unwrap().fields;
        let decoded = decode_fields(&payload, fields);

        assert_eq!(decoded.get("actualPower_Qc"), Some(&Value::Number(12.0)));
        assert_eq!(decoded.get("actualPower_Pel"), Some(&Value::Number(3.0)));
        // frame ends right after the power pair
        assert!(!decoded.contains_key("flowRate"));
    }

    #[test]
    fn test_encode_value() {
        let temp = WriteRule::new("p", &[0x0B, 0x05, 0x82], 12.0, 27.0, 10.0, 2);
        assert_eq!(encode_value(21.5, &temp), vec![0x00, 0xD7]);

        let select = WriteRule::new("p", &[0x0A, 0x05, 0x75], 0.0, 2.0, 1.0, 2);
        assert_eq!(encode_value(1.0, &select), vec![0x00, 0x01]);

        // rounding, not truncation
        assert_eq!(encode_value(0.46, &temp), vec![0x00, 0x05]);
    }
}
