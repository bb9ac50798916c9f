//! Additions for the 4.39 / 5.39 firmware lines
//!
//! The newer boards expose combined high/low-word energy counters, a set
//! of single-value service registers (5.39 only) and the writable
//! parameter tables. Technician access layers two pump-rate parameters
//! on top of the standard write set.

use super::DecodeKind::{Signed, Unsigned};
use super::{FieldRule, RegisterSpec, WriteRule};

/// Single unsigned word right after a 3-byte command echo. The field is
/// named like its register so read-all output stays flat.
const fn single_u16(name: &'static str) -> FieldRule {
    FieldRule::new(name, 8, 4, Unsigned, 1.0)
}

/// Single signed temperature word right after a 3-byte command echo
const fn single_temp(name: &'static str) -> FieldRule {
    FieldRule::new(name, 8, 4, Signed, 10.0)
}

/// Combined kWh counters, low word in `command` and high word in
/// `pair_command`; the session merges them as `high * 1000 + low`
pub(crate) const ENERGY_REGISTERS: &[RegisterSpec] = &[
    RegisterSpec {
        name: "sBoostDHWTotal",
        command: &[0x0A, 0x09, 0x24],
        pair_command: Some(&[0x0A, 0x09, 0x25]),
        fields: &[],
    },
    RegisterSpec {
        name: "sBoostHCTotal",
        command: &[0x0A, 0x09, 0x28],
        pair_command: Some(&[0x0A, 0x09, 0x29]),
        fields: &[],
    },
    RegisterSpec {
        name: "sHeatDHWTotal",
        command: &[0x0A, 0x09, 0x2C],
        pair_command: Some(&[0x0A, 0x09, 0x2D]),
        fields: &[],
    },
    RegisterSpec {
        name: "sHeatHCTotal",
        command: &[0x0A, 0x09, 0x30],
        pair_command: Some(&[0x0A, 0x09, 0x31]),
        fields: &[],
    },
    RegisterSpec {
        name: "sElectrDHWTotal",
        command: &[0x0A, 0x09, 0x1C],
        pair_command: Some(&[0x0A, 0x09, 0x1D]),
        fields: &[],
    },
    RegisterSpec {
        name: "sElectrHCTotal",
        command: &[0x0A, 0x09, 0x20],
        pair_command: Some(&[0x0A, 0x09, 0x21]),
        fields: &[],
    },
];

/// Service registers only the 5.39 line answers
pub(crate) const ADDITIONS_539: &[RegisterSpec] = &[
    RegisterSpec {
        name: "sFlowRate",
        command: &[0x0A, 0x03, 0x3B],
        pair_command: None,
        fields: &[single_u16("sFlowRate")],
    },
    RegisterSpec {
        name: "sHumMaskingTime",
        command: &[0x0A, 0x06, 0x4F],
        pair_command: None,
        fields: &[single_u16("sHumMaskingTime")],
    },
    RegisterSpec {
        name: "sHumThreshold",
        command: &[0x0A, 0x06, 0x50],
        pair_command: None,
        fields: &[single_u16("sHumThreshold")],
    },
    RegisterSpec {
        name: "sHeatingRelPower",
        command: &[0x0A, 0x06, 0x9A],
        pair_command: None,
        fields: &[single_u16("sHeatingRelPower")],
    },
    RegisterSpec {
        name: "sComprRelPower",
        command: &[0x0A, 0x06, 0x9B],
        pair_command: None,
        fields: &[single_u16("sComprRelPower")],
    },
    RegisterSpec {
        name: "sComprRotUnlimit",
        command: &[0x0A, 0x06, 0x9C],
        pair_command: None,
        fields: &[single_u16("sComprRotUnlimit")],
    },
    RegisterSpec {
        name: "sComprRotLimit",
        command: &[0x0A, 0x06, 0x9D],
        pair_command: None,
        fields: &[single_u16("sComprRotLimit")],
    },
    RegisterSpec {
        name: "sOutputReduction",
        command: &[0x0A, 0x06, 0xA4],
        pair_command: None,
        fields: &[single_u16("sOutputReduction")],
    },
    RegisterSpec {
        name: "sOutputIncrease",
        command: &[0x0A, 0x06, 0xA5],
        pair_command: None,
        fields: &[single_u16("sOutputIncrease")],
    },
    RegisterSpec {
        name: "sHumProtection",
        command: &[0x0A, 0x09, 0xD1],
        pair_command: None,
        fields: &[single_u16("sHumProtection")],
    },
    RegisterSpec {
        name: "sSetHumidityMin",
        command: &[0x0A, 0x09, 0xD2],
        pair_command: None,
        fields: &[single_u16("sSetHumidityMin")],
    },
    RegisterSpec {
        name: "sSetHumidityMax",
        command: &[0x0A, 0x09, 0xD3],
        pair_command: None,
        fields: &[single_u16("sSetHumidityMax")],
    },
    RegisterSpec {
        name: "sCoolHCTotal",
        command: &[0x0A, 0x06, 0x48],
        pair_command: Some(&[0x0A, 0x06, 0x49]),
        fields: &[],
    },
    RegisterSpec {
        name: "sDewPointHC1",
        command: &[0x0B, 0x02, 0x64],
        pair_command: None,
        fields: &[single_temp("sDewPointHC1")],
    },
    RegisterSpec {
        name: "sDewPointHC2",
        command: &[0x0C, 0x02, 0x64],
        pair_command: None,
        fields: &[single_temp("sDewPointHC2")],
    },
];

// ============ Write tables ============

/// Writable parameters common to 4.39 and 5.39
pub(crate) const WRITES_X39: &[WriteRule] = &[
    // 0 = off, 1 = active cooling allowed, 2 = passive only
    WriteRule::new("p75passiveCooling", &[0x0A, 0x05, 0x75], 0.0, 2.0, 1.0, 2),
];

/// Cooling parameter set the 5.39 line adds
pub(crate) const WRITES_539: &[WriteRule] = &[
    WriteRule::new("p99CoolingHC1Switch", &[0x0B, 0x02, 0x87], 0.0, 1.0, 1.0, 2),
    WriteRule::new("p99CoolingHC1SetTemp", &[0x0B, 0x05, 0x82], 12.0, 27.0, 10.0, 2),
    WriteRule::new("p99CoolingHC1HysterFlowTemp", &[0x0B, 0x05, 0x83], 0.5, 5.0, 10.0, 2),
    WriteRule::new("p99CoolingHC1HysterRoomTemp", &[0x0B, 0x05, 0x84], 0.5, 3.0, 10.0, 2),
    WriteRule::new("p99CoolingHC2Switch", &[0x0C, 0x02, 0x87], 0.0, 1.0, 1.0, 2),
    WriteRule::new("p99CoolingHC2SetTemp", &[0x0C, 0x05, 0x82], 12.0, 27.0, 10.0, 2),
    WriteRule::new("p99CoolingHC2HysterFlowTemp", &[0x0C, 0x05, 0x83], 0.5, 5.0, 10.0, 2),
    WriteRule::new("p99CoolingHC2HysterRoomTemp", &[0x0C, 0x05, 0x84], 0.5, 3.0, 10.0, 2),
];

/// Pump-rate parameters unlocked by technician access
pub(crate) const WRITES_TECHNICIAN: &[WriteRule] = &[
    WriteRule::new("p99PumpRateHC", &[0x0A, 0x02, 0xCB], 0.0, 100.0, 10.0, 2),
    WriteRule::new("p99PumpRateDHW", &[0x0A, 0x02, 0xCC], 0.0, 100.0, 10.0, 2),
];
