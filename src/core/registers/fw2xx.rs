//! Layout overrides for the 2.06 / 2.14 firmware line
//!
//! The early LWZ boards pack the sGlobal block tighter, keep only one
//! set of operating-hour counters and report fault codes as full words.

use super::DecodeKind::{Bit, Enum, Signed, Unsigned};
use super::lookups::EnumTable;
use super::{FieldRule, RegisterSpec};

const FB_GLOBAL_2XX: &[FieldRule] = &[
    FieldRule::new("collectorTemp", 4, 4, Signed, 10.0),
    FieldRule::new("outsideTemp", 8, 4, Signed, 10.0),
    FieldRule::new("flowTemp", 12, 4, Signed, 10.0),
    FieldRule::new("returnTemp", 16, 4, Signed, 10.0),
    FieldRule::new("hotGasTemp", 20, 4, Signed, 10.0),
    FieldRule::new("dhwTemp", 24, 4, Signed, 10.0),
    FieldRule::new("flowTempHC2", 28, 4, Signed, 10.0),
    FieldRule::new("insideTemp", 32, 4, Signed, 10.0),
    FieldRule::new("evaporatorTemp", 36, 4, Signed, 10.0),
    FieldRule::new("condenserTemp", 40, 4, Signed, 10.0),
    FieldRule::new("compressor", 44, 1, Bit(0), 1.0),
    FieldRule::new("boosterStage1", 44, 1, Bit(1), 1.0),
    FieldRule::new("boosterStage2", 44, 1, Bit(2), 1.0),
    FieldRule::new("boosterStage3", 44, 1, Bit(3), 1.0),
    FieldRule::new("heatingCircuitPump", 45, 1, Bit(0), 1.0),
    FieldRule::new("dhwPump", 45, 1, Bit(1), 1.0),
    FieldRule::new("diverterValve", 45, 1, Bit(2), 1.0),
    FieldRule::new("heatPipeValve", 45, 1, Bit(3), 1.0),
    FieldRule::new("mixerClosed", 47, 1, Bit(0), 1.0),
    FieldRule::new("mixerOpen", 47, 1, Bit(1), 1.0),
    FieldRule::new("outputVentilatorPower", 48, 2, Unsigned, 1.0),
    FieldRule::new("inputVentilatorPower", 50, 2, Unsigned, 1.0),
    // reported as 0..255, scaled to percent
    FieldRule::new("mainVentilatorPower", 52, 2, Unsigned, 2.55),
    FieldRule::new("highPressureSensor", 54, 1, Bit(3), 1.0),
    FieldRule::new("lowPressureSensor", 54, 1, Bit(2), 1.0),
    FieldRule::new("signalAnode", 54, 1, Bit(1), 1.0),
    FieldRule::new("ovenFireplace", 54, 1, Bit(0), 1.0),
    FieldRule::new("evaporatorIceMonitor", 55, 1, Bit(3), 1.0),
    FieldRule::new("outputVentilatorSpeed", 56, 2, Unsigned, 1.0),
    FieldRule::new("inputVentilatorSpeed", 58, 2, Unsigned, 1.0),
    FieldRule::new("mainVentilatorSpeed", 60, 2, Unsigned, 1.0),
    FieldRule::new("outsideTempFiltered", 64, 4, Signed, 10.0),
];

const HIS_09_2XX: &[FieldRule] = &[
    FieldRule::new("operatingHours1", 4, 4, Unsigned, 1.0),
    FieldRule::new("operatingHours2", 8, 4, Unsigned, 1.0),
    FieldRule::new("heatingHours", 12, 4, Unsigned, 1.0),
    FieldRule::new("DHWhours", 16, 4, Unsigned, 1.0),
    FieldRule::new("coolingHours", 20, 4, Unsigned, 1.0),
];

const D1_ERRORS_2XX: &[FieldRule] = &[
    FieldRule::new("numberOfFaults", 4, 2, Unsigned, 1.0),
    FieldRule::new("fault0Code", 8, 4, Enum(EnumTable::FaultCode), 1.0),
    FieldRule::new("fault1Code", 20, 4, Enum(EnumTable::FaultCode), 1.0),
    FieldRule::new("fault2Code", 32, 4, Enum(EnumTable::FaultCode), 1.0),
    FieldRule::new("fault3Code", 44, 4, Enum(EnumTable::FaultCode), 1.0),
];

/// Overrides merged on top of the base map for 2.xx boards
pub(crate) const OVERRIDES: &[RegisterSpec] = &[
    RegisterSpec {
        name: "sGlobal",
        command: &[0xFB],
        pair_command: None,
        fields: FB_GLOBAL_2XX,
    },
    RegisterSpec {
        name: "sHistory",
        command: &[0x09],
        pair_command: None,
        fields: HIS_09_2XX,
    },
    RegisterSpec {
        name: "sLast10errors",
        command: &[0xD1],
        pair_command: None,
        fields: D1_ERRORS_2XX,
    },
];
