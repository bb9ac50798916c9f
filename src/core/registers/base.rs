//! Base register tables shared by all firmware lines
//!
//! Positions are hex characters counted from the frame checksum byte:
//! checksum occupies 0-1, the command echo starts at 2, data follows the
//! echo. The 4.39 layouts serve as the base; older and newer lines layer
//! their differences on top.

use super::lookups::EnumTable;
use super::DecodeKind::{Bit, Enum, ExponentMantissa, InvertedBit, RawHex, Signed, Unsigned};
use super::{FieldRule, RegisterSpec};

/// sGlobal (FB) - main sensor block
const FB_GLOBAL: &[FieldRule] = &[
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
    // relay and sensor bits, one nibble each
    FieldRule::new("dhwPump", 44, 1, Bit(0), 1.0),
    FieldRule::new("heatingCircuitPump", 44, 1, Bit(1), 1.0),
    FieldRule::new("solarPump", 44, 1, Bit(3), 1.0),
    FieldRule::new("mixerOpen", 45, 1, Bit(0), 1.0),
    FieldRule::new("mixerClosed", 45, 1, Bit(1), 1.0),
    FieldRule::new("heatPipeValve", 45, 1, Bit(2), 1.0),
    FieldRule::new("diverterValve", 45, 1, Bit(3), 1.0),
    FieldRule::new("boosterStage3", 46, 1, Bit(0), 1.0),
    FieldRule::new("boosterStage2", 46, 1, Bit(1), 1.0),
    FieldRule::new("boosterStage1", 46, 1, Bit(2), 1.0),
    FieldRule::new("compressor", 47, 1, Bit(3), 1.0),
    FieldRule::new("evuRelease", 48, 1, Bit(0), 1.0),
    FieldRule::new("ovenFireplace", 48, 1, Bit(1), 1.0),
    FieldRule::new("STB", 48, 1, Bit(2), 1.0),
    FieldRule::new("highPressureSensor", 49, 1, InvertedBit(0), 1.0),
    FieldRule::new("lowPressureSensor", 49, 1, InvertedBit(1), 1.0),
    FieldRule::new("evaporatorIceMonitor", 49, 1, Bit(2), 1.0),
    FieldRule::new("signalAnode", 49, 1, Bit(3), 1.0),
    // ventilators
    FieldRule::new("outputVentilatorPower", 50, 4, Unsigned, 10.0),
    FieldRule::new("inputVentilatorPower", 54, 4, Unsigned, 10.0),
    FieldRule::new("mainVentilatorPower", 58, 4, Unsigned, 10.0),
    FieldRule::new("outputVentilatorSpeed", 62, 4, Unsigned, 1.0),
    FieldRule::new("inputVentilatorSpeed", 66, 4, Unsigned, 1.0),
    FieldRule::new("mainVentilatorSpeed", 70, 4, Unsigned, 1.0),
    FieldRule::new("outsideTempFiltered", 74, 4, Signed, 10.0),
    FieldRule::new("relHumidity", 78, 4, Signed, 10.0),
    FieldRule::new("dewPoint", 82, 4, Signed, 10.0),
    FieldRule::new("P_Nd", 86, 4, Signed, 100.0),
    FieldRule::new("P_Hd", 90, 4, Signed, 100.0),
    FieldRule::new("actualPower_Qc", 94, 8, ExponentMantissa, 1.0),
    FieldRule::new("actualPower_Pel", 102, 8, ExponentMantissa, 1.0),
    FieldRule::new("flowRate", 110, 4, Unsigned, 100.0),
    FieldRule::new("p_HCw", 114, 4, Unsigned, 100.0),
];

/// sControl (F2) - controller state
const F2_CONTROL: &[FieldRule] = &[
    FieldRule::new("heatRequest", 4, 2, Unsigned, 1.0),
    FieldRule::new("heatRequest2", 6, 2, Unsigned, 1.0),
    FieldRule::new("hcStage", 8, 2, Unsigned, 1.0),
    FieldRule::new("dhwStage", 10, 2, Unsigned, 1.0),
    FieldRule::new("heatStageControlModul", 12, 2, Unsigned, 1.0),
    FieldRule::new("compBlockTime", 14, 4, Signed, 1.0),
    FieldRule::new("pasteurisationMode", 18, 2, Unsigned, 1.0),
    FieldRule::new("compressor", 22, 1, Bit(0), 1.0),
    FieldRule::new("boosterStage1", 22, 1, Bit(1), 1.0),
    FieldRule::new("solarPump", 22, 1, Bit(2), 1.0),
    FieldRule::new("boosterStage2", 22, 1, Bit(3), 1.0),
    FieldRule::new("heatingCircuitPump", 23, 1, Bit(0), 1.0),
    FieldRule::new("dhwPump", 23, 1, Bit(1), 1.0),
    FieldRule::new("diverterValve", 23, 1, Bit(2), 1.0),
    FieldRule::new("heatPipeValve", 23, 1, Bit(3), 1.0),
    FieldRule::new("mixerClosed", 25, 1, Bit(0), 1.0),
    FieldRule::new("mixerOpen", 25, 1, Bit(1), 1.0),
    FieldRule::new("boostBlockTimeAfterPumpStart", 30, 4, Signed, 1.0),
    FieldRule::new("boostBlockTimeAfterHD", 34, 4, Signed, 1.0),
];

/// sDHW (F3) - domestic hot water
const F3_DHW: &[FieldRule] = &[
    FieldRule::new("dhwTemp", 4, 4, Signed, 10.0),
    FieldRule::new("outsideTemp", 8, 4, Signed, 10.0),
    FieldRule::new("dhwSetTemp", 12, 4, Signed, 10.0),
    FieldRule::new("compBlockTime", 16, 4, Signed, 1.0),
    FieldRule::new("heatBlockTime", 24, 4, Signed, 1.0),
    FieldRule::new("dhwBoosterStage", 28, 2, Unsigned, 1.0),
    FieldRule::new("pasteurisationMode", 32, 2, Unsigned, 1.0),
    FieldRule::new("dhwOpMode", 34, 2, Enum(EnumTable::OpModeHc), 1.0),
];

/// sHC1 (F4) - heating circuit 1
const F4_HC1: &[FieldRule] = &[
    FieldRule::new("outsideTemp", 4, 4, Signed, 10.0),
    FieldRule::new("returnTemp", 12, 4, Signed, 10.0),
    FieldRule::new("integralHeat", 16, 4, Signed, 1.0),
    FieldRule::new("flowTemp", 20, 4, Signed, 10.0),
    FieldRule::new("heatSetTemp", 24, 4, Signed, 10.0),
    FieldRule::new("heatTemp", 28, 4, Signed, 10.0),
    FieldRule::new("onHysteresisNo", 32, 2, Unsigned, 1.0),
    FieldRule::new("offHysteresisNo", 34, 2, Unsigned, 1.0),
    FieldRule::new("hcBoosterStage", 36, 2, Unsigned, 1.0),
    FieldRule::new("seasonMode", 38, 2, Enum(EnumTable::SeasonMode), 1.0),
    FieldRule::new("integralSwitch", 44, 4, Signed, 1.0),
    FieldRule::new("hcOpMode", 48, 2, Enum(EnumTable::OpModeHc), 1.0),
    FieldRule::new("roomSetTemp", 56, 4, Signed, 10.0),
    FieldRule::new("insideTempRC", 68, 4, Signed, 10.0),
];

/// sHC2 (F5) - heating circuit 2
const F5_HC2: &[FieldRule] = &[
    FieldRule::new("outsideTemp", 4, 4, Signed, 10.0),
    FieldRule::new("returnTemp", 8, 4, Signed, 10.0),
    FieldRule::new("flowTemp", 12, 4, Signed, 10.0),
    FieldRule::new("heatSetTemp", 16, 4, Signed, 10.0),
    FieldRule::new("heatTemp", 20, 4, Signed, 10.0),
    FieldRule::new("controlSignal", 24, 4, Signed, 10.0),
    FieldRule::new("seasonMode", 30, 2, Enum(EnumTable::SeasonMode), 1.0),
    FieldRule::new("hcOpMode", 36, 2, Enum(EnumTable::OpModeHc), 1.0),
];

/// sTimedate (FC) - controller clock
const FC_TIME: &[FieldRule] = &[
    FieldRule::new("year", 4, 4, Unsigned, 1.0),
    FieldRule::new("seconds", 8, 2, Unsigned, 1.0),
    FieldRule::new("minutes", 10, 2, Unsigned, 1.0),
    FieldRule::new("hours", 12, 2, Unsigned, 1.0),
    FieldRule::new("day", 14, 2, Unsigned, 1.0),
    FieldRule::new("month", 16, 2, Unsigned, 1.0),
    FieldRule::new("weekday", 18, 2, Enum(EnumTable::Weekday), 1.0),
];

/// sFirmware (FD)
const FD_FIRMWARE: &[FieldRule] = &[
    FieldRule::new("version", 4, 4, Unsigned, 100.0),
    FieldRule::new("dateDay", 8, 2, Unsigned, 1.0),
    FieldRule::new("dateMonth", 10, 2, Unsigned, 1.0),
    FieldRule::new("dateYear", 12, 4, Unsigned, 1.0),
    FieldRule::new("controllerId", 16, 4, RawHex, 1.0),
];

/// sHistory (09) - operating hours
const HIS_09: &[FieldRule] = &[
    FieldRule::new("compressorHeatingHours", 4, 4, Unsigned, 1.0),
    FieldRule::new("compressorCoolingHours", 8, 4, Unsigned, 1.0),
    FieldRule::new("compressorDHWHours", 12, 4, Unsigned, 1.0),
    FieldRule::new("boosterDHWHours", 16, 4, Unsigned, 1.0),
    FieldRule::new("boosterHeatingHours", 20, 4, Unsigned, 1.0),
];

/// sLast10errors (D1)
const D1_ERRORS: &[FieldRule] = &[
    FieldRule::new("numberOfFaults", 4, 2, Unsigned, 1.0),
    FieldRule::new("fault0Code", 8, 2, Enum(EnumTable::FaultCode), 1.0),
    FieldRule::new("fault1Code", 20, 2, Enum(EnumTable::FaultCode), 1.0),
    FieldRule::new("fault2Code", 32, 2, Enum(EnumTable::FaultCode), 1.0),
    FieldRule::new("fault3Code", 44, 2, Enum(EnumTable::FaultCode), 1.0),
];

/// p01-p12 (17) - user parameter block
const PXX_17: &[FieldRule] = &[
    FieldRule::new("p01RoomTempDay", 4, 4, Unsigned, 10.0),
    FieldRule::new("p02RoomTempNight", 8, 4, Unsigned, 10.0),
    FieldRule::new("p03RoomTempStandby", 12, 4, Unsigned, 10.0),
    FieldRule::new("p04DHWsetTempDay", 16, 4, Unsigned, 10.0),
    FieldRule::new("p05DHWsetTempNight", 20, 4, Unsigned, 10.0),
    FieldRule::new("p06DHWsetTempStandby", 24, 4, Unsigned, 10.0),
    FieldRule::new("p07FanStageDay", 28, 2, Unsigned, 1.0),
    FieldRule::new("p08FanStageNight", 30, 2, Unsigned, 1.0),
    FieldRule::new("p09FanStageStandby", 32, 2, Unsigned, 1.0),
    FieldRule::new("p10HCTempManual", 34, 4, Unsigned, 10.0),
    FieldRule::new("p11DHWsetTempManual", 38, 4, Unsigned, 10.0),
    FieldRule::new("p12FanStageManual", 42, 2, Unsigned, 1.0),
];

/// sDisplay (0A0176) - front panel indicator bits
const DISPLAY_0A0176: &[FieldRule] = &[
    FieldRule::new("switchingProg", 11, 1, Bit(0), 1.0),
    FieldRule::new("compressor", 11, 1, Bit(1), 1.0),
    FieldRule::new("heatingHC", 11, 1, Bit(2), 1.0),
    FieldRule::new("cooling", 11, 1, Bit(3), 1.0),
    FieldRule::new("heatingDHW", 10, 1, Bit(0), 1.0),
    FieldRule::new("boosterHC", 10, 1, Bit(1), 1.0),
    FieldRule::new("service", 10, 1, Bit(2), 1.0),
    FieldRule::new("filterBoth", 9, 1, Bit(0), 1.0),
    FieldRule::new("ventStage", 9, 1, Bit(1), 1.0),
    FieldRule::new("pumpHC", 9, 1, Bit(2), 1.0),
    FieldRule::new("defrost", 9, 1, Bit(3), 1.0),
    FieldRule::new("filterUp", 8, 1, Bit(0), 1.0),
    FieldRule::new("filterDown", 8, 1, Bit(1), 1.0),
];

/// Base register inventory, in read-all order
pub(crate) const REGISTERS: &[RegisterSpec] = &[
    RegisterSpec {
        name: "sGlobal",
        command: &[0xFB],
        pair_command: None,
        fields: FB_GLOBAL,
    },
    RegisterSpec {
        name: "sControl",
        command: &[0xF2],
        pair_command: None,
        fields: F2_CONTROL,
    },
    RegisterSpec {
        name: "sDHW",
        command: &[0xF3],
        pair_command: None,
        fields: F3_DHW,
    },
    RegisterSpec {
        name: "sHC1",
        command: &[0xF4],
        pair_command: None,
        fields: F4_HC1,
    },
    RegisterSpec {
        name: "sHC2",
        command: &[0xF5],
        pair_command: None,
        fields: F5_HC2,
    },
    RegisterSpec {
        name: "sTimedate",
        command: &[0xFC],
        pair_command: None,
        fields: FC_TIME,
    },
    RegisterSpec {
        name: "sFirmware",
        command: &[0xFD],
        pair_command: None,
        fields: FD_FIRMWARE,
    },
    RegisterSpec {
        name: "sHistory",
        command: &[0x09],
        pair_command: None,
        fields: HIS_09,
    },
    RegisterSpec {
        name: "sLast10errors",
        command: &[0xD1],
        pair_command: None,
        fields: D1_ERRORS,
    },
    RegisterSpec {
        name: "p01-p12",
        command: &[0x17],
        pair_command: None,
        fields: PXX_17,
    },
    RegisterSpec {
        name: "sDisplay",
        command: &[0x0A, 0x01, 0x76],
        pair_command: None,
        fields: DISPLAY_0A0176,
    },
];
