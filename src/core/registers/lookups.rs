//! Label tables for enum-coded fields
//!
//! Codes outside a table render as `unknown(<code>)` instead of failing
//! the whole block decode.

/// Which label table an enum field consults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumTable {
    /// Winter/summer changeover
    SeasonMode,
    /// Overall operation mode
    OpMode,
    /// Heating-circuit operation mode
    OpModeHc,
    /// Fault code register
    FaultCode,
    /// Day-of-week in the clock block
    Weekday,
}

/// Resolve a code against a table
pub fn label(table: EnumTable, code: u64) -> String {
    let hit = match table {
        EnumTable::SeasonMode => season_mode(code),
        EnumTable::OpMode => op_mode(code),
        EnumTable::OpModeHc => op_mode_hc(code),
        EnumTable::FaultCode => fault_code(code),
        EnumTable::Weekday => weekday(code),
    };
    match hit {
        Some(label) => label.to_string(),
        None => format!("unknown({code})"),
    }
}

fn season_mode(code: u64) -> Option<&'static str> {
    match code {
        1 => Some("winter"),
        2 => Some("summer"),
        _ => None,
    }
}

fn op_mode(code: u64) -> Option<&'static str> {
    match code {
        0 => Some("emergency"),
        1 => Some("standby"),
        3 => Some("DAYmode"),
        4 => Some("setback"),
        5 => Some("DHWmode"),
        11 => Some("automatic"),
        14 => Some("manual"),
        _ => None,
    }
}

fn op_mode_hc(code: u64) -> Option<&'static str> {
    match code {
        1 => Some("normal"),
        2 => Some("setback"),
        3 => Some("standby"),
        4 | 5 => Some("restart"),
        _ => None,
    }
}

fn weekday(code: u64) -> Option<&'static str> {
    match code {
        1 => Some("Monday"),
        2 => Some("Tuesday"),
        3 => Some("Wednesday"),
        4 => Some("Thursday"),
        5 => Some("Friday"),
        6 => Some("Saturday"),
        7 => Some("Sunday"),
        _ => None,
    }
}

fn fault_code(code: u64) -> Option<&'static str> {
    match code {
        0 => Some("n.a."),
        1 => Some("F01_AnodeFault"),
        2 => Some("F02_SafetyTempDelimiterEngaged"),
        3 => Some("F03_HighPressureGuardFault"),
        4 => Some("F04_LowPressureGuardFault"),
        5 => Some("F05_OutletFanFault"),
        6 => Some("F06_InletFanFault"),
        7 => Some("F07_MainOutputFanFault"),
        11 => Some("F11_LowPressureSensorFault"),
        12 => Some("F12_HighPressureSensorFault"),
        15 => Some("F15_DHW_TemperatureFault"),
        17 => Some("F17_DefrostingDurationExceeded"),
        20 => Some("F20_SolarSensorFault"),
        21 => Some("F21_OutsideTemperatureSensorFault"),
        22 => Some("F22_HotGasTemperatureFault"),
        23 => Some("F23_CondenserTemperatureSensorFault"),
        24 => Some("F24_EvaporatorTemperatureSensorFault"),
        26 => Some("F26_ReturnTemperatureSensorFault"),
        28 => Some("F28_FlowTemperatureSensorFault"),
        29 => Some("F29_DHW_TemperatureSensorFault"),
        30 => Some("F30_SoftwareVersionFault"),
        31 => Some("F31_RAMfault"),
        32 => Some("F32_EEPromFault"),
        33 => Some("F33_ExtractAirHumiditySensor"),
        34 => Some("F34_FlowSensor"),
        35 => Some("F35_minFlowCooling"),
        36 => Some("F36_MinFlowRate"),
        37 => Some("F37_MinWaterPressure"),
        40 => Some("F40_FloatSwitch"),
        50 => Some("F50_SensorHeatPumpReturn"),
        51 => Some("F51_SensorHeatPumpFlow"),
        52 => Some("F52_SensorCondenserOutlet"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(label(EnumTable::SeasonMode, 1), "winter");
        assert_eq!(label(EnumTable::SeasonMode, 2), "summer");
        assert_eq!(label(EnumTable::OpModeHc, 1), "normal");
        assert_eq!(label(EnumTable::OpModeHc, 5), "restart");
        assert_eq!(label(EnumTable::FaultCode, 0), "n.a.");
        assert_eq!(label(EnumTable::FaultCode, 21), "F21_OutsideTemperatureSensorFault");
        assert_eq!(label(EnumTable::Weekday, 7), "Sunday");
    }

    #[test]
    fn test_unknown_code_renders_placeholder() {
        assert_eq!(label(EnumTable::SeasonMode, 7), "unknown(7)");
        assert_eq!(label(EnumTable::FaultCode, 99), "unknown(99)");
    }
}
