// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

// Copyright 2024 Oxide Computer Company

//! Alarm and warning thresholds for a module's monitored quantities.
//!
//! Each monitored quantity carries four 16-bit registers on the operating
//! page: alarm high/low and warning high/low. A raw register value times
//! the quantity's fixed scale factor yields the physical value.

/// Degrees Celsius per LSB of a temperature register.
pub const TEMPERATURE_SCALE: f32 = 1.0 / 256.0;

/// Volts per LSB of a supply voltage register.
pub const SUPPLY_VOLTAGE_SCALE: f32 = 100e-6;

/// Watts per LSB of a receiver optical power register.
pub const RX_POWER_SCALE: f32 = 1e-7;

/// Amps per LSB of a transmitter bias current register.
pub const TX_BIAS_SCALE: f32 = 2e-6;

/// A high/low pair of physical threshold values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
pub struct ThresholdRange {
    pub hi: f32,
    pub lo: f32,
}

/// The alarm and warning thresholds for one monitored quantity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
pub struct QsfpThreshold {
    pub alarm: ThresholdRange,
    pub warning: ThresholdRange,
}

impl QsfpThreshold {
    /// Build a threshold from its four raw register words and the
    /// quantity's scale factor.
    ///
    /// The raw word type follows the register: signed for temperature,
    /// unsigned for everything else.
    pub fn from_words<T>(alarm_hi: T, alarm_lo: T, warning_hi: T, warning_lo: T, scale: f32) -> Self
    where
        T: Into<f32> + Copy,
    {
        Self {
            alarm: ThresholdRange {
                hi: alarm_hi.into() * scale,
                lo: alarm_lo.into() * scale,
            },
            warning: ThresholdRange {
                hi: warning_hi.into() * scale,
                lo: warning_lo.into() * scale,
            },
        }
    }
}

/// The full threshold configuration of a module, in physical units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(
    any(feature = "api-traits", test),
    derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)
)]
pub struct MonitorThresholds {
    /// Case temperature thresholds (degrees C).
    pub temperature: QsfpThreshold,
    /// Supply voltage thresholds (Volts).
    pub supply_voltage: QsfpThreshold,
    /// Receiver optical power thresholds (Watts).
    pub rx_power: QsfpThreshold,
    /// Transmitter bias current thresholds (Amps).
    pub tx_bias: QsfpThreshold,
}

#[cfg(test)]
mod tests {
    use super::QsfpThreshold;
    use super::SUPPLY_VOLTAGE_SCALE;
    use super::TEMPERATURE_SCALE;

    #[test]
    fn test_temperature_scaling() {
        // 0x4b00 = 75 C, and negative raw values stay negative.
        let t = QsfpThreshold::from_words(0x4b00i16, -2560, 0x4600, -2304, TEMPERATURE_SCALE);
        assert_eq!(t.alarm.hi, 75.0);
        assert_eq!(t.alarm.lo, -10.0);
        assert_eq!(t.warning.hi, 70.0);
        assert_eq!(t.warning.lo, -9.0);
    }

    #[test]
    fn test_voltage_scaling() {
        // 36000 LSB * 100uV = 3.6 V.
        let t = QsfpThreshold::from_words(36000u16, 29000, 35000, 30000, SUPPLY_VOLTAGE_SCALE);
        assert!((t.alarm.hi - 3.6).abs() < 1e-4);
        assert!((t.alarm.lo - 2.9).abs() < 1e-4);
        assert!((t.warning.hi - 3.5).abs() < 1e-4);
        assert!((t.warning.lo - 3.0).abs() < 1e-4);
    }
}
