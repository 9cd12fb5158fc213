//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::hardware::BoardConfig;
use super::toml::{parse_config, ParseError};

/// Default hold time once switched on: five hours
pub const DEFAULT_POWER_ON_TIME_S: u32 = 60 * 60 * 5;

/// Default time the button latch is held after a press
pub const DEFAULT_DEBOUNCE_MS: u32 = 100;

/// Default countdown armed by a press while on
pub const DEFAULT_PENDING_OFF_TICKS: u32 = 2;

/// Default wait for a second press after a press while on
pub const DEFAULT_DOUBLE_PRESS_WINDOW_MS: u32 = 1000;

/// Power controller timings
///
/// `pending_off_ticks` and `double_press_window_ms` are independent: the
/// first is counted down by the tick handler, the second is waited out by
/// the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerConfig {
    /// Ticks (seconds) the outputs stay on once armed
    pub power_on_time_s: u32,
    /// Debounce delay after a registered press (ms)
    pub debounce_ms: u32,
    /// Countdown armed by a press while on (ticks)
    pub pending_off_ticks: u32,
    /// Wait for a cancelling second press (ms)
    pub double_press_window_ms: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            power_on_time_s: DEFAULT_POWER_ON_TIME_S,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            pending_off_ticks: DEFAULT_PENDING_OFF_TICKS,
            double_press_window_ms: DEFAULT_DOUBLE_PRESS_WINDOW_MS,
        }
    }
}

/// Output behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputConfig {
    /// Switch the auxiliary output together with the relays
    ///
    /// When false the auxiliary output is held inactive.
    pub aux_follows_relays: bool,
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Controller timings
    pub power: PowerConfig,
    /// Pin assignment
    pub board: BoardConfig,
    /// Output behaviour
    pub outputs: OutputConfig,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Hold time of zero would switch off immediately
    ZeroPowerOnTime,
    /// Pending-off countdown must be at least one tick
    ZeroPendingOff,
    /// Same pin assigned to more than one function
    DuplicatePin(u8),
    /// TOML parsing failed
    Parse(ParseError),
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

impl DeviceConfig {
    /// Parse and validate a TOML configuration
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config = parse_config(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the controller cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.power.power_on_time_s == 0 {
            return Err(ConfigError::ZeroPowerOnTime);
        }
        if self.power.pending_off_ticks == 0 {
            return Err(ConfigError::ZeroPendingOff);
        }
        if let Some(pin) = self.board.duplicate_pin() {
            return Err(ConfigError::DuplicatePin(pin));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinConfig;

    #[test]
    fn test_defaults() {
        let config = DeviceConfig::default();
        assert_eq!(config.power.power_on_time_s, 18_000);
        assert_eq!(config.power.debounce_ms, 100);
        assert_eq!(config.power.pending_off_ticks, 2);
        assert_eq!(config.power.double_press_window_ms, 1000);
        assert!(!config.outputs.aux_follows_relays);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_times() {
        let mut config = DeviceConfig::default();
        config.power.power_on_time_s = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPowerOnTime));

        let mut config = DeviceConfig::default();
        config.power.pending_off_ticks = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroPendingOff));
    }

    #[test]
    fn test_validate_rejects_shared_pin() {
        let mut config = DeviceConfig::default();
        config.board.indicator = PinConfig::new(0);
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePin(0)));
    }

    #[test]
    fn test_from_toml_checks_against_default_pins() {
        // button keeps its default gpio0
        let err = DeviceConfig::from_toml("[pins]\nrelay1 = \"gpio0\"\n").unwrap_err();
        assert_eq!(err, ConfigError::DuplicatePin(0));

        let config = DeviceConfig::from_toml("[pins]\nrelay1 = \"gpio9\"\n").unwrap();
        assert_eq!(config.board.relay1, PinConfig::new(9));
        assert_eq!(config.board.button, PinConfig::button(0));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = include_str!("../../../dwell-firmware/dwell.toml");
        assert_eq!(DeviceConfig::from_toml(shipped), Ok(DeviceConfig::default()));
    }

    #[test]
    fn test_from_toml_validates() {
        let err = DeviceConfig::from_toml("[timing]\npower_on_time_s = 0\n").unwrap_err();
        assert_eq!(err, ConfigError::ZeroPowerOnTime);

        let err = DeviceConfig::from_toml("[bogus]\n").unwrap_err();
        assert_eq!(err, ConfigError::Parse(ParseError::InvalidSection));
    }
}
