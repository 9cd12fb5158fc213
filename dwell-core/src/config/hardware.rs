//! Hardware configuration types
//!
//! Pin assignment for the button and the four outputs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number within the port
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up (inputs only)
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create a pin with pull-up enabled
    pub const fn with_pullup(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: true,
        }
    }

    /// Active-low input with pull-up, the usual wiring for a button to ground
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Board pin assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    /// Push button input
    pub button: PinConfig,
    /// First relay
    pub relay1: PinConfig,
    /// Second relay
    pub relay2: PinConfig,
    /// Auxiliary output
    pub aux: PinConfig,
    /// Status indicator
    pub indicator: PinConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            button: PinConfig::button(0),
            relay2: PinConfig::new(1),
            relay1: PinConfig::new(2),
            aux: PinConfig::new(3),
            indicator: PinConfig::new(4),
        }
    }
}

impl BoardConfig {
    /// All configured pins, button first
    pub fn pins(&self) -> [PinConfig; 5] {
        [
            self.button,
            self.relay1,
            self.relay2,
            self.aux,
            self.indicator,
        ]
    }

    /// First pin number that is assigned more than once
    pub fn duplicate_pin(&self) -> Option<u8> {
        let pins = self.pins();
        pins.iter().enumerate().find_map(|(i, a)| {
            pins[i + 1..]
                .iter()
                .any(|b| b.pin == a.pin)
                .then_some(a.pin)
        })
    }

    /// First pin number not below `width`
    ///
    /// `width` is the number of lines the target port has.
    pub fn pin_out_of_range(&self, width: u8) -> Option<u8> {
        self.pins().iter().map(|p| p.pin).find(|&pin| pin >= width)
    }
}
