//! Simple TOML parser for device configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! the Dwell configuration file. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Arrays and inline tables
//! - Dotted keys
//!
//! Keys missing from the file keep their default values.

use super::hardware::PinConfig;
use super::types::DeviceConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Unknown key in a known section, or key outside any section
    InvalidKey,
    /// Invalid value type
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timing,
    Pins,
    Outputs,
}

/// Parse TOML configuration into DeviceConfig
///
/// The result is not validated; see [`DeviceConfig::validate`].
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .split('#')
                .next()
                .map(str::trim)
                .and_then(|h| h.strip_suffix(']'))
                .ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

/// Parse section header like "timing" or "pins"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "timing" => Ok(Section::Timing),
        "pins" => Ok(Section::Pins),
        "outputs" => Ok(Section::Outputs),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int(value: &str) -> Result<u32, ParseError> {
    let mut result: u32 = 0;
    let mut digits = 0;

    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ParseError::InvalidValue)?;
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ParseError::InvalidValue)?;
        digits += 1;
    }

    if digits == 0 {
        return Err(ParseError::InvalidValue);
    }
    Ok(result)
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio2", "!gpio3", "^!gpio0"
///
/// `!` marks the pin active-low, `^` enables the pull-up.
pub fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let mut s = parse_string(value);
    let mut inverted = false;
    let mut pull_up = false;

    // Check for modifiers
    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let num = s.strip_prefix("gpio").ok_or(ParseError::InvalidPin)?;
    let pin: u8 = num.parse().map_err(|_| ParseError::InvalidPin)?;

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Timing => {
            let v = parse_int(value)?;
            match key {
                "power_on_time_s" => config.power.power_on_time_s = v,
                "debounce_ms" => config.power.debounce_ms = v,
                "pending_off_ticks" => config.power.pending_off_ticks = v,
                "double_press_window_ms" => config.power.double_press_window_ms = v,
                _ => return Err(ParseError::InvalidKey),
            }
        }
        Section::Pins => {
            let pin = parse_pin(value)?;
            match key {
                "button" => config.board.button = pin,
                "relay1" => config.board.relay1 = pin,
                "relay2" => config.board.relay2 = pin,
                "aux" => config.board.aux = pin,
                "indicator" => config.board.indicator = pin,
                _ => return Err(ParseError::InvalidKey),
            }
        }
        Section::Outputs => match key {
            "aux_follows_relays" => config.outputs.aux_follows_relays = parse_bool(value)?,
            _ => return Err(ParseError::InvalidKey),
        },
        Section::Root => return Err(ParseError::InvalidKey),
    }

    Ok(())
}
