//! Build script for dwell-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates dwell.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Pin functions and the GPIO each defaults to when not set in [pins]
const DEFAULT_PINS: [(&str, u32); 5] = [
    ("button", 0),
    ("relay2", 1),
    ("relay1", 2),
    ("aux", 3),
    ("indicator", 4),
];

/// Timing keys and whether zero is rejected
const TIMING_KEYS: [(&str, bool); 4] = [
    ("power_on_time_s", true),
    ("debounce_ms", false),
    ("pending_off_ticks", true),
    ("double_press_window_ms", false),
];

/// Highest GPIO number on bank 0
const MAX_GPIO: u32 = 29;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate dwell.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=dwell.toml");

    let config_path = Path::new("dwell.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: dwell.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds dwell.toml as its board configuration.      ║\n\
            ║  Please create one in the dwell-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read dwell.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in dwell.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_pins(&config, &mut errors);
    validate_outputs(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in dwell.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=dwell.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only the sections the firmware parser knows are allowed
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        if !["timing", "pins", "outputs"].contains(&name.as_str()) {
            errors.push(format!("unknown section or key '{}'", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = config.get("timing").and_then(|t| t.as_table()) else {
        return;
    };

    for (key, value) in timing {
        let Some(&(_, nonzero)) = TIMING_KEYS.iter().find(|(k, _)| k == key) else {
            errors.push(format!("[timing] unknown key '{}'", key));
            continue;
        };

        match value.as_integer() {
            Some(v) if v < 0 || v > u32::MAX as i64 => {
                errors.push(format!("[timing] {} out of range", key));
            }
            Some(0) if nonzero => {
                errors.push(format!("[timing] {} must be at least 1", key));
            }
            Some(_) => {}
            None => errors.push(format!("[timing] {} must be an integer", key)),
        }
    }
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = config.get("pins").and_then(|p| p.as_table()) else {
        return;
    };

    let mut assigned: Vec<(&str, u32)> = Vec::new();

    for (key, value) in pins {
        let Some(&(name, _)) = DEFAULT_PINS.iter().find(|(name, _)| *name == key.as_str()) else {
            errors.push(format!("[pins] unknown key '{}'", key));
            continue;
        };

        let Some(spec) = value.as_str() else {
            errors.push(format!("[pins] {} must be a string", key));
            continue;
        };

        match parse_pin_number(spec) {
            Some(n) if n <= MAX_GPIO => assigned.push((name, n)),
            Some(n) => errors.push(format!("[pins] {} gpio{} does not exist", key, n)),
            None => errors.push(format!("[pins] {} has invalid pin '{}'", key, spec)),
        }
    }

    // Functions left out keep their default pin and can still collide
    for &(name, default) in &DEFAULT_PINS {
        if !pins.contains_key(name) {
            assigned.push((name, default));
        }
    }

    for (i, &(key, n)) in assigned.iter().enumerate() {
        if let Some((other, _)) = assigned[..i].iter().find(|(_, p)| *p == n) {
            errors.push(format!("[pins] gpio{} used by {} and {}", n, other, key));
        }
    }
}

fn validate_outputs(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(outputs) = config.get("outputs").and_then(|o| o.as_table()) else {
        return;
    };

    for (key, value) in outputs {
        if key != "aux_follows_relays" {
            errors.push(format!("[outputs] unknown key '{}'", key));
        } else if !value.is_bool() {
            errors.push(format!("[outputs] {} must be true or false", key));
        }
    }
}

/// Pin number of a pin string such as "^!gpio0"
fn parse_pin_number(spec: &str) -> Option<u32> {
    spec.trim_start_matches(['!', '^'])
        .strip_prefix("gpio")?
        .parse()
        .ok()
}
