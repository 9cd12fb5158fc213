//! Configuration types
//!
//! Startup configuration: controller timings, pin assignment and output
//! behaviour. Parsed from the TOML file embedded in the firmware.

pub mod hardware;
pub mod toml;
pub mod types;

pub use hardware::*;
pub use toml::{parse_config, ParseError};
pub use types::*;
