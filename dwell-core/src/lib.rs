//! Board-agnostic core logic for the relay hold-timer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Signals shared with the tick and button handlers
//! - Power controller (debounce, double press, countdown power-off)
//! - State machine for the power states
//! - Configuration types and the embedded TOML parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod power;
pub mod state;
