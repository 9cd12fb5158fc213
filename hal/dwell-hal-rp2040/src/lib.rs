//! RP2040-specific HAL for the Dwell firmware
//!
//! This crate provides the RP2040 implementation of the shared
//! `dwell-hal` port capability set, built on the embassy-rp register
//! definitions:
//!
//! - [`sio::SioBank0`] - GPIO bank 0 through the single-cycle I/O block
//! - [`pins::PinBank`] - Pin peripherals taken by GPIO number

#![no_std]

pub mod pins;
pub mod sio;

pub use pins::{BankError, PinBank};
pub use sio::{SioBank0, GPIO_COUNT};

// Re-export shared types from dwell-hal for convenience
pub use dwell_hal::{Input, Output, Pin, PinError, PortRegisters};
