//! Dwell Hardware Abstraction Layer
//!
//! This crate models hardware I/O lines on top of a port: a group of three
//! registers (direction, output, input) shared by every line of the port.
//! Chip-specific HALs implement [`port::PortRegisters`] for their register
//! layout; the application code only ever sees [`gpio::Output`],
//! [`gpio::TristateOutput`] and [`gpio::Input`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (dwell-core, firmware)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  dwell-hal (pins + port capability set) │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ dwell-hal-    │       │  sim::SimPort │
//! │    rp2040     │       │  (host tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`port::PortRegisters`] - Named register operations of one port
//! - [`port::Register`] - A single word-sized register
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod port;
pub mod sim;

// Re-export key types at crate root for convenience
pub use gpio::{DriveLevel, Input, InputPin, Output, OutputPin, Pin, PinError, TristateOutput};
pub use port::{PortRegisters, Register, RegisterPort};
