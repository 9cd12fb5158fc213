//! Inter-task communication
//!
//! The tick and button tasks write [`SIGNALS`] and wake the controller
//! through [`WAKE`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use dwell_core::power::PowerSignals;

/// Button latch and power-down countdown
pub static SIGNALS: PowerSignals = PowerSignals::new();

/// Signal that a press was latched or the countdown reached zero
pub static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
