//! Simulated registers
//!
//! In-memory stand-ins for an 8-bit three-register port. Used by host-side
//! tests of this crate and of the application logic built on it.

use core::cell::Cell;

use crate::port::{mask, PortRegisters, Register, RegisterPort};

/// Width of simulated registers
pub const SIM_WIDTH: u8 = 8;

const SIM_MASK: u32 = (1 << SIM_WIDTH) - 1;

/// 8-bit register backed by a `Cell`
#[derive(Debug, Default)]
pub struct SimRegister {
    value: Cell<u32>,
}

impl SimRegister {
    /// Create a register reading zero
    pub const fn new() -> Self {
        Self {
            value: Cell::new(0),
        }
    }

    /// Create a register with an initial value
    pub const fn with_value(value: u32) -> Self {
        Self {
            value: Cell::new(value & SIM_MASK),
        }
    }
}

impl Register for SimRegister {
    const WIDTH: u8 = SIM_WIDTH;

    fn read(&self) -> u32 {
        self.value.get()
    }

    fn write(&self, value: u32) {
        self.value.set(value & SIM_MASK);
    }
}

/// Simulated port
///
/// Behaves like a [`RegisterPort`] and additionally lets a test play the
/// part of the outside world by driving levels onto the input register.
#[derive(Debug, Default)]
pub struct SimPort {
    regs: RegisterPort<SimRegister>,
}

impl SimPort {
    /// Create a port with all registers cleared (every line floating, low)
    pub const fn new() -> Self {
        Self {
            regs: RegisterPort::new(SimRegister::new(), SimRegister::new(), SimRegister::new()),
        }
    }

    /// Set the external level seen on a line
    pub fn drive_input(&self, index: u8, high: bool) {
        self.regs.input().assign_bits(mask(index), high);
    }

    /// Raw direction register contents
    pub fn direction_bits(&self) -> u32 {
        self.regs.direction().read()
    }

    /// Raw output register contents
    pub fn output_bits(&self) -> u32 {
        self.regs.output().read()
    }

    /// Raw input register contents
    pub fn input_bits(&self) -> u32 {
        self.regs.input().read()
    }
}

impl PortRegisters for SimPort {
    const WIDTH: u8 = SIM_WIDTH;

    fn set_driven(&self, index: u8) {
        self.regs.set_driven(index);
    }

    fn set_floating(&self, index: u8) {
        self.regs.set_floating(index);
    }

    fn is_driven(&self, index: u8) -> bool {
        self.regs.is_driven(index)
    }

    fn write_driven_level(&self, index: u8, high: bool) {
        self.regs.write_driven_level(index, high);
    }

    fn output_level(&self, index: u8) -> bool {
        self.regs.output_level(index)
    }

    fn configure_read_mode(&self, index: u8, pullup: bool) {
        self.regs.configure_read_mode(index, pullup);
    }

    fn read_input(&self, index: u8) -> bool {
        self.regs.read_input(index)
    }
}
