//! GPIO bank 0 via SIO
//!
//! Maps the three-register port model onto the RP2040:
//!
//! | Port register | RP2040 register           |
//! |---------------|---------------------------|
//! | direction     | `SIO.GPIO_OE`             |
//! | output        | `SIO.GPIO_OUT`            |
//! | input         | `SIO.GPIO_IN`             |
//! | (pull-up)     | `PADS_BANK0.GPIOx.PUE`    |
//!
//! Single-bit updates go through the SIO `_SET` / `_CLR` aliases, so no
//! read-modify-write can race a handler touching another bit of the same
//! register.

use embassy_rp::pac;

use dwell_hal::port::mask;
use dwell_hal::PortRegisters;

/// Number of GPIO lines in bank 0
pub const GPIO_COUNT: u8 = 30;

/// SIO bank index of the user GPIOs (bank 1 is QSPI)
const BANK0: usize = 0;

/// `IO_BANK0.GPIOx_CTRL.FUNCSEL` value selecting SIO
const FUNCSEL_SIO: u8 = 5;

/// GPIO bank 0 as a port
///
/// Zero-sized; every method goes straight to the hardware registers.
#[derive(Debug)]
pub struct SioBank0 {
    _private: (),
}

impl SioBank0 {
    /// Take the bank
    ///
    /// # Safety
    ///
    /// The caller must ensure that no other driver drives the lines used
    /// through this port. An embassy-rp `Input` on the same line, used only
    /// to wait for edges, is fine.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }

    /// Route a line to the SIO function and enable its input buffer
    fn route_to_sio(&self, index: u8) {
        let n = index as usize;
        pac::PADS_BANK0.gpio(n).modify(|w| {
            w.set_ie(true);
            w.set_od(false);
        });
        pac::IO_BANK0
            .gpio(n)
            .ctrl()
            .write(|w| w.set_funcsel(FUNCSEL_SIO));
    }

    /// Pull-up on or floating; the reset pull-down is always cleared
    fn set_pullup(&self, index: u8, pullup: bool) {
        pac::PADS_BANK0.gpio(index as usize).modify(|w| {
            w.set_pde(false);
            w.set_pue(pullup);
        });
    }
}

impl PortRegisters for SioBank0 {
    const WIDTH: u8 = GPIO_COUNT;

    fn set_driven(&self, index: u8) {
        self.route_to_sio(index);
        pac::SIO.gpio_oe(BANK0).value_set().write_value(mask(index));
    }

    fn set_floating(&self, index: u8) {
        pac::SIO.gpio_oe(BANK0).value_clr().write_value(mask(index));
    }

    fn is_driven(&self, index: u8) -> bool {
        pac::SIO.gpio_oe(BANK0).value().read() & mask(index) != 0
    }

    fn write_driven_level(&self, index: u8, high: bool) {
        let out = pac::SIO.gpio_out(BANK0);
        if high {
            out.value_set().write_value(mask(index));
        } else {
            out.value_clr().write_value(mask(index));
        }
    }

    fn output_level(&self, index: u8) -> bool {
        pac::SIO.gpio_out(BANK0).value().read() & mask(index) != 0
    }

    fn configure_read_mode(&self, index: u8, pullup: bool) {
        pac::SIO.gpio_oe(BANK0).value_clr().write_value(mask(index));
        self.route_to_sio(index);
        self.set_pullup(index, pullup);
    }

    fn read_input(&self, index: u8) -> bool {
        pac::SIO.gpio_in(BANK0).read() & mask(index) != 0
    }
}
