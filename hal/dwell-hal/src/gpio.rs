//! GPIO pin abstractions
//!
//! A [`Pin`] names one line of a port together with its polarity. It is
//! moved into exactly one of [`Output`], [`TristateOutput`] or [`Input`],
//! which configure the port on construction and translate between logical
//! and physical levels afterwards.
//!
//! Logical levels are what the application means ("relay on", "button
//! pressed"); physical levels are what ends up in the registers. The two
//! differ by the pin's active-low flag.

use crate::port::PortRegisters;

/// Digital output pin
///
/// High and low refer to the logical (active / inactive) level.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Error when creating a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin index is not smaller than the port width
    IndexOutOfRange,
}

/// One line of a port
///
/// Holds a shared reference to the port; the port itself is never owned by
/// a pin. A `Pin` is not `Clone`: each line has one owner.
#[derive(Debug)]
pub struct Pin<'p, P> {
    port: &'p P,
    index: u8,
    active_low: bool,
}

impl<'p, P: PortRegisters> Pin<'p, P> {
    /// Create a pin
    ///
    /// # Arguments
    /// - `port`: The port the line belongs to
    /// - `index`: Bit position within the port registers
    /// - `active_low`: If true, the logical active level is a physical low
    pub fn new(port: &'p P, index: u8, active_low: bool) -> Result<Self, PinError> {
        if index >= P::WIDTH {
            return Err(PinError::IndexOutOfRange);
        }
        Ok(Self {
            port,
            index,
            active_low,
        })
    }

    /// Create an active-high pin
    pub fn active_high(port: &'p P, index: u8) -> Result<Self, PinError> {
        Self::new(port, index, false)
    }

    /// Create an active-low pin
    pub fn active_low(port: &'p P, index: u8) -> Result<Self, PinError> {
        Self::new(port, index, true)
    }

    /// Bit position within the port
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Whether the pin is active-low
    pub fn is_active_low(&self) -> bool {
        self.active_low
    }

    fn physical(&self, logical: bool) -> bool {
        logical ^ self.active_low
    }
}

/// Driven output line
#[derive(Debug)]
pub struct Output<'p, P: PortRegisters> {
    pin: Pin<'p, P>,
}

impl<'p, P: PortRegisters> Output<'p, P> {
    /// Configure a pin as output
    ///
    /// Only the direction register is touched; the line drives whatever the
    /// output register already holds for it. Use [`Output::with_level`] to
    /// start from a known level.
    pub fn new(pin: Pin<'p, P>) -> Self {
        pin.port.set_driven(pin.index);
        Self { pin }
    }

    /// Configure a pin as output starting at a given logical level
    ///
    /// The level is written before the line is driven, so the pin never
    /// shows the stale register contents.
    pub fn with_level(pin: Pin<'p, P>, level: bool) -> Self {
        pin.port.write_driven_level(pin.index, pin.physical(level));
        Self::new(pin)
    }

    /// Write a logical level
    pub fn write(&mut self, level: bool) {
        let physical = self.pin.physical(level);
        self.pin.port.write_driven_level(self.pin.index, physical);
    }

    /// Logical level currently held in the output register
    pub fn level(&self) -> bool {
        self.pin.physical(self.pin.port.output_level(self.pin.index))
    }

    /// The underlying pin
    pub fn pin(&self) -> &Pin<'p, P> {
        &self.pin
    }
}

impl<P: PortRegisters> OutputPin for Output<'_, P> {
    fn set_high(&mut self) {
        self.write(true);
    }

    fn set_low(&mut self) {
        self.write(false);
    }

    fn is_set_high(&self) -> bool {
        self.level()
    }
}

/// Requested level of a tri-state output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveLevel {
    /// Driven, logical low
    Low,
    /// Driven, logical high
    High,
    /// Not driven
    HighZ,
}

impl DriveLevel {
    /// Whether this level requires the line to be driven
    pub fn is_driven(self) -> bool {
        !matches!(self, DriveLevel::HighZ)
    }
}

impl From<bool> for DriveLevel {
    fn from(high: bool) -> Self {
        if high {
            DriveLevel::High
        } else {
            DriveLevel::Low
        }
    }
}

/// Output line that can also float
///
/// The direction bit always follows the last requested level: driven for
/// [`DriveLevel::Low`] / [`DriveLevel::High`], floating for
/// [`DriveLevel::HighZ`].
#[derive(Debug)]
pub struct TristateOutput<'p, P: PortRegisters> {
    output: Output<'p, P>,
    level: DriveLevel,
}

impl<'p, P: PortRegisters> TristateOutput<'p, P> {
    /// Configure a pin as a driven tri-state output
    pub fn new(pin: Pin<'p, P>) -> Self {
        let output = Output::new(pin);
        let level = DriveLevel::from(output.level());
        Self { output, level }
    }

    /// Request a drive level
    pub fn write(&mut self, level: DriveLevel) {
        let port = self.output.pin.port;
        let index = self.output.pin.index;

        match level {
            DriveLevel::Low | DriveLevel::High => {
                port.set_driven(index);
                self.output.write(level == DriveLevel::High);
            }
            DriveLevel::HighZ => {
                port.set_floating(index);
                // Leave a logical low behind so that re-driving the line
                // from outside this type starts low.
                self.output.write(false);
            }
        }

        self.level = level;
    }

    /// Last requested drive level
    pub fn drive_level(&self) -> DriveLevel {
        self.level
    }

    /// Whether the line is currently driven
    pub fn is_driven(&self) -> bool {
        let pin = &self.output.pin;
        pin.port.is_driven(pin.index)
    }

    /// The underlying pin
    pub fn pin(&self) -> &Pin<'p, P> {
        self.output.pin()
    }
}

impl<P: PortRegisters> OutputPin for TristateOutput<'_, P> {
    fn set_high(&mut self) {
        self.write(DriveLevel::High);
    }

    fn set_low(&mut self) {
        self.write(DriveLevel::Low);
    }

    fn is_set_high(&self) -> bool {
        self.level == DriveLevel::High
    }
}

/// Input line
#[derive(Debug)]
pub struct Input<'p, P: PortRegisters> {
    pin: Pin<'p, P>,
    pullup: bool,
}

impl<'p, P: PortRegisters> Input<'p, P> {
    /// Configure a pin as input
    pub fn new(pin: Pin<'p, P>, pullup: bool) -> Self {
        pin.port.configure_read_mode(pin.index, pullup);
        Self { pin, pullup }
    }

    /// Configure a pin as input with the pull-up enabled
    pub fn with_pullup(pin: Pin<'p, P>) -> Self {
        Self::new(pin, true)
    }

    /// Read the logical level
    ///
    /// Samples the hardware on every call.
    pub fn read(&self) -> bool {
        self.pin.physical(self.pin.port.read_input(self.pin.index))
    }

    /// Whether the pull-up was enabled at construction
    pub fn is_pullup_enabled(&self) -> bool {
        self.pullup
    }

    /// The underlying pin
    pub fn pin(&self) -> &Pin<'p, P> {
        &self.pin
    }
}

impl<P: PortRegisters> InputPin for Input<'_, P> {
    fn is_high(&self) -> bool {
        self.read()
    }
}
