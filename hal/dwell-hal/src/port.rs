//! Port register abstractions
//!
//! A port groups three registers that address the same set of lines:
//! a direction register (driven vs. read), an output register and an input
//! register. Every pin of the port shares them, so all writes here touch a
//! single bit and leave the sibling bits alone.

/// Bit mask for a pin index
#[inline]
pub const fn mask(index: u8) -> u32 {
    1 << index
}

/// A single memory-mapped register
///
/// Implementations provide volatile access for real hardware or plain
/// storage for simulation. Access is through `&self`: a register is shared
/// by every pin mapped onto it.
pub trait Register {
    /// Number of usable bits in the register
    const WIDTH: u8;

    /// Read the current register value
    fn read(&self) -> u32;

    /// Overwrite the whole register
    fn write(&self, value: u32);

    /// Set the bits in `mask`, preserving all others
    fn set_bits(&self, mask: u32) {
        self.write(self.read() | mask);
    }

    /// Clear the bits in `mask`, preserving all others
    fn clear_bits(&self, mask: u32) {
        self.write(self.read() & !mask);
    }

    /// Set or clear the bits in `mask`
    fn assign_bits(&self, mask: u32, set: bool) {
        if set {
            self.set_bits(mask);
        } else {
            self.clear_bits(mask);
        }
    }
}

/// Capability set of one I/O port
///
/// The operations are named after their intent rather than after the
/// register they touch. On some chips the output register doubles as the
/// pull-up control while a line is in read mode; keeping
/// [`configure_read_mode`](Self::configure_read_mode) and
/// [`write_driven_level`](Self::write_driven_level) apart means that
/// aliasing never leaks into pin code.
pub trait PortRegisters {
    /// Number of lines addressed by the port
    const WIDTH: u8;

    /// Configure a line as driven (output)
    fn set_driven(&self, index: u8);

    /// Configure a line as floating (input / high impedance)
    ///
    /// Only the direction bit changes; the output register is untouched.
    fn set_floating(&self, index: u8);

    /// Check whether a line is currently driven
    fn is_driven(&self, index: u8) -> bool;

    /// Write the physical level of a driven line
    fn write_driven_level(&self, index: u8, high: bool);

    /// Read back the physical level last written to the output register
    fn output_level(&self, index: u8) -> bool;

    /// Put a line in read mode with the pull-up enabled or disabled
    fn configure_read_mode(&self, index: u8, pullup: bool);

    /// Sample the physical level present on a line
    fn read_input(&self, index: u8) -> bool;
}

/// Port built from three discrete registers
///
/// Classic 8-bit MCU layout (DDRx / PORTx / PINx): a `1` in the direction
/// register drives the line, and the output register bit of a line in read
/// mode enables its pull-up.
#[derive(Debug, Default)]
pub struct RegisterPort<R> {
    direction: R,
    output: R,
    input: R,
}

impl<R: Register> RegisterPort<R> {
    /// Create a port from its direction, output and input registers
    pub const fn new(direction: R, output: R, input: R) -> Self {
        Self {
            direction,
            output,
            input,
        }
    }

    /// Direction register
    pub fn direction(&self) -> &R {
        &self.direction
    }

    /// Output register
    pub fn output(&self) -> &R {
        &self.output
    }

    /// Input register
    pub fn input(&self) -> &R {
        &self.input
    }
}

impl<R: Register> PortRegisters for RegisterPort<R> {
    const WIDTH: u8 = R::WIDTH;

    fn set_driven(&self, index: u8) {
        self.direction.set_bits(mask(index));
    }

    fn set_floating(&self, index: u8) {
        self.direction.clear_bits(mask(index));
    }

    fn is_driven(&self, index: u8) -> bool {
        self.direction.read() & mask(index) != 0
    }

    fn write_driven_level(&self, index: u8, high: bool) {
        self.output.assign_bits(mask(index), high);
    }

    fn output_level(&self, index: u8) -> bool {
        self.output.read() & mask(index) != 0
    }

    fn configure_read_mode(&self, index: u8, pullup: bool) {
        // Direction first: with the line still driven, setting the output
        // bit would briefly drive it high.
        self.direction.clear_bits(mask(index));
        self.output.assign_bits(mask(index), pullup);
    }

    fn read_input(&self, index: u8) -> bool {
        self.input.read() & mask(index) != 0
    }
}
