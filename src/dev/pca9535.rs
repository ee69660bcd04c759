//! Support for the `PCA9535` "16-bit I2C-bus and SMBus low power I/O port with interrupt"
use crate::bus::I2cExt;
use crate::shadow::{self, Port, Shadow};
use crate::{Error, PinMode, PinState, PortMutex, Status};
use core::cell::RefCell;
use embedded_hal::i2c::I2c;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Regs {
    InputPort0 = 0x00,
    InputPort1 = 0x01,
    OutputPort0 = 0x02,
    OutputPort1 = 0x03,
    PolarityInversion0 = 0x04,
    PolarityInversion1 = 0x05,
    Configuration0 = 0x06,
    Configuration1 = 0x07,
}

impl Regs {
    pub(crate) fn output(port: Port) -> Self {
        match port {
            Port::P0 => Regs::OutputPort0,
            Port::P1 => Regs::OutputPort1,
        }
    }

    pub(crate) fn configuration(port: Port) -> Self {
        match port {
            Port::P0 => Regs::Configuration0,
            Port::P1 => Regs::Configuration1,
        }
    }
}

impl From<Regs> for u8 {
    fn from(r: Regs) -> u8 {
        r as u8
    }
}

/// Base address of the chip.  The `A0`..`A2` straps select one of eight addresses above it.
pub const BASE_ADDRESS: u8 = 0x20;

pub(crate) fn strap_address(a0: bool, a1: bool, a2: bool) -> u8 {
    BASE_ADDRESS | ((a2 as u8) << 2) | ((a1 as u8) << 1) | (a0 as u8)
}

/// A single `PCA9535` on the bus.
///
/// All register traffic goes through this type.  It keeps a local copy of the configuration and
/// output registers so that a single pin can be changed without reading the chip first, and a
/// copy of the last input reading.
///
/// The bus can be handed over by value or as `&mut I2C`, and is returned by
/// [`release()`][Expander::release].
///
/// Operations may be issued before [`begin()`][Expander::begin], but the result then depends on
/// whether the bus has been brought up by the HAL.
pub struct Expander<I2C> {
    i2c: I2C,
    addr: u8,
    active: bool,
    shadow: Shadow,
}

impl<I2C> Expander<I2C> {
    /// Create a driver for the chip whose address straps are wired as `a0`, `a1`, `a2`.
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self::with_address(i2c, strap_address(a0, a1, a2))
    }

    /// Create a driver for the chip at the 7-bit `address`.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        debug_assert!(address < 0x80, "not a 7-bit address");
        Self {
            i2c,
            addr: address,
            active: false,
            shadow: Shadow::new(),
        }
    }

    /// Give back the bus.  No bus traffic happens.
    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Whether [`begin()`][Expander::begin] was called without a matching
    /// [`end()`][Expander::end].
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last value written to the configuration registers.  A `1` bit is an input.
    pub fn modes(&self) -> u16 {
        self.shadow.mode
    }

    /// Last value written to the output registers.
    pub fn outputs(&self) -> u16 {
        self.shadow.output
    }

    /// Last value read from the input registers.  This is a cache; call
    /// [`read_all()`][Expander::read_all] for the current state.
    pub fn inputs(&self) -> u16 {
        self.shadow.input
    }
}

impl<I2C: I2c> Expander<I2C> {
    /// Start the session and check that the chip answers.
    ///
    /// Returns [`Status::NoOp`] without touching the bus when the session is already active.  The
    /// session counts as started even when the chip does not answer, in which case
    /// [`Error::NotConnected`] is returned.
    pub fn begin(&mut self) -> Result<Status, Error<I2C::Error>> {
        if self.active {
            return Ok(Status::NoOp);
        }
        self.active = true;

        #[cfg(feature = "defmt")]
        defmt::debug!("pca9535 0x{:02x}: begin", self.addr);

        if self.is_connected()? {
            Ok(Status::Done)
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("pca9535 0x{:02x}: no acknowledge", self.addr);
            Err(Error::NotConnected)
        }
    }

    /// Address the chip with an empty write and report whether it acknowledged.
    ///
    /// Bus errors other than a missing acknowledge are returned as [`Error::Bus`].
    pub fn is_connected(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.i2c.probe(self.addr)?)
    }

    /// Set the direction of all 16 pins at once.  A `1` bit makes the pin an input.
    pub fn set_all_modes(&mut self, mode: u16) -> Result<(), Error<I2C::Error>> {
        self.shadow.mode = mode;
        self.i2c
            .write_regs(self.addr, Regs::Configuration0, &shadow::to_ports(mode))?;
        Ok(())
    }

    /// Set the direction of a single pin.
    ///
    /// Only the configuration register of the port holding `pin` is written; the other pins keep
    /// the direction last set through this driver.
    pub fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Error<I2C::Error>> {
        let Some((port, value)) = self.shadow.set_pin_mode(pin, mode) else {
            return Err(Error::PinOutOfRange(pin));
        };
        self.i2c
            .write_regs(self.addr, Regs::configuration(port), &[value])?;
        Ok(())
    }

    /// Read the electrical level of all 16 pins.
    ///
    /// This is the physical state of the pins, also for pins configured as outputs, and not the
    /// value last written to the output registers.  The result is cached, see
    /// [`inputs()`][Expander::inputs].
    pub fn read_all(&mut self) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0x00; 2];
        self.i2c.read_regs(self.addr, Regs::InputPort0, &mut buf)?;
        Ok(self.shadow.store_input(buf))
    }

    /// Read the electrical level of a single pin.  Always reads both input ports.
    pub fn read_pin(&mut self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        if Port::of(pin).is_none() {
            return Err(Error::PinOutOfRange(pin));
        }
        Ok(self.read_all()? & (1 << pin) != 0)
    }

    /// Write both output registers.  Only pins configured as outputs are driven; the chip latches
    /// the value for the others.
    pub fn write_all(&mut self, state: u16) -> Result<(), Error<I2C::Error>> {
        self.shadow.output = state;
        self.i2c
            .write_regs(self.addr, Regs::OutputPort0, &shadow::to_ports(state))?;
        Ok(())
    }

    /// Change the output level of a single pin.
    ///
    /// Only the output register of the port holding `pin` is written.
    pub fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Error<I2C::Error>> {
        let Some((port, value)) = self.shadow.write_pin(pin, state) else {
            return Err(Error::PinOutOfRange(pin));
        };
        self.i2c.write_regs(self.addr, Regs::output(port), &[value])?;
        Ok(())
    }

    /// End the session: all pins are switched back to inputs and the local register copies are
    /// reset to zero.
    ///
    /// Returns [`Status::NoOp`] without touching the bus when no session is active.  The register
    /// copies are reset even if the configuration write fails.
    pub fn end(&mut self) -> Result<Status, Error<I2C::Error>> {
        if !self.active {
            return Ok(Status::NoOp);
        }
        self.active = false;

        #[cfg(feature = "defmt")]
        defmt::debug!("pca9535 0x{:02x}: end", self.addr);

        let res = self.set_all_modes(0xFFFF);
        self.shadow.clear();
        res.map(|()| Status::Done)
    }
}

/// `PCA9535` with its pins split out as individual [`Pin`][crate::Pin] handles.
///
/// The [`Expander`] lives inside the mutex `M`, which every pin locks for exactly one expander
/// operation.
pub struct Pca9535<M>(M);

impl<I2C> Pca9535<RefCell<Expander<I2C>>>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self::with_mutex(i2c, a0, a1, a2)
    }
}

impl<I2C, M> Pca9535<M>
where
    I2C: I2c,
    M: PortMutex<Port = Expander<I2C>>,
{
    pub fn with_mutex(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self::from_expander(Expander::new(i2c, a0, a1, a2))
    }

    pub fn from_expander(expander: Expander<I2C>) -> Self {
        Self(M::create(expander))
    }

    /// Run `f` with exclusive access to the whole expander, e.g. for
    /// [`begin()`][Expander::begin] or [`write_all()`][Expander::write_all].
    pub fn lock<R, F: FnOnce(&mut Expander<I2C>) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }

    pub fn split(&mut self) -> Parts<'_, I2C, M> {
        Parts {
            io0_0: crate::Pin::new(0, &self.0),
            io0_1: crate::Pin::new(1, &self.0),
            io0_2: crate::Pin::new(2, &self.0),
            io0_3: crate::Pin::new(3, &self.0),
            io0_4: crate::Pin::new(4, &self.0),
            io0_5: crate::Pin::new(5, &self.0),
            io0_6: crate::Pin::new(6, &self.0),
            io0_7: crate::Pin::new(7, &self.0),
            io1_0: crate::Pin::new(8, &self.0),
            io1_1: crate::Pin::new(9, &self.0),
            io1_2: crate::Pin::new(10, &self.0),
            io1_3: crate::Pin::new(11, &self.0),
            io1_4: crate::Pin::new(12, &self.0),
            io1_5: crate::Pin::new(13, &self.0),
            io1_6: crate::Pin::new(14, &self.0),
            io1_7: crate::Pin::new(15, &self.0),
        }
    }
}

/// All pins start out as inputs, which is the power-on state of the chip.
pub struct Parts<'a, I2C, M = RefCell<Expander<I2C>>>
where
    I2C: I2c,
    M: PortMutex<Port = Expander<I2C>>,
{
    pub io0_0: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_1: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_2: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_3: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_4: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_5: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_6: crate::Pin<'a, crate::mode::Input, M>,
    pub io0_7: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_0: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_1: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_2: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_3: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_4: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_5: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_6: crate::Pin<'a, crate::mode::Input, M>,
    pub io1_7: crate::Pin<'a, crate::mode::Input, M>,
}
