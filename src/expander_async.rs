//! Asynchronous variant of the [`Expander`][crate::Expander], built on embedded-hal-async's
//! [`I2c`] trait.
//!
//! This module is only built if the `"async"` feature is enabled.  The register handling is
//! identical to the blocking driver; every operation is one awaited bus transaction.
use crate::bus::AsyncI2cExt;
use crate::dev::pca9535::{strap_address, Regs};
use crate::shadow::{self, Port, Shadow};
use crate::{Error, PinMode, PinState, Status};
use embedded_hal_async::i2c::I2c;

/// A single `PCA9535` driven through an async I2C bus.
pub struct ExpanderAsync<I2C> {
    i2c: I2C,
    addr: u8,
    active: bool,
    shadow: Shadow,
}

impl<I2C> ExpanderAsync<I2C> {
    pub fn new(i2c: I2C, a0: bool, a1: bool, a2: bool) -> Self {
        Self::with_address(i2c, strap_address(a0, a1, a2))
    }

    pub fn with_address(i2c: I2C, address: u8) -> Self {
        debug_assert!(address < 0x80, "not a 7-bit address");
        Self {
            i2c,
            addr: address,
            active: false,
            shadow: Shadow::new(),
        }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn modes(&self) -> u16 {
        self.shadow.mode
    }

    pub fn outputs(&self) -> u16 {
        self.shadow.output
    }

    pub fn inputs(&self) -> u16 {
        self.shadow.input
    }
}

impl<I2C: I2c> ExpanderAsync<I2C> {
    /// See [`Expander::begin()`][crate::Expander::begin].
    pub async fn begin(&mut self) -> Result<Status, Error<I2C::Error>> {
        if self.active {
            return Ok(Status::NoOp);
        }
        self.active = true;

        #[cfg(feature = "defmt")]
        defmt::debug!("pca9535 0x{:02x}: begin", self.addr);

        if self.is_connected().await? {
            Ok(Status::Done)
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("pca9535 0x{:02x}: no acknowledge", self.addr);
            Err(Error::NotConnected)
        }
    }

    pub async fn is_connected(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.i2c.probe(self.addr).await?)
    }

    pub async fn set_all_modes(&mut self, mode: u16) -> Result<(), Error<I2C::Error>> {
        self.shadow.mode = mode;
        self.i2c
            .write_regs(self.addr, Regs::Configuration0.into(), &shadow::to_ports(mode))
            .await?;
        Ok(())
    }

    pub async fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Error<I2C::Error>> {
        let Some((port, value)) = self.shadow.set_pin_mode(pin, mode) else {
            return Err(Error::PinOutOfRange(pin));
        };
        self.i2c
            .write_regs(self.addr, Regs::configuration(port).into(), &[value])
            .await?;
        Ok(())
    }

    /// Read the electrical level of all 16 pins, see
    /// [`Expander::read_all()`][crate::Expander::read_all].
    pub async fn read_all(&mut self) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0x00; 2];
        self.i2c
            .read_regs(self.addr, Regs::InputPort0.into(), &mut buf)
            .await?;
        Ok(self.shadow.store_input(buf))
    }

    pub async fn read_pin(&mut self, pin: u8) -> Result<bool, Error<I2C::Error>> {
        if Port::of(pin).is_none() {
            return Err(Error::PinOutOfRange(pin));
        }
        Ok(self.read_all().await? & (1 << pin) != 0)
    }

    pub async fn write_all(&mut self, state: u16) -> Result<(), Error<I2C::Error>> {
        self.shadow.output = state;
        self.i2c
            .write_regs(self.addr, Regs::OutputPort0.into(), &shadow::to_ports(state))
            .await?;
        Ok(())
    }

    pub async fn write_pin(&mut self, pin: u8, state: PinState) -> Result<(), Error<I2C::Error>> {
        let Some((port, value)) = self.shadow.write_pin(pin, state) else {
            return Err(Error::PinOutOfRange(pin));
        };
        self.i2c
            .write_regs(self.addr, Regs::output(port).into(), &[value])
            .await?;
        Ok(())
    }

    /// See [`Expander::end()`][crate::Expander::end].
    pub async fn end(&mut self) -> Result<Status, Error<I2C::Error>> {
        if !self.active {
            return Ok(Status::NoOp);
        }
        self.active = false;

        #[cfg(feature = "defmt")]
        defmt::debug!("pca9535 0x{:02x}: end", self.addr);

        let res = self.set_all_modes(0xFFFF).await;
        self.shadow.clear();
        res.map(|()| Status::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::ExpanderAsync;
    use crate::{Error, PinMode, PinState, Status};
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    unsafe fn clone(_: *const ()) -> RawWaker {
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    unsafe fn noop(_: *const ()) {}

    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);

    /// The mock bus never returns `Pending`, so polling until ready is enough.
    fn block_on<F: Future>(fut: F) -> F::Output {
        let waker = unsafe { Waker::from_raw(RawWaker::new(core::ptr::null(), &VTABLE)) };
        let mut cx = Context::from_waker(&waker);
        let mut fut = pin!(fut);
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    #[test]
    fn lifecycle() {
        let expectations = [
            mock_i2c::Transaction::write(0x24, vec![]),
            mock_i2c::Transaction::write(0x24, vec![0x06, 0xf0, 0xff]),
            mock_i2c::Transaction::write(0x24, vec![0x02, 0xcd, 0xab]),
            mock_i2c::Transaction::write(0x24, vec![0x07, 0x7f]),
            mock_i2c::Transaction::write(0x24, vec![0x03, 0x2b]),
            mock_i2c::Transaction::write_read(0x24, vec![0x00], vec![0x34, 0x12]),
            mock_i2c::Transaction::write(0x24, vec![0x06, 0xff, 0xff]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pca = ExpanderAsync::new(bus.clone(), false, false, true);
        block_on(async {
            assert_eq!(pca.begin().await, Ok(Status::Done));
            assert_eq!(pca.begin().await, Ok(Status::NoOp));

            pca.set_all_modes(0xfff0).await.unwrap();
            pca.write_all(0xabcd).await.unwrap();
            pca.set_pin_mode(15, PinMode::Output).await.unwrap();
            assert_eq!(pca.modes(), 0x7ff0);
            pca.write_pin(15, PinState::Toggle).await.unwrap();
            assert_eq!(pca.outputs(), 0x2bcd);

            assert_eq!(pca.read_pin(4).await, Ok(true));
            assert_eq!(pca.inputs(), 0x1234);

            assert_eq!(pca.end().await, Ok(Status::Done));
            assert_eq!(pca.end().await, Ok(Status::NoOp));
        });
        assert_eq!(pca.modes(), 0x0000);
        assert_eq!(pca.outputs(), 0x0000);
        assert_eq!(pca.inputs(), 0x0000);

        bus.done();
    }

    #[test]
    fn errors() {
        let expectations = [mock_i2c::Transaction::write(0x20, vec![])
            .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pca = ExpanderAsync::with_address(bus.clone(), 0x20);
        block_on(async {
            assert_eq!(pca.begin().await, Err(Error::NotConnected));
            assert_eq!(
                pca.set_pin_mode(16, PinMode::Input).await,
                Err(Error::PinOutOfRange(16))
            );
            assert_eq!(
                pca.write_pin(200, PinState::High).await,
                Err(Error::PinOutOfRange(200))
            );
            assert_eq!(pca.read_pin(16).await, Err(Error::PinOutOfRange(16)));
        });
        assert_eq!(pca.modes(), 0x0000);
        assert_eq!(pca.outputs(), 0x0000);

        bus.done();
    }
}
