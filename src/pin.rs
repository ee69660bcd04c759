use crate::dev::pca9535::Expander;
use crate::{Error, PinMode, PinState, PortMutex};
use core::marker::PhantomData;
use embedded_hal::digital as hal_digital;
use embedded_hal::i2c::I2c;

/// Representation of a port-expander pin.
///
/// `Pin` is not constructed directly, this type is created by instanciating a
/// [`Pca9535`][crate::Pca9535] and then getting access to all its pins using the `.split()`
/// method.
///
/// Every method locks the expander for a single operation.
pub struct Pin<'a, MODE, MUTEX> {
    pin: u8,
    expander: &'a MUTEX,
    _m: PhantomData<MODE>,
}

impl<'a, MODE, MUTEX, I2C> Pin<'a, MODE, MUTEX>
where
    I2C: I2c,
    MUTEX: PortMutex<Port = Expander<I2C>>,
{
    pub(crate) fn new(pin: u8, expander: &'a MUTEX) -> Self {
        assert!(pin < crate::shadow::PIN_COUNT);
        Self {
            pin,
            expander,
            _m: PhantomData,
        }
    }

    /// Index of this pin, `0` for `IO0_0` up to `15` for `IO1_7`.
    pub fn pin_number(&self) -> u8 {
        self.pin
    }

    fn into_mode<NEW>(self, mode: PinMode) -> Result<Pin<'a, NEW, MUTEX>, Error<I2C::Error>> {
        self.expander
            .lock(|drv| drv.set_pin_mode(self.pin, mode))?;
        Ok(Pin {
            pin: self.pin,
            expander: self.expander,
            _m: PhantomData,
        })
    }

    pub fn into_input(self) -> Result<Pin<'a, crate::mode::Input, MUTEX>, Error<I2C::Error>> {
        self.into_mode(PinMode::Input)
    }

    /// Switch to output mode.  The pin drives whatever level was last written for it.
    pub fn into_output(self) -> Result<Pin<'a, crate::mode::Output, MUTEX>, Error<I2C::Error>> {
        self.into_mode(PinMode::Output)
    }

    /// Switch to output mode, driving HIGH.
    ///
    /// The level is written before the direction changes so the pin does not glitch low.
    pub fn into_output_high(
        self,
    ) -> Result<Pin<'a, crate::mode::Output, MUTEX>, Error<I2C::Error>> {
        self.expander
            .lock(|drv| drv.write_pin(self.pin, PinState::High))?;
        self.into_mode(PinMode::Output)
    }
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, I2C> Pin<'a, MODE, MUTEX>
where
    I2C: I2c,
    MUTEX: PortMutex<Port = Expander<I2C>>,
{
    /// Read the electrical level of the pin from the chip.
    pub fn is_high(&self) -> Result<bool, Error<I2C::Error>> {
        self.expander.lock(|drv| drv.read_pin(self.pin))
    }

    pub fn is_low(&self) -> Result<bool, Error<I2C::Error>> {
        self.is_high().map(|b| !b)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, I2C> Pin<'a, MODE, MUTEX>
where
    I2C: I2c,
    MUTEX: PortMutex<Port = Expander<I2C>>,
{
    pub fn set_high(&mut self) -> Result<(), Error<I2C::Error>> {
        self.expander
            .lock(|drv| drv.write_pin(self.pin, PinState::High))
    }

    pub fn set_low(&mut self) -> Result<(), Error<I2C::Error>> {
        self.expander
            .lock(|drv| drv.write_pin(self.pin, PinState::Low))
    }

    pub fn toggle(&mut self) -> Result<(), Error<I2C::Error>> {
        self.expander
            .lock(|drv| drv.write_pin(self.pin, PinState::Toggle))
    }

    /// Whether the pin was last set HIGH.  Does not access the bus.
    pub fn is_set_high(&self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.expander.lock(|drv| drv.outputs()) & (1 << self.pin) != 0)
    }

    pub fn is_set_low(&self) -> Result<bool, Error<I2C::Error>> {
        self.is_set_high().map(|b| !b)
    }
}

impl<'a, MODE, MUTEX, I2C> hal_digital::ErrorType for Pin<'a, MODE, MUTEX>
where
    I2C: I2c,
    MUTEX: PortMutex<Port = Expander<I2C>>,
{
    type Error = Error<I2C::Error>;
}

impl<'a, MODE: crate::mode::HasInput, MUTEX, I2C> hal_digital::InputPin for Pin<'a, MODE, MUTEX>
where
    I2C: I2c,
    MUTEX: PortMutex<Port = Expander<I2C>>,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_high(self)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_low(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, I2C> hal_digital::OutputPin for Pin<'a, MODE, MUTEX>
where
    I2C: I2c,
    MUTEX: PortMutex<Port = Expander<I2C>>,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Pin::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Pin::set_high(self)
    }
}

impl<'a, MODE: crate::mode::HasOutput, MUTEX, I2C> hal_digital::StatefulOutputPin
    for Pin<'a, MODE, MUTEX>
where
    I2C: I2c,
    MUTEX: PortMutex<Port = Expander<I2C>>,
{
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_high(self)
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Pin::is_set_low(self)
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        Pin::toggle(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Pca9535;
    use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
    use embedded_hal_mock::eh1::i2c as mock_i2c;
    use std::sync::Mutex;

    fn blink<P: OutputPin + StatefulOutputPin>(pin: &mut P) -> Result<(), P::Error> {
        pin.set_high()?;
        pin.toggle()?;
        pin.set_low()
    }

    #[test]
    fn digital_traits() {
        let expectations = [
            // io1_2 as output
            mock_i2c::Transaction::write(0x20, vec![0x07, 0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x03, 0x04]),
            mock_i2c::Transaction::write(0x20, vec![0x03, 0x00]),
            mock_i2c::Transaction::write(0x20, vec![0x03, 0x00]),
            // io0_1 read
            mock_i2c::Transaction::write_read(0x20, vec![0x00], vec![0x02, 0x00]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pca: Pca9535<Mutex<_>> = Pca9535::with_mutex(bus.clone(), false, false, false);
        let pins = pca.split();

        let mut io1_2 = pins.io1_2.into_output().unwrap();
        assert_eq!(io1_2.pin_number(), 10);
        blink(&mut io1_2).unwrap();
        assert!(StatefulOutputPin::is_set_low(&mut io1_2).unwrap());

        let mut io0_1 = pins.io0_1;
        assert!(!InputPin::is_low(&mut io0_1).unwrap());

        bus.done();
    }

    #[test]
    fn output_pins_read_back_level() {
        let expectations = [
            mock_i2c::Transaction::write(0x21, vec![0x06, 0x00]),
            mock_i2c::Transaction::write(0x21, vec![0x02, 0x01]),
            mock_i2c::Transaction::write_read(0x21, vec![0x00], vec![0x00, 0x00]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut pca = Pca9535::new(bus.clone(), true, false, false);
        let pins = pca.split();

        let mut io0_0 = pins.io0_0.into_output().unwrap();
        io0_0.set_high().unwrap();
        // shorted to ground: the latch says high, the pin reads low
        assert!(io0_0.is_set_high().unwrap());
        assert!(io0_0.is_low().unwrap());

        bus.done();
    }
}
