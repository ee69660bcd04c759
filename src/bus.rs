use embedded_hal::i2c as hal_i2c;

/// Register transfers are at most a register address and one byte per port.
const MAX_FRAME: usize = 3;

/// Build `[reg, values...]` into a stack buffer and return the used length.
pub(crate) fn frame(reg: u8, values: &[u8]) -> ([u8; MAX_FRAME], usize) {
    assert!(values.len() < MAX_FRAME);
    let mut buf = [0x00; MAX_FRAME];
    buf[0] = reg;
    buf[1..=values.len()].copy_from_slice(values);
    (buf, values.len() + 1)
}

/// Whether a bus error means that nobody answered on the address.
pub(crate) fn is_nack<E: hal_i2c::Error>(err: &E) -> bool {
    matches!(err.kind(), hal_i2c::ErrorKind::NoAcknowledge(_))
}

pub(crate) trait I2cExt {
    type Error;

    fn write_regs<R: Into<u8>>(&mut self, addr: u8, reg: R, values: &[u8])
        -> Result<(), Self::Error>;
    fn read_regs<R: Into<u8>>(&mut self, addr: u8, reg: R, buf: &mut [u8])
        -> Result<(), Self::Error>;
    fn probe(&mut self, addr: u8) -> Result<bool, Self::Error>;
}

impl<I2C: hal_i2c::I2c> I2cExt for I2C {
    type Error = I2C::Error;

    fn write_regs<R: Into<u8>>(
        &mut self,
        addr: u8,
        reg: R,
        values: &[u8],
    ) -> Result<(), Self::Error> {
        let (buf, len) = frame(reg.into(), values);
        #[cfg(feature = "defmt")]
        defmt::trace!("i2c 0x{:02x} write {=[u8]:x}", addr, &buf[..len]);
        self.write(addr, &buf[..len])
    }

    fn read_regs<R: Into<u8>>(
        &mut self,
        addr: u8,
        reg: R,
        buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        let reg = reg.into();
        self.write_read(addr, &[reg], buf)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("i2c 0x{:02x} read 0x{:02x} -> {=[u8]:x}", addr, reg, &*buf);
        Ok(())
    }

    fn probe(&mut self, addr: u8) -> Result<bool, Self::Error> {
        match self.write(addr, &[]) {
            Ok(()) => Ok(true),
            Err(e) if is_nack(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(feature = "async")]
pub(crate) trait AsyncI2cExt {
    type Error;

    async fn write_regs(&mut self, addr: u8, reg: u8, values: &[u8]) -> Result<(), Self::Error>;
    async fn read_regs(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
    async fn probe(&mut self, addr: u8) -> Result<bool, Self::Error>;
}

#[cfg(feature = "async")]
impl<I2C: embedded_hal_async::i2c::I2c> AsyncI2cExt for I2C {
    type Error = I2C::Error;

    async fn write_regs(&mut self, addr: u8, reg: u8, values: &[u8]) -> Result<(), Self::Error> {
        let (buf, len) = frame(reg, values);
        #[cfg(feature = "defmt")]
        defmt::trace!("i2c 0x{:02x} write {=[u8]:x}", addr, &buf[..len]);
        self.write(addr, &buf[..len]).await
    }

    async fn read_regs(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.write_read(addr, &[reg], buf).await?;
        #[cfg(feature = "defmt")]
        defmt::trace!("i2c 0x{:02x} read 0x{:02x} -> {=[u8]:x}", addr, reg, &*buf);
        Ok(())
    }

    async fn probe(&mut self, addr: u8) -> Result<bool, Self::Error> {
        match self.write(addr, &[]).await {
            Ok(()) => Ok(true),
            Err(e) if is_nack(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn frame_prefixes_register() {
        let (buf, len) = super::frame(0x06, &[0x12, 0x34]);
        assert_eq!(&buf[..len], &[0x06, 0x12, 0x34]);

        let (buf, len) = super::frame(0x03, &[0xaa]);
        assert_eq!(&buf[..len], &[0x03, 0xaa]);
    }
}
