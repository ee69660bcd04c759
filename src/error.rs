use core::fmt;

/// Errors reported by the expander drivers.
///
/// `E` is the error type of the underlying I2C bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus transaction failed.  It is not retried.
    Bus(E),
    /// The pin index is not in `0..=15`.  Nothing was changed.
    PinOutOfRange(u8),
    /// A raw mode or state value was not one of the defined constants.  Nothing was changed.
    InvalidArgument(u8),
    /// The device did not acknowledge its address when the session was started.
    NotConnected,
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Bus(e)
    }
}

impl<E> Error<E> {
    /// Build an error from a rejected raw mode or state value.
    pub fn invalid(arg: crate::InvalidArgument) -> Self {
        Error::InvalidArgument(arg.0)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "i2c bus error: {:?}", e),
            Error::PinOutOfRange(pin) => write!(f, "pin {} is out of range (0..=15)", pin),
            Error::InvalidArgument(raw) => write!(f, "invalid mode or state value {}", raw),
            Error::NotConnected => f.write_str("device did not acknowledge its address"),
        }
    }
}

impl<E: fmt::Debug> embedded_hal::digital::Error for Error<E> {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
