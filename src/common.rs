/// Direction of a single pin.
///
/// In the configuration registers of the chip, a `1` bit makes a pin an input and a `0` bit makes
/// it an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
}

impl PinMode {
    /// Raw value selecting [`PinMode::Input`].
    pub const INPUT: u8 = 0;
    /// Raw value selecting [`PinMode::Output`].
    pub const OUTPUT: u8 = 1;
}

impl TryFrom<u8> for PinMode {
    type Error = InvalidArgument;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            Self::INPUT => Ok(PinMode::Input),
            Self::OUTPUT => Ok(PinMode::Output),
            _ => Err(InvalidArgument(raw)),
        }
    }
}

/// Requested change for a single output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    Low,
    High,
    /// Invert whatever was last written to the pin.
    Toggle,
}

impl PinState {
    pub const LOW: u8 = 0;
    pub const HIGH: u8 = 1;
    pub const TOGGLE: u8 = 2;
}

impl TryFrom<u8> for PinState {
    type Error = InvalidArgument;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            Self::LOW => Ok(PinState::Low),
            Self::HIGH => Ok(PinState::High),
            Self::TOGGLE => Ok(PinState::Toggle),
            _ => Err(InvalidArgument(raw)),
        }
    }
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

/// A raw mode or state value that does not name any [`PinMode`] or [`PinState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidArgument(pub u8);

/// Outcome of the idempotent lifecycle calls `begin()` and `end()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// The transition was performed.
    Done,
    /// The expander already was in the requested state; the bus was not touched.
    NoOp,
}

/// Pin Modes
pub mod mode {
    /// Trait for pin-modes which can be used to set a logic level.
    pub trait HasOutput {}
    /// Trait for pin-modes which can be used to read a logic level.
    pub trait HasInput {}

    /// Pin configured as an input.
    pub struct Input;
    impl HasInput for Input {}

    /// Pin configured as an output.
    ///
    /// The input register still reflects the electrical level of output pins, so they can be
    /// read as well.
    pub struct Output;
    impl HasOutput for Output {}
    impl HasInput for Output {}
}
