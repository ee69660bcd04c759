//! Local copies of the 16-bit expander registers and the bit-packing between them and the two
//! 8-bit hardware ports.
//!
//! Nothing in here touches the bus.  The drivers ask the [`Shadow`] which port register to write
//! and with which byte, then perform the transfer themselves.
use crate::{PinMode, PinState};

/// Number of pins on the expander.
pub const PIN_COUNT: u8 = 16;

/// One 8-bit half of a 16-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    /// Pins 0 to 7.
    P0,
    /// Pins 8 to 15.
    P1,
}

impl Port {
    /// Port holding `pin`, or `None` if the pin does not exist.
    pub fn of(pin: u8) -> Option<Self> {
        match pin {
            0..=7 => Some(Port::P0),
            8..=15 => Some(Port::P1),
            _ => None,
        }
    }

    /// The byte of `value` that belongs to this port.
    pub fn byte(self, value: u16) -> u8 {
        match self {
            Port::P0 => (value & 0xFF) as u8,
            Port::P1 => (value >> 8) as u8,
        }
    }
}

/// Split a 16-bit register value into the byte order the chip expects: port 0 first.
pub fn to_ports(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Compose the two bytes read from the input ports, port 0 first.
pub fn from_ports(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Cached register contents of one expander.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Shadow {
    /// Configuration registers: a `1` bit is an input.
    pub mode: u16,
    /// Last value written to the output registers.
    pub output: u16,
    /// Last value read from the input registers.
    pub input: u16,
}

impl Shadow {
    pub const fn new() -> Self {
        Self {
            mode: 0x0000,
            output: 0x0000,
            input: 0x0000,
        }
    }

    /// Change the direction of one pin and return the port whose configuration register must be
    /// rewritten, together with its new contents.
    ///
    /// An out-of-range pin leaves the shadow untouched.
    pub fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Option<(Port, u8)> {
        let port = Port::of(pin)?;
        let mask = 1u16 << pin;
        match mode {
            PinMode::Input => self.mode |= mask,
            PinMode::Output => self.mode &= !mask,
        }
        Some((port, port.byte(self.mode)))
    }

    /// Change the level of one output pin and return the port whose output register must be
    /// rewritten, together with its new contents.
    ///
    /// An out-of-range pin leaves the shadow untouched.
    pub fn write_pin(&mut self, pin: u8, state: PinState) -> Option<(Port, u8)> {
        let port = Port::of(pin)?;
        let mask = 1u16 << pin;
        match state {
            PinState::Low => self.output &= !mask,
            PinState::High => self.output |= mask,
            PinState::Toggle => self.output ^= mask,
        }
        Some((port, port.byte(self.output)))
    }

    /// Store freshly read input port bytes and return the composed value.
    pub fn store_input(&mut self, bytes: [u8; 2]) -> u16 {
        self.input = from_ports(bytes);
        self.input
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERNS: [u16; 5] = [0x0000, 0xffff, 0xa5c3, 0x5a3c, 0x8001];

    #[test]
    fn port_of_pin() {
        for pin in 0..8 {
            assert_eq!(Port::of(pin), Some(Port::P0));
        }
        for pin in 8..16 {
            assert_eq!(Port::of(pin), Some(Port::P1));
        }
        assert_eq!(Port::of(16), None);
        assert_eq!(Port::of(0xff), None);
    }

    #[test]
    fn byte_order() {
        assert_eq!(to_ports(0xabcd), [0xcd, 0xab]);
        assert_eq!(from_ports([0x34, 0x12]), 0x1234);
        assert_eq!(Port::P0.byte(0xabcd), 0xcd);
        assert_eq!(Port::P1.byte(0xabcd), 0xab);
    }

    #[test]
    fn pin_mode_touches_single_bit() {
        for &before in PATTERNS.iter() {
            for pin in 0..PIN_COUNT {
                for mode in [PinMode::Input, PinMode::Output] {
                    let mut shadow = Shadow {
                        mode: before,
                        output: !before,
                        input: before ^ 0x0ff0,
                    };
                    let (port, byte) = shadow.set_pin_mode(pin, mode).unwrap();

                    let mask: u16 = 1 << pin;
                    assert_eq!(shadow.mode & !mask, before & !mask);
                    assert_eq!(shadow.mode & mask != 0, mode == PinMode::Input);
                    assert_eq!(Some(port), Port::of(pin));
                    assert_eq!(byte, port.byte(shadow.mode));
                    assert_eq!(shadow.output, !before);
                    assert_eq!(shadow.input, before ^ 0x0ff0);
                }
            }
        }
    }

    #[test]
    fn write_pin_touches_single_bit() {
        for &before in PATTERNS.iter() {
            for pin in 0..PIN_COUNT {
                for state in [PinState::Low, PinState::High, PinState::Toggle] {
                    let mut shadow = Shadow {
                        mode: !before,
                        output: before,
                        input: 0x1234,
                    };
                    let (port, byte) = shadow.write_pin(pin, state).unwrap();

                    let mask: u16 = 1 << pin;
                    let expected = match state {
                        PinState::Low => false,
                        PinState::High => true,
                        PinState::Toggle => before & mask == 0,
                    };
                    assert_eq!(shadow.output & !mask, before & !mask);
                    assert_eq!(shadow.output & mask != 0, expected);
                    assert_eq!(Some(port), Port::of(pin));
                    assert_eq!(byte, port.byte(shadow.output));
                    assert_eq!(shadow.mode, !before);
                    assert_eq!(shadow.input, 0x1234);
                }
            }
        }
    }

    #[test]
    fn toggle_twice_restores() {
        for &before in PATTERNS.iter() {
            for pin in 0..PIN_COUNT {
                let mut shadow = Shadow {
                    output: before,
                    ..Shadow::new()
                };
                shadow.write_pin(pin, PinState::Toggle).unwrap();
                assert_ne!(shadow.output, before);
                shadow.write_pin(pin, PinState::Toggle).unwrap();
                assert_eq!(shadow.output, before);
            }
        }
    }

    #[test]
    fn out_of_range_pins_are_rejected() {
        let original = Shadow {
            mode: 0x1357,
            output: 0x2468,
            input: 0x9abc,
        };
        for pin in PIN_COUNT..=u8::MAX {
            let mut shadow = original;
            assert_eq!(shadow.set_pin_mode(pin, PinMode::Input), None);
            assert_eq!(shadow.set_pin_mode(pin, PinMode::Output), None);
            assert_eq!(shadow.write_pin(pin, PinState::High), None);
            assert_eq!(shadow.write_pin(pin, PinState::Toggle), None);
            assert_eq!(shadow, original);
        }
    }

    #[test]
    fn input_is_cached() {
        let mut shadow = Shadow::new();
        assert_eq!(shadow.store_input([0x34, 0x12]), 0x1234);
        assert_eq!(shadow.input, 0x1234);

        shadow.output = 0xffff;
        shadow.clear();
        assert_eq!(shadow, Shadow::new());
    }
}
