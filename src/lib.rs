//! Driver for the NXP `PCA9535` 16-bit I2C I/O expander.
//!
//! The [`Expander`] translates pin operations into writes of the configuration and output
//! registers and reads of the input registers.  It keeps local copies of these registers so a
//! single pin can be changed without disturbing the other fifteen.
//!
//! ```no_run
//! # let i2c = embedded_hal_mock::eh1::i2c::Mock::new(&[]);
//! use pca9535::{Expander, PinMode, PinState};
//!
//! let mut pca = Expander::new(i2c, false, false, false);
//! pca.begin().unwrap();
//! pca.set_pin_mode(3, PinMode::Output).unwrap();
//! pca.write_pin(3, PinState::High).unwrap();
//! let _level = pca.read_pin(12).unwrap();
//! pca.end().unwrap();
//! ```
//!
//! To hand out individual pins implementing the `embedded-hal` digital traits, wrap the expander
//! in a [`Pca9535`] and `split()` it.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod bus;
mod common;
pub mod dev;
mod error;
#[cfg(feature = "async")]
mod expander_async;
mod mutex;
mod pin;
pub mod shadow;

pub use common::mode;
pub use common::{InvalidArgument, PinMode, PinState, Status};
pub use error::Error;
pub use mutex::PortMutex;
pub use pin::Pin;

pub use dev::pca9535::{Expander, Pca9535};
#[cfg(feature = "async")]
pub use expander_async::ExpanderAsync;
