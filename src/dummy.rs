//! # Placeholders for lines and delays a board does not have
//!
//! Not every module breaks out a backlight pin, and only some boards switch the display supply
//! with a GPIO. Hand in a [`DummyOutputPin`] for a line that is not wired and it behaves like a
//! working pin that does nothing. [`PCD8544::new`](crate::PCD8544::new) uses it as the type of
//! the missing power line.
//!
//! [`NoDelay`] returns immediately. It is good enough for a bit-banged bus on a slow core, not
//! for the reset pulse of a real display.

use core::convert::Infallible;

use hal::blocking::delay::{DelayMs, DelayUs};
use hal::digital::v2::OutputPin;

/// An OutputPin that is not connected to anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummyOutputPin;

impl OutputPin for DummyOutputPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Delay that does not wait
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl DelayUs<u8> for NoDelay {
    #[inline]
    fn delay_us(&mut self, _us: u8) {}
}

impl DelayUs<u16> for NoDelay {
    #[inline]
    fn delay_us(&mut self, _us: u16) {}
}

impl DelayMs<u8> for NoDelay {
    #[inline]
    fn delay_ms(&mut self, _ms: u8) {}
}
