//! # Driver for the PCD8544 controller of the Nokia 5110 LCD
//!
//! The display has 84x48 pixels, stored in the controller DDRAM as 6 banks of 84 column bytes.
//! Every byte is one column of 8 pixels with the LSB on top.
//!
//! Create a driver with [`PCD8544::new`] (no power line) or [`PCD8544::new_with_power`] (the
//! display VCC is switched by a GPIO). Both reset and initialize the controller and clear the
//! DDRAM before returning, so the display is ready for [`PCD8544::set_xy`] and
//! [`PCD8544::write`].
//!
//! ```ignore
//! let mut lcd = PCD8544::new(spi, dc, ce, rst, light, delay, Config::default())?;
//! lcd.light_on()?;
//! lcd.write_at(0, 0, &[0xff, 0x81, 0x81, 0xff])?;
//! lcd.turn_off()?;
//! ```
#![cfg_attr(not(test), no_std)]

extern crate embedded_hal as hal;

pub mod bitbang;
pub mod config;
pub mod display;
pub mod dummy;
pub mod error;
pub mod instructions;

#[cfg(test)]
mod mock;

pub use crate::config::{BitOrder, BusConfig, Config};
pub use crate::display::PCD8544;
pub use crate::error::PCDError;

/// display width in pixels
pub const WIDTH: u8 = 84;

/// display height in pixels
pub const HEIGHT: u8 = 48;

/// number of DDRAM banks, each 8 pixels high
pub const DDRAM_BANKS: u8 = HEIGHT / 8;

/// size of the DDRAM in bytes, 504 for the Nokia 5110
pub const DDRAM_SIZE: usize = WIDTH as usize * DDRAM_BANKS as usize;

/// highest valid X address (column)
pub const MAX_X: u8 = WIDTH - 1;

/// highest valid Y address (bank)
pub const MAX_Y: u8 = DDRAM_BANKS - 1;
