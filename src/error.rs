//! Error type of the driver
//!
//! The PCD8544 has no way to acknowledge anything, so bus and pin failures carry no detail. The
//! HAL error types differ per board, they are collapsed into [`PCDError::Pin`] and
//! [`PCDError::Spi`]. All other variants are invalid arguments, detected before anything is sent.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PCDError {
    /// setting a GPIO line failed
    Pin,

    /// the SPI bus reported an error
    Spi,

    /// X address outside of 0..=83
    XOutOfRange(u8),

    /// Y address (bank) outside of 0..=5
    YOutOfRange(u8),

    /// a command must be exactly one byte
    CommandLength(usize),

    /// more data than fits in the DDRAM from the current window on
    BufferTooLarge { len: usize, max: usize },

    /// contrast (Vop) outside of 0..=127
    ContrastOutOfRange(u8),

    /// bus clock faster than the controller supports
    BusConfig { frequency_hz: u32 },
}

impl PCDError {
    /// Map the result of a GPIO operation
    pub fn pin<T, E>(result: Result<T, E>) -> Result<T, PCDError> {
        result.map_err(|_| PCDError::Pin)
    }

    /// Map the result of a SPI operation
    pub fn spi<T, E>(result: Result<T, E>) -> Result<T, PCDError> {
        result.map_err(|_| PCDError::Spi)
    }

    /// true for errors caused by the caller handing in a bad value
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, PCDError::Pin | PCDError::Spi)
    }
}

impl fmt::Display for PCDError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PCDError::Pin => write!(f, "GPIO pin error"),
            PCDError::Spi => write!(f, "SPI bus error"),
            PCDError::XOutOfRange(x) => write!(f, "X address {} out of range 0..=83", x),
            PCDError::YOutOfRange(y) => write!(f, "Y address {} out of range 0..=5", y),
            PCDError::CommandLength(len) => {
                write!(f, "command must be exactly one byte, got {}", len)
            }
            PCDError::BufferTooLarge { len, max } => {
                write!(f, "buffer of {} bytes exceeds the {} bytes left in DDRAM", len, max)
            }
            PCDError::ContrastOutOfRange(vop) => {
                write!(f, "contrast {} out of range 0..=127", vop)
            }
            PCDError::BusConfig { frequency_hz } => {
                write!(f, "bus clock of {} Hz exceeds the 4 MHz maximum", frequency_hz)
            }
        }
    }
}
