//! Configuration of the controller bring-up and of the SPI link
//!
//! [`Config`] holds the register values written during initialization. The defaults are the
//! values for the common 3.3V Nokia 5110 modules.
//!
//! [`BusConfig`] describes the SPI link the controller expects. Hardware SPI peripherals are
//! configured by the board code, use [`BusConfig::mode`] and [`BusConfig::frequency_hz`] for
//! that. [`crate::bitbang::BitBangSpi`] takes the whole struct.

use core::fmt;

use hal::spi::{Mode, Phase, Polarity, MODE_1};

use crate::{
    error::PCDError,
    instructions::{prelude::*, MAX_CONTRAST},
};

/// Absolute maximum serial clock of the PCD8544
pub const MAX_FREQUENCY_HZ: u32 = 4_000_000;

/// Serial clock the driver is tested with
pub const DEFAULT_FREQUENCY_HZ: u32 = 328_125;

/// Register values written by the initialization sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub contrast: u8,
    pub temperature_coefficient: TemperatureCoefficient,
    pub bias: MuxRate,
    pub display_mode: DisplayMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            contrast: 0x48,
            temperature_coefficient: TC2,
            bias: Bias1To48,
            display_mode: Normal,
        }
    }
}

impl Config {
    /// Sparkfun modules (red pcb)
    pub fn sparkfun() -> Self {
        Config::default().with_contrast(49)
    }

    /// Adafruit modules (blue pcb)
    pub fn adafruit() -> Self {
        Config::default().with_contrast(56)
    }

    pub fn with_contrast(mut self, contrast: u8) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn with_temperature_coefficient(mut self, coefficient: TemperatureCoefficient) -> Self {
        self.temperature_coefficient = coefficient;
        self
    }

    pub fn with_bias(mut self, bias: MuxRate) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), PCDError> {
        if self.contrast > MAX_CONTRAST {
            return Err(PCDError::ContrastOutOfRange(self.contrast));
        }
        Ok(())
    }

    /// The initialization sequence, one command byte each.
    ///
    /// Switches to the extended set, writes Vop, temperature coefficient and bias, then returns
    /// to the basic set with horizontal addressing and selects the display mode.
    pub fn init_sequence(&self) -> Result<[u8; 6], PCDError> {
        self.validate()?;
        Ok([
            FunctionSet { pd: false, v: false, h: true }.encode()?,
            SetVop(self.contrast).encode()?,
            SetTempCoefficient(self.temperature_coefficient).encode()?,
            SetBiasMode(self.bias).encode()?,
            FunctionSet { pd: false, v: false, h: false }.encode()?,
            SetDisplayMode(self.display_mode).encode()?,
        ])
    }
}

/// Order in which the bits of a byte are shifted out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// SPI link settings: 8 bit frames, clock mode, bit order and clock rate
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    pub mode: Mode,
    pub bit_order: BitOrder,
    pub frequency_hz: u32,
}

// embedded-hal 0.2 does not derive Debug for the SPI mode
impl fmt::Debug for BusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let polarity = match self.mode.polarity {
            Polarity::IdleLow => "IdleLow",
            Polarity::IdleHigh => "IdleHigh",
        };
        let phase = match self.mode.phase {
            Phase::CaptureOnFirstTransition => "CaptureOnFirstTransition",
            Phase::CaptureOnSecondTransition => "CaptureOnSecondTransition",
        };
        f.debug_struct("BusConfig")
            .field("polarity", &polarity)
            .field("phase", &phase)
            .field("bit_order", &self.bit_order)
            .field("frequency_hz", &self.frequency_hz)
            .finish()
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        BusConfig::lsb_first()
    }
}

impl BusConfig {
    /// Polarity 0, phase 1, LSB first
    pub fn lsb_first() -> Self {
        BusConfig {
            mode: MODE_1,
            bit_order: BitOrder::LsbFirst,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
        }
    }

    /// Polarity 0, phase 1, MSB first
    pub fn msb_first() -> Self {
        BusConfig {
            bit_order: BitOrder::MsbFirst,
            ..BusConfig::lsb_first()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_frequency(mut self, frequency_hz: u32) -> Self {
        self.frequency_hz = frequency_hz;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Rejects clocks the controller can not follow.
    pub fn validate(&self) -> Result<(), PCDError> {
        if self.frequency_hz == 0 || self.frequency_hz > MAX_FREQUENCY_HZ {
            return Err(PCDError::BusConfig {
                frequency_hz: self.frequency_hz,
            });
        }
        Ok(())
    }

    /// Half of a clock period in whole microseconds, rounded up.
    pub fn half_period_us(&self) -> u8 {
        let frequency = u64::from(self.frequency_hz.max(1));
        let half = (500_000 + frequency - 1) / frequency;
        half.min(u64::from(u8::MAX)) as u8
    }
}
