//! # Instruction set of the PCD8544
//!
//! Instructions and their arguments are enums, written to follow the data sheet:
//! <https://www.sparkfun.com/datasheets/LCD/Monochrome/Nokia5110.pdf>
//!
//! The controller has two instruction sets. The basic set addresses the DDRAM and selects the
//! display mode, the extended set configures the LCD voltages. Which one is active is chosen by
//! the H bit of [`Instruction::FunctionSet`], which is understood in both sets.
//!
//! ## Contrast (SetVop)
//! Vop is the operating voltage of the LCD segments, a 7 bit value. More voltage gives darker
//! pixels. 0x48 is what the 3.3V modules ship with in most example code, Sparkfun and Adafruit
//! boards like it a bit lower. Keep in mind the controller adds voltage on top of this when it
//! gets cold (see the temperature coefficient), and the glass does not survive much above 8.5V.
//!
//! ## Temperature coefficient
//! The viscosity of the liquid crystal rises in the cold, so the controller raises Vop linearly
//! for every Kelvin below 27 degrees Celsius. TC2 is the common choice for the 5110 glass.
//!
//! ## Bias
//! The 48 rows are multiplexed. The bias must match the multiplex ratio of the glass, which is
//! 1:48 for the Nokia 5110.

use crate::{error::PCDError, MAX_X, MAX_Y};

/// Highest contrast (Vop) value, it is a 7 bit register
pub const MAX_CONTRAST: u8 = 0x7f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Voltage added to Vop per Kelvin below 27 degrees Celsius.
pub enum TemperatureCoefficient {
    /// 1 mV/K
    TC0 = 0b00,

    /// 9 mV/K
    TC1 = 0b01,

    /// 17 mV/K
    TC2 = 0b10,

    /// 24 mV/K
    TC3 = 0b11,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// Bias system, named after the multiplex ratio it is recommended for.
pub enum MuxRate {
    Bias1To100 = 0,
    Bias1To80 = 1,
    Bias1To65 = 2,
    /// the Nokia 5110 glass
    Bias1To48 = 3,
    Bias1To40 = 4,
    Bias1To24 = 5,
    Bias1To18 = 6,
    Bias1To10 = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
/// What the controller shows.
pub enum DisplayMode {
    /// all pixels off, DDRAM is kept
    DisplayBlank = 0b000,

    /// DDRAM content, a set bit is a black pixel
    Normal = 0b100,

    /// all pixels on
    AllSegmentsOn = 0b001,

    /// DDRAM content inverted
    InverseVideo = 0b101,
}

/// PCD8544 instructions, basic and extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Instruction {
    /// 0x00
    NOP,

    /// 0b0010_0PVH: power down, vertical addressing, extended instruction set
    FunctionSet { pd: bool, v: bool, h: bool },

    /// 0b0000_1D0E (basic)
    SetDisplayMode(DisplayMode),

    /// 0b0100_0YYY, bank 0..=5 (basic)
    Yaddress(u8),

    /// 0b1XXX_XXXX, column 0..=83 (basic)
    Xaddress(u8),

    /// 0b0000_01TT (extended)
    SetTempCoefficient(TemperatureCoefficient),

    /// 0b0001_0BBB (extended)
    SetBiasMode(MuxRate),

    /// 0b1VVV_VVVV, 0..=127 (extended)
    SetVop(u8),
}

use Instruction::*;

impl Instruction {
    /// Encode the instruction as the byte sent with DC low.
    ///
    /// Arguments are checked here, an address outside of the DDRAM would otherwise end up as
    /// a different command or a wrapped address.
    pub fn encode(self) -> Result<u8, PCDError> {
        let byte = match self {
            NOP => 0b0000_0000,
            FunctionSet { pd, v, h } => 0b0010_0000 | ((pd as u8) << 2) | ((v as u8) << 1) | h as u8,
            SetDisplayMode(mode) => 0b0000_1000 | mode as u8,
            Yaddress(y) if y <= MAX_Y => 0b0100_0000 | y,
            Yaddress(y) => return Err(PCDError::YOutOfRange(y)),
            Xaddress(x) if x <= MAX_X => 0b1000_0000 | x,
            Xaddress(x) => return Err(PCDError::XOutOfRange(x)),
            SetTempCoefficient(coeff) => 0b0000_0100 | coeff as u8,
            SetBiasMode(mux) => 0b0001_0000 | mux as u8,
            SetVop(vop) if vop <= MAX_CONTRAST => 0b1000_0000 | vop,
            SetVop(vop) => return Err(PCDError::ContrastOutOfRange(vop)),
        };
        Ok(byte)
    }

    /// true if the instruction belongs to the extended instruction set
    ///
    /// NOP and FunctionSet are understood in both sets and count as basic.
    pub fn extended(&self) -> bool {
        matches!(self, SetTempCoefficient(_) | SetBiasMode(_) | SetVop(_))
    }
}

/// A prelude for convenience, it pulls all enums into scope.
pub mod prelude {
    pub use super::{
        DisplayMode, DisplayMode::*, Instruction, Instruction::*, MuxRate, MuxRate::*,
        TemperatureCoefficient, TemperatureCoefficient::*,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::error::PCDError;

    #[test]
    fn bring_up_sequence_bytes() {
        let bytes = [
            FunctionSet { pd: false, v: false, h: true },
            SetVop(0x48),
            SetTempCoefficient(TC2),
            SetBiasMode(Bias1To48),
            FunctionSet { pd: false, v: false, h: false },
            SetDisplayMode(Normal),
        ]
        .iter()
        .map(|i| i.encode().unwrap())
        .collect::<Vec<_>>();

        assert_eq!(bytes, vec![0x21u8, 0xc8, 0x06, 0x13, 0x20, 0x0c]);
    }

    #[test]
    fn blank_is_the_power_down_byte() {
        assert_eq!(SetDisplayMode(DisplayBlank).encode(), Ok(0x08));
        assert_eq!(SetDisplayMode(InverseVideo).encode(), Ok(0x0d));
    }

    #[test]
    fn addresses_at_the_edges() {
        assert_eq!(Xaddress(0).encode(), Ok(0x80));
        assert_eq!(Xaddress(83).encode(), Ok(0x80 | 83));
        assert_eq!(Yaddress(5).encode(), Ok(0x45));
        assert_eq!(Xaddress(84).encode(), Err(PCDError::XOutOfRange(84)));
        assert_eq!(Yaddress(6).encode(), Err(PCDError::YOutOfRange(6)));
    }

    #[test]
    fn contrast_is_seven_bits() {
        assert_eq!(SetVop(127).encode(), Ok(0xff));
        assert_eq!(SetVop(128).encode(), Err(PCDError::ContrastOutOfRange(128)));
    }

    #[test]
    fn function_set_flags() {
        assert_eq!(FunctionSet { pd: true, v: false, h: false }.encode(), Ok(0x24));
        assert_eq!(FunctionSet { pd: false, v: true, h: false }.encode(), Ok(0x22));
    }

    #[test]
    fn instruction_sets() {
        assert!(SetVop(10).extended());
        assert!(SetBiasMode(Bias1To48).extended());
        assert!(!Xaddress(1).extended());
        assert!(!FunctionSet { pd: false, v: false, h: true }.extended());
    }
}
