//! "Bit bang" half duplex SPI implementation
//!
//! The PCD8544 only listens, so two GPIO lines (clock and data in) are enough. Use it when no
//! SPI peripheral is free, or when the SPI pins of the board do not line up with the display.
//!
//! The bus follows a [`BusConfig`]: clock polarity and phase, bit order and clock rate. Modules
//! are wired LSB first or MSB first, pick [`BusConfig::lsb_first`] or [`BusConfig::msb_first`]
//! to match.
//!
//! Based on the implementation by andreyk0:
//! <https://github.com/andreyk0/pcd8544/blob/master/src/spi.rs>

use hal::blocking::delay::DelayUs;
use hal::blocking::spi::Write as SpiWrite;
use hal::digital::v2::OutputPin;
use hal::spi::{Phase, Polarity, MODE_0};

use crate::{
    config::{BitOrder, BusConfig, MAX_FREQUENCY_HZ},
    dummy::NoDelay,
    error::PCDError,
};

/// "Bit bang" SPI implementation.
pub struct BitBangSpi<CLK, DIN, DELAY> {
    clk: CLK,
    din: DIN,
    delay: DELAY,
    config: BusConfig,
    half_period_us: u8,
}

impl<CLK, DIN> BitBangSpi<CLK, DIN, NoDelay>
where
    CLK: OutputPin,
    DIN: OutputPin,
{
    /// MSB first, mode 0, no delay between clock edges.
    ///
    /// Only for cores slow enough that toggling a GPIO takes longer than 125ns, otherwise use
    /// [`BitBangSpi::with_config`].
    pub fn new(clk: CLK, din: DIN) -> Result<BitBangSpi<CLK, DIN, NoDelay>, PCDError> {
        let config = BusConfig::msb_first()
            .with_mode(MODE_0)
            .with_frequency(MAX_FREQUENCY_HZ);
        BitBangSpi::with_config(clk, din, NoDelay, config)
    }
}

impl<CLK, DIN, DELAY> BitBangSpi<CLK, DIN, DELAY>
where
    CLK: OutputPin,
    DIN: OutputPin,
    DELAY: DelayUs<u8>,
{
    /// Constructs the bus from "clock" and "data in" pins and a delay that paces the clock.
    ///
    /// Fails without touching the pins if the clock rate is above what the PCD8544 accepts.
    pub fn with_config(
        clk: CLK,
        din: DIN,
        delay: DELAY,
        config: BusConfig,
    ) -> Result<BitBangSpi<CLK, DIN, DELAY>, PCDError> {
        config.validate()?;
        let mut spi = BitBangSpi {
            clk,
            din,
            delay,
            config,
            half_period_us: config.half_period_us(),
        };
        spi.clock(false)?;
        Ok(spi)
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Hand back the pins and the delay
    pub fn release(self) -> (CLK, DIN, DELAY) {
        (self.clk, self.din, self.delay)
    }

    // active = the level opposite to the idle level of the clock
    #[inline]
    fn clock(&mut self, active: bool) -> Result<(), PCDError> {
        let high = active != (self.config.mode.polarity == Polarity::IdleHigh);
        if high {
            PCDError::pin(self.clk.set_high())
        } else {
            PCDError::pin(self.clk.set_low())
        }
    }

    #[inline]
    fn data(&mut self, high: bool) -> Result<(), PCDError> {
        if high {
            PCDError::pin(self.din.set_high())
        } else {
            PCDError::pin(self.din.set_low())
        }
    }

    #[inline]
    fn pause(&mut self) {
        self.delay.delay_us(self.half_period_us);
    }

    #[inline]
    fn write_bit(&mut self, high: bool) -> Result<(), PCDError> {
        match self.config.mode.phase {
            // data must be stable before the leading edge
            Phase::CaptureOnFirstTransition => {
                self.data(high)?;
                self.pause();
                self.clock(true)?;
                self.pause();
                self.clock(false)
            }
            // data changes on the leading edge, sampled on the trailing one
            Phase::CaptureOnSecondTransition => {
                self.clock(true)?;
                self.data(high)?;
                self.pause();
                self.clock(false)?;
                self.pause();
                Ok(())
            }
        }
    }
}

impl<CLK, DIN, DELAY> SpiWrite<u8> for BitBangSpi<CLK, DIN, DELAY>
where
    CLK: OutputPin,
    DIN: OutputPin,
    DELAY: DelayUs<u8>,
{
    type Error = PCDError;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for value in words {
            for i in 0..8 {
                let mask = match self.config.bit_order {
                    BitOrder::MsbFirst => 0x80 >> i,
                    BitOrder::LsbFirst => 0x01 << i,
                };
                self.write_bit(value & mask != 0)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, Log};
    use hal::spi::{MODE_1, MODE_3};

    // replays the log like the controller would: latch DIN on every capture edge
    fn sampled_bits(log: &Log, capture_on_rising: bool) -> Vec<bool> {
        let mut din = false;
        let mut clk = None;
        let mut bits = Vec::new();
        for event in log.events() {
            match event {
                Event::Pin("din", level) => din = level,
                Event::Pin("clk", level) => {
                    if clk == Some(!level) && level == capture_on_rising {
                        bits.push(din);
                    }
                    clk = Some(level);
                }
                _ => {}
            }
        }
        bits
    }

    fn bits_of(byte: u8, lsb_first: bool) -> Vec<bool> {
        (0..8)
            .map(|i| if lsb_first { byte >> i & 1 == 1 } else { byte << i & 0x80 != 0 })
            .collect()
    }

    #[test]
    fn lsb_first_mode_1() {
        let log = Log::new();
        let mut spi =
            BitBangSpi::with_config(log.pin("clk"), log.pin("din"), log.delay(), BusConfig::lsb_first())
                .unwrap();
        spi.write(&[0x21, 0xc8]).unwrap();

        // mode 1 with idle low clock samples on the falling edge
        let mut expected = bits_of(0x21, true);
        expected.extend(bits_of(0xc8, true));
        assert_eq!(sampled_bits(&log, false), expected);
        assert_eq!(log.level("clk"), Some(false));
    }

    #[test]
    fn msb_first_mode_1() {
        let log = Log::new();
        let mut spi =
            BitBangSpi::with_config(log.pin("clk"), log.pin("din"), log.delay(), BusConfig::msb_first())
                .unwrap();
        spi.write(&[0x21]).unwrap();
        assert_eq!(sampled_bits(&log, false), bits_of(0x21, false));
    }

    #[test]
    fn plain_constructor_is_msb_first_mode_0() {
        let log = Log::new();
        let mut spi = BitBangSpi::new(log.pin("clk"), log.pin("din")).unwrap();
        assert_eq!(spi.config().bit_order, BitOrder::MsbFirst);
        spi.write(&[0x80 | 42]).unwrap();
        assert_eq!(sampled_bits(&log, true), bits_of(0x80 | 42, false));
    }

    #[test]
    fn idle_high_clock() {
        let log = Log::new();
        let config = BusConfig::msb_first().with_mode(MODE_3);
        let mut spi = BitBangSpi::with_config(log.pin("clk"), log.pin("din"), log.delay(), config).unwrap();
        assert_eq!(log.level("clk"), Some(true));
        spi.write(&[0x0c]).unwrap();
        // mode 3 samples on the rising (trailing) edge
        assert_eq!(sampled_bits(&log, true), bits_of(0x0c, false));
        assert_eq!(log.level("clk"), Some(true));
    }

    #[test]
    fn clock_is_paced_by_the_delay() {
        let log = Log::new();
        let config = BusConfig::msb_first().with_mode(MODE_1);
        let mut spi = BitBangSpi::with_config(log.pin("clk"), log.pin("din"), log.delay(), config).unwrap();
        spi.write(&[0xff]).unwrap();
        let pauses = log
            .events()
            .into_iter()
            .filter(|e| *e == Event::DelayUs(2))
            .count();
        assert_eq!(pauses, 16);
    }

    #[test]
    fn too_fast_is_rejected_before_touching_pins() {
        let log = Log::new();
        let config = BusConfig::lsb_first().with_frequency(8_000_000);
        let result = BitBangSpi::with_config(log.pin("clk"), log.pin("din"), log.delay(), config);
        assert_eq!(result.err(), Some(PCDError::BusConfig { frequency_hz: 8_000_000 }));
        assert!(log.events().is_empty());
    }
}
