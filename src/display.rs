//! # Main driver for the PCD8544
//!
//! [`PCD8544`] owns the SPI bus, the control lines and a delay. Construction resets the
//! controller, writes the configuration and clears the DDRAM, so the display is usable as soon
//! as `new()` returns.
//!
//! Two kinds of boards are supported by the same type:
//!  - [`PCD8544::new`] for modules powered straight from the supply
//!  - [`PCD8544::new_with_power`] for boards that switch the display VCC with a GPIO, which
//!    makes [`PCD8544::turn_on`] and [`PCD8544::turn_off`] cut the power as well.
//!
//! Pixel data goes out with [`PCD8544::write`] (at the current address) or
//! [`PCD8544::write_at`] (sets the address first). Every byte is a column of 8 pixels, LSB on
//! top. The controller advances the address horizontally after each byte, and the driver follows
//! it, so a write never runs past the end of the DDRAM.
//!
//! Lines at rest: CE high (deselected), DC high (data). Only [`PCD8544::command`] pulls DC low,
//! for exactly one byte.
use hal::blocking::delay::{DelayMs, DelayUs};
use hal::blocking::spi::Write as SpiWrite;
use hal::digital::v2::OutputPin;
use log::{debug, trace};

use crate::{
    config::Config,
    dummy::DummyOutputPin,
    error::PCDError,
    instructions::prelude::*,
    DDRAM_BANKS, DDRAM_SIZE, WIDTH,
};

/// Width of the reset pulse. The data sheet wants more than 100ns, and the pulse has to end
/// within 100ms of VDD going high.
pub const RESET_PULSE_US: u16 = 100;

/// Wait between blanking the display and cutting its power
pub const POWER_DOWN_SETTLE_MS: u8 = 10;

#[derive(Debug)]
/// state keeping of the PCD8544 driver, owning the bus, lines and delay
pub struct PCD8544<SPI, DC, CE, RST, LIGHT, PWR, DELAY> {
    spi: SPI,
    dc: DC,
    ce: CE,
    rst: RST,
    light: LIGHT,
    pwr: Option<PWR>,
    delay: DELAY,
    config: Config,
    // DDRAM offset the next data byte lands on, y * 84 + x
    cursor: usize,
    // H bit of the last function set
    extended: bool,
}

impl<SPI, DC, CE, RST, LIGHT, DELAY> PCD8544<SPI, DC, CE, RST, LIGHT, DummyOutputPin, DELAY>
where
    SPI: SpiWrite<u8>,
    DC: OutputPin,
    CE: OutputPin,
    RST: OutputPin,
    LIGHT: OutputPin,
    DELAY: DelayUs<u16> + DelayMs<u8>,
{
    /// Create and initialize a driver for a display without a power line
    ///
    /// Arguments:
    ///
    /// - spi: SPI bus implementing Write<u8>, set up as described by [`crate::BusConfig`]
    /// - dc: Data/Command, the DC line of the display
    /// - ce: Chip Enable, the CE line of the display
    /// - rst: Reset, the RST line of the display
    /// - light: backlight line (active low), or a [`DummyOutputPin`]
    /// - delay: blocking delay for the reset pulse and power down
    /// - config: register values for the initialization
    pub fn new(
        spi: SPI,
        dc: DC,
        ce: CE,
        rst: RST,
        light: LIGHT,
        delay: DELAY,
        config: Config,
    ) -> Result<Self, PCDError> {
        PCD8544::build(spi, dc, ce, rst, light, None, delay, config)
    }
}

impl<SPI, DC, CE, RST, LIGHT, PWR, DELAY> PCD8544<SPI, DC, CE, RST, LIGHT, PWR, DELAY>
where
    SPI: SpiWrite<u8>,
    DC: OutputPin,
    CE: OutputPin,
    RST: OutputPin,
    LIGHT: OutputPin,
    PWR: OutputPin,
    DELAY: DelayUs<u16> + DelayMs<u8>,
{
    /// Create and initialize a driver for a display powered through the `pwr` line (active high)
    ///
    /// See [`PCD8544::new`] for the other arguments.
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_power(
        spi: SPI,
        dc: DC,
        ce: CE,
        rst: RST,
        light: LIGHT,
        pwr: PWR,
        delay: DELAY,
        config: Config,
    ) -> Result<Self, PCDError> {
        PCD8544::build(spi, dc, ce, rst, light, Some(pwr), delay, config)
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        spi: SPI,
        dc: DC,
        ce: CE,
        rst: RST,
        light: LIGHT,
        pwr: Option<PWR>,
        delay: DELAY,
        config: Config,
    ) -> Result<Self, PCDError> {
        // a bad config must not leave a half initialized controller behind
        config.validate()?;

        let mut pcd = PCD8544 {
            spi,
            dc,
            ce,
            rst,
            light,
            pwr,
            delay,
            config,
            cursor: 0,
            extended: false,
        };

        PCDError::pin(pcd.ce.set_high())?;
        PCDError::pin(pcd.dc.set_high())?;
        pcd.light_off()?;
        pcd.init()?;
        Ok(pcd)
    }

    /// Power up, reset and configure the controller, then clear the DDRAM.
    ///
    /// `new()` already did this. Call it again after [`PCD8544::turn_off`] to bring the display
    /// back.
    pub fn init(&mut self) -> Result<(), PCDError> {
        let sequence = self.config.init_sequence()?;
        debug!("pcd8544: init, power control: {}", self.has_power_control());

        self.turn_on()?;
        for opcode in sequence.iter() {
            self.command(&[*opcode])?;
        }
        self.clear()
    }

    /// Hardware reset with the RST line.
    ///
    /// The controller comes up in an undefined state, the reset is mandatory after power on.
    /// It also throws away all register values, so it stays private to `turn_on()`.
    fn reset(&mut self) -> Result<(), PCDError> {
        debug!("pcd8544: reset pulse");
        PCDError::pin(self.rst.set_low())?;
        self.delay.delay_us(RESET_PULSE_US);
        PCDError::pin(self.rst.set_high())?;

        self.cursor = 0;
        self.extended = false;
        Ok(())
    }

    /// Switch the power line on (if there is one) and reset the controller
    ///
    /// The controller needs its configuration afterwards, see [`PCD8544::init`].
    pub fn turn_on(&mut self) -> Result<(), PCDError> {
        if let Some(pwr) = self.pwr.as_mut() {
            debug!("pcd8544: power on");
            PCDError::pin(pwr.set_high())?;
        }
        self.reset()
    }

    /// Blank the display and switch the power line off (if there is one)
    ///
    /// The DDRAM has to be cleared before the supply goes away, or the glass keeps a ghost of
    /// the last image.
    pub fn turn_off(&mut self) -> Result<(), PCDError> {
        debug!("pcd8544: power off");
        self.clear()?;
        self.write_command(SetDisplayMode(DisplayBlank))?;
        self.delay.delay_ms(POWER_DOWN_SETTLE_MS);
        if let Some(pwr) = self.pwr.as_mut() {
            PCDError::pin(pwr.set_low())?;
        }
        Ok(())
    }

    /// clears the screen by zeroing the DDRAM
    ///
    /// Moves the address to (0, 0) first and always writes the full 504 bytes, no matter which
    /// window was set before. The address ends up back at (0, 0).
    pub fn clear(&mut self) -> Result<(), PCDError> {
        self.set_xy(0, 0)?;
        self.write(&[0x00; DDRAM_SIZE])
    }

    /// Send one raw command byte
    ///
    /// DC is low for exactly this byte and back high (data) afterwards. Anything but a single
    /// byte is rejected before a line is touched. Address commands move the write position the
    /// driver keeps, just like [`PCD8544::set_xy`].
    pub fn command(&mut self, command: &[u8]) -> Result<(), PCDError> {
        if command.len() != 1 {
            return Err(PCDError::CommandLength(command.len()));
        }
        PCDError::pin(self.dc.set_low())?;
        let sent = self.send(false, command);
        PCDError::pin(self.dc.set_high())?;
        sent?;
        self.track(command[0]);
        Ok(())
    }

    /// Send a single instruction, preceded by the function set selecting its instruction set.
    ///
    /// Extended instructions are followed by a switch back to the basic set, so the controller
    /// is always left in basic mode.
    pub fn write_command(&mut self, instruction: Instruction) -> Result<(), PCDError> {
        let opcode = instruction.encode()?;
        if instruction.extended() {
            let enter = self.function_set(true)?;
            let leave = self.function_set(false)?;
            self.command(&[enter])?;
            self.command(&[opcode])?;
            self.command(&[leave])
        } else {
            let basic = self.function_set(false)?;
            self.command(&[basic])?;
            self.command(&[opcode])
        }
    }

    /// Send pixel data at the current DDRAM address
    ///
    /// DC is left alone, after `command()` it is high (data). The data may fill the DDRAM from
    /// the current address up to its end, so at most 504 bytes right after `set_xy(0, 0)`.
    pub fn write(&mut self, data: &[u8]) -> Result<(), PCDError> {
        let max = DDRAM_SIZE - self.cursor;
        if data.len() > max {
            return Err(PCDError::BufferTooLarge {
                len: data.len(),
                max,
            });
        }
        self.send(true, data)?;
        // the controller wraps to (0, 0) after the last byte
        self.cursor = (self.cursor + data.len()) % DDRAM_SIZE;
        Ok(())
    }

    /// Set the address to (x, y) and send pixel data from there on
    ///
    /// The data may fill the DDRAM up to its end but not wrap around to (0, 0).
    pub fn write_at(&mut self, x: u8, y: u8, data: &[u8]) -> Result<(), PCDError> {
        let max = self.remaining_from(x, y)?;
        if data.len() > max {
            return Err(PCDError::BufferTooLarge {
                len: data.len(),
                max,
            });
        }
        self.set_xy(x, y)?;
        self.write(data)
    }

    /// Set the DDRAM address: column x in 0..=83, bank y in 0..=5
    ///
    /// Sends the basic function set, then the X and Y address. Out of range values are rejected
    /// before anything is sent.
    pub fn set_xy(&mut self, x: u8, y: u8) -> Result<(), PCDError> {
        let x_address = Xaddress(x).encode()?;
        let y_address = Yaddress(y).encode()?;
        let basic = self.function_set(false)?;

        self.command(&[basic])?;
        self.command(&[x_address])?;
        self.command(&[y_address])
    }

    /// Backlight on, the line is active low
    pub fn light_on(&mut self) -> Result<(), PCDError> {
        PCDError::pin(self.light.set_low())
    }

    /// Backlight off
    pub fn light_off(&mut self) -> Result<(), PCDError> {
        PCDError::pin(self.light.set_high())
    }

    /// Set the Vop and therefore the contrast, 0..=127
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), PCDError> {
        self.write_command(SetVop(contrast))?;
        self.config.contrast = contrast;
        Ok(())
    }

    /// Normal, inverse, all pixels on or blank
    pub fn set_display_mode(&mut self, mode: DisplayMode) -> Result<(), PCDError> {
        self.write_command(SetDisplayMode(mode))?;
        self.config.display_mode = mode;
        Ok(())
    }

    pub fn set_temperature_coefficient(
        &mut self,
        coefficient: TemperatureCoefficient,
    ) -> Result<(), PCDError> {
        self.write_command(SetTempCoefficient(coefficient))?;
        self.config.temperature_coefficient = coefficient;
        Ok(())
    }

    pub fn set_bias_mode(&mut self, bias: MuxRate) -> Result<(), PCDError> {
        self.write_command(SetBiasMode(bias))?;
        self.config.bias = bias;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// (x, y) the next data byte is written to
    pub fn position(&self) -> (u8, u8) {
        (
            (self.cursor % WIDTH as usize) as u8,
            (self.cursor / WIDTH as usize) as u8,
        )
    }

    /// true if the driver owns a power line
    pub fn has_power_control(&self) -> bool {
        self.pwr.is_some()
    }

    /// Give back the bus, lines and delay. Call [`PCD8544::turn_off`] first.
    #[allow(clippy::type_complexity)]
    pub fn release(self) -> (SPI, DC, CE, RST, LIGHT, Option<PWR>, DELAY) {
        (
            self.spi, self.dc, self.ce, self.rst, self.light, self.pwr, self.delay,
        )
    }

    // active, horizontal addressing; only H changes
    fn function_set(&self, extended: bool) -> Result<u8, PCDError> {
        FunctionSet {
            pd: false,
            v: false,
            h: extended,
        }
        .encode()
    }

    // bytes between (x, y) and the end of the DDRAM
    fn remaining_from(&self, x: u8, y: u8) -> Result<usize, PCDError> {
        Xaddress(x).encode()?;
        Yaddress(y).encode()?;
        Ok(DDRAM_SIZE - (y as usize * WIDTH as usize + x as usize))
    }

    // follow the address the controller moves to for a command byte
    fn track(&mut self, opcode: u8) {
        let width = WIDTH as usize;
        if opcode & 0xf8 == 0x20 {
            self.extended = opcode & 0x01 != 0;
            return;
        }
        // the extended set has no address commands
        if self.extended {
            return;
        }
        if opcode & 0x80 != 0 {
            let x = (opcode & 0x7f) as usize;
            if x < width {
                self.cursor = self.cursor / width * width + x;
            }
        } else if opcode & 0xf8 == 0x40 {
            let y = opcode & 0x07;
            if y < DDRAM_BANKS {
                self.cursor = y as usize * width + self.cursor % width;
            }
        }
    }

    // Chip Enable low makes the PCD8544 listen, high ends the frame.
    fn send(&mut self, data: bool, bytes: &[u8]) -> Result<(), PCDError> {
        trace!(
            "pcd8544: {} {} byte(s)",
            if data { "data" } else { "command" },
            bytes.len()
        );
        PCDError::pin(self.ce.set_low())?;
        let sent = PCDError::spi(self.spi.write(bytes));
        PCDError::pin(self.ce.set_high())?;
        sent
    }
}
