//! Blinks a frame on a PCD8544 driven Nokia 5110 screen, powered from a GPIO
//! This example is for the Raspberry Pico with the rp2040 chip
//!
//! Pin layout and connection for this example
//!
//! display | Pico pin |  Pico function       | purpose
//!  1 RST     pin 9      GP6 (gpio6)           reset: active low to reset display
//!  2 CE      pin 10     GP7 (gpio7)           Chip Enable: active low allows data
//!  3 DC      pin 11     GP8 (gpio8)           Data/Command (1 = Data, 0 = Command)
//!  4 DIN     pin 5      GP3 (gpio3)           Serial data line
//!  5 CLK     pin 4      GP2 (gpio2)           Serial clock, at most 4 MHz
//!  6 VCC     pin 7      GP5 (gpio5)           Power to the display, switched by the Pico
//!  7 LIGHT   pin 27     GP21 (gpio21)         backlight, active low on this board
//!  8 GND     pin 38     GND                   Ground
//!
//! The rp2040 SPI only shifts MSB first, so this board is wired for BusConfig::msb_first().

#![deny(unsafe_code)]
#![deny(warnings)]
#![no_std]
#![no_main]

use panic_halt as _;
use cortex_m_rt::entry;
use embedded_time::rate::*;
use rp_pico as bsp;
use bsp::hal::{
    prelude::*,
    pac,
    sio::Sio,
    watchdog::Watchdog,
};

use nokia5110::{BusConfig, Config, PCD8544};

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
    let mut watchdog = Watchdog::new(pac.WATCHDOG);

    let clocks = bsp::hal::clocks::init_clocks_and_plls(
        bsp::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = Sio::new(pac.SIO);
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    // The spi driver picks up this pins automatically if they are in the correct mode
    let _spi_sclk = pins.gpio2.into_mode::<bsp::hal::gpio::FunctionSpi>();
    let _spi_mosi = pins.gpio3.into_mode::<bsp::hal::gpio::FunctionSpi>();
    let spi = bsp::hal::Spi::<_, _, 8>::new(pac.SPI0);

    let bus = BusConfig::msb_first();
    bus.validate().unwrap();
    let pcd_spi = spi.init(
        &mut pac.RESETS,
        clocks.peripheral_clock.freq(),
        bus.frequency_hz().Hz(),
        &bus.mode(),
    );

    let pcd_rst = pins.gpio6.into_push_pull_output();
    let pcd_ce = pins.gpio7.into_push_pull_output();
    let pcd_dc = pins.gpio8.into_push_pull_output();
    let pcd_pwr = pins.gpio5.into_push_pull_output();
    let pcd_light = pins.gpio21.into_push_pull_output();

    let delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().integer());

    let mut pcd = PCD8544::new_with_power(
        pcd_spi,
        pcd_dc,
        pcd_ce,
        pcd_rst,
        pcd_light,
        pcd_pwr,
        delay,
        Config::default(),
    )
    .unwrap();

    // a frame around the whole screen: top and bottom rows, then both sides
    let mut top = [0x01u8; 84];
    let mut bottom = [0x80u8; 84];
    for row in [&mut top, &mut bottom].iter_mut() {
        row[0] = 0xff;
        row[83] = 0xff;
    }

    loop {
        pcd.light_on().unwrap();
        pcd.write_at(0, 0, &top).unwrap();
        for bank in 1..5 {
            pcd.write_at(0, bank, &[0xff]).unwrap();
            pcd.write_at(83, bank, &[0xff]).unwrap();
        }
        pcd.write_at(0, 5, &bottom).unwrap();
        cortex_m::asm::delay(125_000_000);

        pcd.light_off().unwrap();
        pcd.turn_off().unwrap();
        cortex_m::asm::delay(125_000_000);
        pcd.init().unwrap();
    }
}
