use nokia5110::{
    bitbang::BitBangSpi,
    dummy::{DummyOutputPin, NoDelay},
    BusConfig, Config, PCD8544,
};

fn main() {
    let pcd_light = DummyOutputPin;
    let pcd_clk = DummyOutputPin;
    let pcd_din = DummyOutputPin;
    let pcd_dc = DummyOutputPin;
    let pcd_ce = DummyOutputPin;
    let pcd_rst = DummyOutputPin;
    let pcd_pwr = DummyOutputPin;

    let spi = BitBangSpi::with_config(pcd_clk, pcd_din, NoDelay, BusConfig::lsb_first())
        .expect("bus config is within limits");
    let mut display = PCD8544::new_with_power(
        spi,
        pcd_dc,
        pcd_ce,
        pcd_rst,
        pcd_light,
        pcd_pwr,
        NoDelay,
        Config::default(),
    )
    .expect("dummy pins cannot fail");

    display.light_on().expect("dummy pins cannot fail");

    // a 4x4 box in the upper left corner, and a line along the bottom
    display.write_at(0, 0, &[0x0f, 0x09, 0x09, 0x0f]).unwrap();
    display.write_at(0, 5, &[0x80; 84]).unwrap();

    display.turn_off().unwrap();
    let _parts = display.release();
}
