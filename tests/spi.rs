use xmega_core::{
    device::Peripherals,
    drv::spi::{calculate_clock, SpiConfig, SpiError, SpiMaster, SpiStatus},
    map::{
        spi::{Mode, Prescaler},
        IntLevel,
    },
    sim::{self, models::SpiTarget},
};

const SPIC: usize = 0x08C0;
const CTRL: usize = SPIC;
const INTCTRL: usize = SPIC + 0x01;
const DATA: usize = SPIC + 0x03;

const PORTC: usize = 0x0640;

fn peripherals() -> Peripherals {
    sim::reset();
    unsafe { Peripherals::steal() }
}

macro_rules! master {
    ($p:ident) => {{
        let pins = $p.portc.split();
        SpiMaster::new($p.spic, pins.p6, pins.p5, pins.p7, pins.p4)
    }};
}

#[test]
fn clock_2mhz_below_1mhz() {
    let clock = calculate_clock(2_000_000, 1_000_000);
    assert_eq!(clock.prescaler, Prescaler::Div4);
    assert!(!clock.double_speed);
    assert_eq!(clock.divisor(), 4);
    assert_eq!(clock.bits(), 0b0000_0000);
}

#[test]
fn clock_selection_is_minimal() {
    const DIVISORS: [u32; 7] = [2, 4, 8, 16, 32, 64, 128];
    let cpu = 32_000_000;
    for max in (100_000..=20_000_000).step_by(99_991) {
        let clock = calculate_clock(cpu, max);
        let chosen = clock.divisor();
        let expected = DIVISORS.iter().copied().find(|d| cpu / d < max).unwrap_or(128);
        assert_eq!(chosen, expected, "max {max}");
        for &smaller in DIVISORS.iter().filter(|&&d| d < chosen) {
            assert!(cpu / smaller >= max, "divisor {smaller} also fits {max}");
        }
    }
}

#[test]
fn clock_falls_back_to_largest_divisor() {
    let clock = calculate_clock(32_000_000, 1000);
    assert_eq!(clock.prescaler, Prescaler::Div128);
    assert!(!clock.double_speed);
    assert_eq!(calculate_clock(32_000_000, 20_000_000).bits(), 0b1000_0000);
}

#[test]
fn init_assigns_pin_roles() {
    let p = peripherals();
    let spi = master!(p);
    spi.init();
    assert_eq!(sim::writes_to(PORTC + 0x02), [0b0100_0000]);
    assert_eq!(sim::writes_to(PORTC + 0x01), [0b0010_0000, 0b1000_0000, 0b0001_0000]);
    assert_eq!(sim::writes_to(PORTC + 0x05), [0b0001_0000]);
}

#[test]
fn start_writes_control_once() {
    let p = peripherals();
    let spi = master!(p);
    sim::poke(CTRL, 0xFF);
    spi.start::<2_000_000, 1_000_000>(SpiConfig { mode: Mode::Mode3, lsb_first: true });
    assert_eq!(sim::writes_to(CTRL), [0b0111_1100]);
    spi.stop();
    assert_eq!(sim::peek(CTRL), 0);
}

#[test]
fn start_with_double_speed() {
    let p = peripherals();
    let spi = master!(p);
    spi.start::<32_000_000, 20_000_000>(SpiConfig::default());
    assert_eq!(sim::peek(CTRL), 0b1101_0000);
}

#[test]
fn interrupt_level_returns_previous() {
    let p = peripherals();
    let spi = master!(p);
    assert_eq!(spi.enable_interrupt(IntLevel::Med), IntLevel::Off);
    assert_eq!(sim::peek(INTCTRL), 0b10);
    assert_eq!(spi.enable_interrupt(IntLevel::Lo), IntLevel::Med);
}

#[test]
fn loopback_transfer() {
    let p = peripherals();
    sim::attach(SpiTarget::loopback(SPIC, 2));
    let spi = master!(p);
    spi.start::<2_000_000, 1_000_000>(SpiConfig::default());
    assert_eq!(spi.transfer(0x5A), 0x5A);
    let mut buf = [1, 2, 3, 0xFF];
    assert_eq!(spi.transfer_in_place(&mut buf), Ok(4));
    assert_eq!(buf, [1, 2, 3, 0xFF]);
    assert_eq!(sim::writes_to(DATA), [0x5A, 1, 2, 3, 0xFF]);
}

#[test]
fn responder_answers_every_byte() {
    let p = peripherals();
    sim::attach(SpiTarget::new(SPIC, 1, |byte| !byte));
    let spi = master!(p);
    let mut buf = [0x0F, 0xAA];
    spi.transfer_in_place(&mut buf).unwrap();
    assert_eq!(buf, [0xF0, 0x55]);
    assert_eq!(spi.write(&[1, 2, 3]), Ok(3));
    let mut buf = [0; 3];
    assert_eq!(spi.read(&mut buf), Ok(3));
    assert_eq!(buf, [0xFF; 3]);
}

#[test]
fn transfer_clears_flags() {
    let p = peripherals();
    sim::attach(SpiTarget::loopback(SPIC, 0));
    let spi = master!(p);
    spi.transfer(7);
    assert_eq!(spi.get_status(), SpiStatus { interrupt_flag: false, write_collision: false });
}

#[test]
fn collision_is_reported_by_status_only() {
    let p = peripherals();
    sim::attach(SpiTarget::loopback(SPIC, 3));
    let spi = master!(p);
    spi.write_data(0x11);
    spi.write_data(0x22);
    let status = spi.get_status();
    assert!(status.write_collision);
    assert!(!status.interrupt_flag);
    while !spi.get_status().interrupt_flag {}
    assert_eq!(spi.read_data(), 0x11);
    assert_eq!(spi.get_status(), SpiStatus { interrupt_flag: false, write_collision: false });
}

#[test]
fn slave_select() {
    let p = peripherals();
    let spi = master!(p);
    spi.select();
    spi.deselect();
    assert_eq!(sim::writes_to(PORTC + 0x06), [0b0001_0000]);
    assert_eq!(sim::writes_to(PORTC + 0x05), [0b0001_0000]);
}

#[test]
fn spi_bus_pads_and_truncates() {
    use embedded_hal::spi::SpiBus;

    let p = peripherals();
    sim::attach(SpiTarget::new(SPIC, 0, |byte| byte.wrapping_add(1)));
    let mut spi = master!(p);
    let mut read = [0; 4];
    SpiBus::transfer(&mut spi, &mut read, &[10, 20]).unwrap();
    assert_eq!(read, [11, 21, 1, 1]);
    let mut read = [0; 1];
    SpiBus::transfer(&mut spi, &mut read, &[5, 6, 7]).unwrap();
    assert_eq!(read, [6]);
    assert_eq!(sim::writes_to(DATA), [10, 20, 0, 0, 5, 6, 7]);
    SpiBus::flush(&mut spi).unwrap();
}

#[test]
fn error_display() {
    assert_eq!(SpiError::Collision.to_string(), "SPI write collision");
    assert_eq!(SpiError::Timeout.to_string(), "SPI transfer timed out");
}
