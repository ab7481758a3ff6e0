use xmega_core::{
    device::Peripherals,
    drv::led::Led,
    gpio::{GpioPin, PinConfig},
    sim::{self, models::PortModel},
};

const PORTC: usize = 0x0640;
const DIRSET: usize = PORTC + 0x01;
const OUT: usize = PORTC + 0x04;
const OUTSET: usize = PORTC + 0x05;
const OUTCLR: usize = PORTC + 0x06;
const PIN0CTRL: usize = PORTC + 0x10;

fn peripherals() -> Peripherals {
    sim::reset();
    unsafe { Peripherals::steal() }
}

#[test]
fn plain_led_starts_off() {
    let p = peripherals();
    let pins = p.portc.split();
    let led = Led::new(pins.p1);
    assert!(!led.is_inverted());
    led.init();
    assert_eq!(sim::writes_to(DIRSET), [0b0000_0010]);
    assert_eq!(sim::writes_to(PIN0CTRL + 1), [PinConfig::TOTEM.bits()]);
    assert_eq!(sim::writes_to(OUTCLR), [0b0000_0010]);
}

#[test]
fn inverted_led_uses_port_inversion() {
    let p = peripherals();
    let pins = p.portc.split();
    let led = Led::inverted(pins.p0);
    assert!(led.is_inverted());
    led.init();
    assert_eq!(sim::writes_to(DIRSET), [0b0000_0001]);
    assert_eq!(sim::writes_to(PIN0CTRL), [0b0100_0000]);
    led.on();
    led.off();
    assert_eq!(sim::writes_to(OUTSET), [0b0000_0001]);
    assert_eq!(sim::writes_to(OUTCLR), [0b0000_0001]);
}

#[test]
fn toggle_and_set() {
    let p = peripherals();
    sim::attach(PortModel::new(PORTC));
    let pins = p.portc.split();
    let led = Led::new(pins.p4);
    led.init();
    led.on();
    assert_eq!(sim::peek(OUT), 0b0001_0000);
    led.toggle();
    assert_eq!(sim::peek(OUT), 0);
    led.set(true);
    assert_eq!(sim::peek(OUT), 0b0001_0000);
    led.set(false);
    assert_eq!(sim::peek(OUT), 0);
}

#[test]
fn free_returns_pin() {
    let p = peripherals();
    let pins = p.portc.split();
    let led = Led::new(pins.p7.degrade());
    let pin = led.free();
    assert_eq!(pin.number(), 7);
}
