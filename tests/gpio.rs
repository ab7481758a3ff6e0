use xmega_core::{
    device::Peripherals,
    gpio::{AnyPin, GpioPin, PinConfig, PinGroup, PinRole},
    map::{
        port::{InputSense, OutputConfig},
        IntLevel,
    },
    sim::{self, models::PortModel},
};

const PORTA: usize = 0x0600;
const PORTD: usize = 0x0660;

const DIR: usize = 0x00;
const DIRSET: usize = 0x01;
const DIRCLR: usize = 0x02;
const OUT: usize = 0x04;
const OUTSET: usize = 0x05;
const OUTCLR: usize = 0x06;
const OUTTGL: usize = 0x07;
const INTCTRL: usize = 0x09;
const INT0MASK: usize = 0x0A;
const INT1MASK: usize = 0x0B;
const PIN0CTRL: usize = 0x10;

fn peripherals() -> Peripherals {
    sim::reset();
    unsafe { Peripherals::steal() }
}

#[test]
fn pin_direction_and_level_use_alias_registers() {
    let p = peripherals();
    let pins = p.porta.split();
    pins.p6.set_output();
    pins.p6.set_high();
    pins.p6.set_low();
    pins.p6.toggle();
    pins.p6.set_input();
    assert_eq!(sim::writes_to(PORTA + DIRSET), [0b0100_0000]);
    assert_eq!(sim::writes_to(PORTA + OUTSET), [0b0100_0000]);
    assert_eq!(sim::writes_to(PORTA + OUTCLR), [0b0100_0000]);
    assert_eq!(sim::writes_to(PORTA + OUTTGL), [0b0100_0000]);
    assert_eq!(sim::writes_to(PORTA + DIRCLR), [0b0100_0000]);
    assert!(sim::writes_to(PORTA + DIR).is_empty());
    assert!(sim::writes_to(PORTA + OUT).is_empty());
}

#[test]
fn pin_levels_through_port_model() {
    let p = peripherals();
    sim::attach(PortModel::new(PORTA).with_levels(0b0000_0010));
    let pins = p.porta.split();
    assert!(pins.p1.get_value());
    assert!(!pins.p0.get_value());

    pins.p0.set_output();
    pins.p0.set_high();
    assert!(pins.p0.get_value());
    assert!(pins.p0.get_output());
    pins.p0.toggle();
    assert!(!pins.p0.get_value());
    pins.p0.set_value(true);
    assert_eq!(sim::peek(PORTA + OUT), 0b0000_0001);
    assert_eq!(sim::peek(PORTA + DIR), 0b0000_0001);
}

#[test]
fn configure_writes_own_pinctrl() {
    let p = peripherals();
    let pins = p.portd.split();
    pins.p5.configure(PinConfig::output(OutputConfig::WiredAnd) | PinConfig::INVERT);
    assert_eq!(sim::writes_to(PORTD + PIN0CTRL + 5), [0b0110_1000]);
    for other in (0..8).filter(|&pin| pin != 5) {
        assert!(sim::writes_to(PORTD + PIN0CTRL + other).is_empty());
    }
}

#[test]
fn config_flags_compose() {
    let config = PinConfig::PULLUP | PinConfig::sense(InputSense::Level);
    assert_eq!(config.bits(), 0b0001_1011);
    assert_eq!(config.output_config(), OutputConfig::PullUp);
    assert_eq!(config.input_sense(), Some(InputSense::Level));
    assert!(!config.is_inverted());
    assert!(!config.is_slew_rate_limited());
    let mut config = PinConfig::TOTEM;
    config |= PinConfig::SLEW_RATE_LIMIT;
    assert_eq!(config, PinConfig::from_bits(0x80));
    assert!(config.is_slew_rate_limited());
}

#[test]
fn config_groups_compare_whole_fields() {
    assert_eq!(PinConfig::PULLUP.output_config(), OutputConfig::PullUp);
    assert_ne!(PinConfig::PULLUP.output_config(), OutputConfig::BusKeeper);
    assert_eq!(PinConfig::BUSKEEPER.output_config(), OutputConfig::BusKeeper);
    assert_eq!(PinConfig::INVERT.output_config(), OutputConfig::Totem);
    assert_eq!(PinConfig::FALLING.input_sense(), Some(InputSense::Falling));
    assert_eq!(PinConfig::RISING.input_sense(), Some(InputSense::Rising));
    assert_eq!(PinConfig::INPUT_DISABLE.input_sense(), Some(InputSense::InputDisable));
    assert_eq!(PinConfig::from_bits(0x05).input_sense(), None);
    assert!((PinConfig::WIRED_AND | PinConfig::INVERT).is_inverted());
}

#[test]
fn presets() {
    let p = peripherals();
    let pins = p.porta.split();
    pins.p0.set_lowpower();
    pins.p1.set_analog();
    assert_eq!(sim::peek(PORTA + PIN0CTRL), PinConfig::PULLUP.bits());
    assert_eq!(sim::peek(PORTA + PIN0CTRL + 1), 0b0000_0111);
}

#[test]
fn roles() {
    let p = peripherals();
    sim::attach(PortModel::new(PORTA));
    let pins = p.porta.split();
    pins.p0.set_role(PinRole::OutputLow);
    pins.p1.set_role(PinRole::OutputHigh);
    pins.p2.set_role(PinRole::InputPullUp);
    pins.p3.set_role(PinRole::InputPullDown);
    pins.p4.set_role(PinRole::InputBusKeeper);
    pins.p5.set_role(PinRole::Analog);
    pins.p6.set_role(PinRole::Unused);
    pins.p7.set_role(PinRole::NoInit);

    assert_eq!(sim::peek(PORTA + DIR), 0b0000_0011);
    assert_eq!(sim::peek(PORTA + OUT), 0b0000_0010);
    assert_eq!(sim::peek(PORTA + PIN0CTRL), PinConfig::TOTEM.bits());
    assert_eq!(sim::peek(PORTA + PIN0CTRL + 2), PinConfig::PULLUP.bits());
    assert_eq!(sim::peek(PORTA + PIN0CTRL + 3), PinConfig::PULLDOWN.bits());
    assert_eq!(sim::peek(PORTA + PIN0CTRL + 4), PinConfig::BUSKEEPER.bits());
    assert_eq!(sim::peek(PORTA + PIN0CTRL + 5), PinConfig::INPUT_DISABLE.bits());
    assert_eq!(sim::peek(PORTA + PIN0CTRL + 6), PinConfig::PULLUP.bits());
    assert!(sim::writes_to(PORTA + PIN0CTRL + 7).is_empty());
}

#[test]
fn interrupt_masks_per_channel() {
    let p = peripherals();
    let pins = p.porta.split();
    pins.p2.enable_interrupt::<0>();
    pins.p3.enable_interrupt::<0>();
    pins.p3.enable_interrupt::<1>();
    assert_eq!(sim::peek(PORTA + INT0MASK), 0b0000_1100);
    assert_eq!(sim::peek(PORTA + INT1MASK), 0b0000_1000);
    pins.p2.disable_interrupt::<0>();
    assert_eq!(sim::peek(PORTA + INT0MASK), 0b0000_1000);
    assert_eq!(sim::peek(PORTA + INT1MASK), 0b0000_1000);
}

#[test]
fn interrupt_levels_share_intctrl() {
    let p = peripherals();
    let pins = p.porta.split();
    pins.p0.set_interrupt_level::<0>(IntLevel::Med);
    pins.p0.set_interrupt_level::<1>(IntLevel::Hi);
    assert_eq!(sim::peek(PORTA + INTCTRL), 0b0000_1110);
    pins.p1.set_interrupt_level::<0>(IntLevel::Off);
    assert_eq!(sim::peek(PORTA + INTCTRL), 0b0000_1100);
}

#[test]
fn degraded_pin_matches_typed_pin() {
    let p = peripherals();
    let pins = p.portd.split();
    let pin: AnyPin = pins.p7.degrade();
    assert_eq!(pin.port(), PORTD);
    assert_eq!(pin.number(), 7);
    assert_eq!(pin.mask(), 0b1000_0000);
    pin.set_output();
    pin.configure(PinConfig::PULLUP);
    assert_eq!(sim::writes_to(PORTD + DIRSET), [0b1000_0000]);
    assert_eq!(sim::writes_to(PORTD + PIN0CTRL + 7), [PinConfig::PULLUP.bits()]);
}

#[test]
fn any_pin_from_parts() {
    sim::reset();
    let pin = unsafe { AnyPin::new(PORTA, 4) };
    pin.set_high();
    assert_eq!(sim::writes_to(PORTA + OUTSET), [0b0001_0000]);
}

#[test]
fn group_mask_and_shift() {
    let p = peripherals();
    let pins = p.portd.split();
    let group = PinGroup::from((pins.p2, pins.p5));
    assert_eq!(group.shift(), 2);
    assert_eq!(group.mask(), 0b0010_0100);
}

#[test]
fn group_write_touches_only_members() {
    let p = peripherals();
    sim::attach(PortModel::new(PORTD));
    let pins = p.portd.split();
    let group = PinGroup::from((pins.p2, pins.p5));

    sim::poke(PORTD + OUT, 0b1100_0011);
    group.write(0b1001);
    assert_eq!(sim::peek(PORTD + OUT), 0b1110_0111);

    group.write(0);
    assert_eq!(sim::peek(PORTD + OUT), 0b1100_0011);

    // Bit 1 of the value lands on pin 3, which is not a member.
    group.write(0b11);
    assert_eq!(sim::peek(PORTD + OUT), 0b1100_0111);
}

#[test]
fn group_read_is_right_aligned() {
    let p = peripherals();
    sim::attach(PortModel::new(PORTD).with_levels(0b1010_1000));
    let pins = p.portd.split();
    let group = PinGroup::from((pins.p3, pins.p4, pins.p5));
    assert_eq!(group.read(), 0b101);
}

#[test]
fn group_direction_in_one_access() {
    let p = peripherals();
    let pins = p.portd.split();
    let group = PinGroup::from((pins.p0, pins.p1, pins.p6));
    group.set_output();
    group.set_high();
    group.toggle();
    group.set_low();
    group.set_input();
    assert_eq!(sim::writes_to(PORTD + DIRSET), [0b0100_0011]);
    assert_eq!(sim::writes_to(PORTD + OUTSET), [0b0100_0011]);
    assert_eq!(sim::writes_to(PORTD + OUTTGL), [0b0100_0011]);
    assert_eq!(sim::writes_to(PORTD + OUTCLR), [0b0100_0011]);
    assert_eq!(sim::writes_to(PORTD + DIRCLR), [0b0100_0011]);
}

#[test]
fn group_configure_each_member() {
    let p = peripherals();
    let pins = p.portd.split();
    let group = PinGroup::from((pins.p1, pins.p4));
    group.configure(PinConfig::PULLDOWN);
    assert_eq!(sim::writes_to(PORTD + PIN0CTRL + 1), [PinConfig::PULLDOWN.bits()]);
    assert_eq!(sim::writes_to(PORTD + PIN0CTRL + 4), [PinConfig::PULLDOWN.bits()]);
    assert!(sim::writes_to(PORTD + PIN0CTRL + 2).is_empty());
    assert!(sim::writes_to(PORTD + PIN0CTRL + 3).is_empty());
}

#[test]
fn group_free_returns_members() {
    let p = peripherals();
    let pins = p.portd.split();
    let group = PinGroup::from((pins.p1, pins.p4, pins.p7));
    group.set_output();
    let (p1, p4, p7) = group.free();
    assert_eq!((p1.number(), p4.number(), p7.number()), (1, 4, 7));
    p4.set_high();
    assert_eq!(sim::writes_to(PORTD + OUTSET), [0b0001_0000]);
}

#[test]
fn embedded_hal_output() {
    use embedded_hal::digital::{OutputPin, StatefulOutputPin};

    let p = peripherals();
    sim::attach(PortModel::new(PORTA));
    let pins = p.porta.split();
    let mut led = pins.p3;
    GpioPin::set_output(&led);
    OutputPin::set_high(&mut led).unwrap();
    assert!(led.is_set_high().unwrap());
    StatefulOutputPin::toggle(&mut led).unwrap();
    assert!(led.is_set_low().unwrap());
}

#[test]
fn embedded_hal_on_both_pin_kinds() {
    use embedded_hal::digital::{InputPin, OutputPin};

    let p = peripherals();
    sim::attach(PortModel::new(PORTA).with_levels(0b0000_0010));
    let pins = p.porta.split();
    let mut typed = pins.p1;
    assert!(InputPin::is_high(&mut typed).unwrap());
    let mut any = pins.p4.degrade();
    any.set_output();
    OutputPin::set_high(&mut any).unwrap();
    assert_eq!(sim::peek(PORTA + 0x04), 0b0001_0000);
    assert!(InputPin::is_high(&mut any).unwrap());
}
