use xmega_core::{
    device::Peripherals,
    drv::adc::{AdcConfig, SingleEndedAdc},
    map::{
        adc::{
            CurrentLimit, Gain, InputMode, InternalInput, InterruptMode, NegativeInput,
            PositiveInput, Prescaler, Reference, Resolution,
        },
        IntLevel,
    },
    sim::{self, models::AdcModel},
};

const ADCA: usize = 0x0200;
const CTRLA: usize = ADCA;
const CTRLB: usize = ADCA + 0x01;
const REFCTRL: usize = ADCA + 0x02;
const PRESCALER: usize = ADCA + 0x04;
const INTFLAGS: usize = ADCA + 0x06;
const CH1RES: usize = ADCA + 0x12;
const CMP: usize = ADCA + 0x18;

const fn channel(ch: usize) -> usize {
    ADCA + 0x20 + 8 * ch
}

fn adc() -> SingleEndedAdc<ADCA> {
    sim::reset();
    let p = unsafe { Peripherals::steal() };
    SingleEndedAdc::new(p.adca)
}

#[test]
fn init_writes_ctrlb_and_prescaler() {
    let adc = adc();
    adc.init(AdcConfig {
        resolution: Resolution::LeftBits12,
        prescaler: Prescaler::Div32,
        high_impedance: true,
        current_limit: CurrentLimit::Low,
        signed: true,
    });
    assert_eq!(sim::writes_to(CTRLB), [0b1011_0110]);
    assert_eq!(sim::peek(PRESCALER), 0b011);
    assert_eq!(sim::peek(CTRLA) & 1, 0);
}

#[test]
fn default_config() {
    let adc = adc();
    adc.init(AdcConfig::default());
    assert_eq!(sim::peek(CTRLB), 0);
    assert_eq!(sim::peek(PRESCALER), 0);
    assert_eq!(adc.get_resolution(), Some(Resolution::Bits12));
}

#[test]
fn start_flushes_and_stop_disables() {
    let adc = adc();
    sim::poke(CTRLA, 0b1000_0000);
    adc.start();
    assert_eq!(sim::peek(CTRLA), 0b1000_0011);
    adc.stop();
    assert_eq!(sim::peek(CTRLA) & 1, 0);
    assert_eq!(sim::peek(CTRLA) & 0b1000_0000, 0b1000_0000);
}

#[test]
fn resolution_round_trip_and_reserved() {
    let adc = adc();
    adc.set_resolution(Resolution::Bits8);
    assert_eq!(sim::peek(CTRLB), 0b0000_0100);
    assert_eq!(adc.get_resolution(), Some(Resolution::Bits8));
    sim::poke(CTRLB, 0b0000_0010);
    assert_eq!(adc.get_resolution(), None);
}

#[test]
fn reference_and_compare() {
    let adc = adc();
    sim::poke(REFCTRL, 0b0000_0011);
    adc.set_reference(Reference::IntVcc2);
    assert_eq!(sim::peek(REFCTRL), 0b0100_0011);
    adc.set_compare_value(0x0123);
    assert_eq!(sim::peek_u16(CMP), 0x0123);
}

#[test]
fn channel_setup_registers() {
    let adc = adc();
    adc.setup_channel::<2>(InputMode::Diff, Gain::X4);
    adc.setup_channel_inputs::<1>(PositiveInput::Pin9, NegativeInput::Pin2);
    adc.setup_channel_interrupts::<3>(InterruptMode::Above, IntLevel::Med);
    assert_eq!(sim::peek(channel(2)), 0b0000_1010);
    assert_eq!(sim::peek(channel(1) + 1), 0b0100_1010);
    assert_eq!(sim::peek(channel(3) + 2), 0b0000_1110);
    assert_eq!(sim::peek(channel(0)), 0);
}

#[test]
fn internal_inputs_enable_their_reference() {
    let adc = adc();
    adc.setup_channel_internal::<0>(InternalInput::Temp);
    assert_eq!(sim::peek(channel(0) + 1), 0);
    assert_eq!(sim::peek(REFCTRL), 0b0000_0001);
    adc.setup_channel_internal::<1>(InternalInput::Bandgap);
    assert_eq!(sim::peek(channel(1) + 1), 0b0000_1000);
    assert_eq!(sim::peek(REFCTRL), 0b0000_0011);
    adc.setup_channel_internal::<2>(InternalInput::ScaledVcc);
    assert_eq!(sim::peek(channel(2) + 1), 0b0001_0000);
    assert_eq!(sim::peek(REFCTRL), 0b0000_0011);
}

#[test]
fn start_conversion_selects_pin_and_mode() {
    let adc = adc();
    sim::poke(channel(1) + 1, 0b0000_0101);
    adc.start_conversion::<1>(0x1B);
    assert_eq!(sim::peek(channel(1) + 1), 0b0101_1101);
    assert_eq!(sim::peek(channel(1)), 0b1000_0001);
}

#[test]
fn read_single_ended() {
    let adc = adc();
    sim::attach(AdcModel::new(ADCA, 3).with_input(5, 0x0ABC));
    adc.init(AdcConfig::default());
    adc.start();
    sim::clear_journal();
    assert_eq!(adc.read::<1>(5), 0x0ABC);
    assert_eq!(sim::reads_of(INTFLAGS), 4);
    assert_eq!(sim::writes_to(INTFLAGS), [0b0000_0010]);
    assert_eq!(sim::peek(INTFLAGS), 0);
    assert_eq!(sim::peek_u16(CH1RES), 0x0ABC);
}

#[test]
fn channels_convert_independently() {
    let adc = adc();
    sim::attach(AdcModel::new(ADCA, 1).with_input(3, 111).with_input(7, 222));
    adc.start_conversion::<0>(3);
    adc.start_conversion::<3>(7);
    while !(adc.is_conversion_done::<0>() && adc.is_conversion_done::<3>()) {}
    assert_eq!(adc.get_conversion_result::<0>(), 111);
    assert_eq!(adc.get_conversion_result::<3>(), 222);
    adc.clear_interrupt_flag::<0>();
    assert!(!adc.is_conversion_done::<0>());
    assert!(adc.is_conversion_done::<3>());
}

#[test]
fn clear_flag_is_a_plain_write() {
    let adc = adc();
    sim::poke(INTFLAGS, 0b0000_1111);
    adc.clear_interrupt_flag::<2>();
    assert_eq!(sim::writes_to(INTFLAGS), [0b0000_0100]);
    assert_eq!(sim::reads_of(INTFLAGS), 0);
}

#[test]
fn pin_number_wraps_to_four_bits() {
    let adc = adc();
    sim::attach(AdcModel::new(ADCA, 0).with_input(2, 0x0321));
    assert_eq!(adc.read::<2>(0x12), 0x0321);
}
