use core::mem::size_of;
use xmega_core::{
    device::{AdcA, Peripherals, PortC, SpiC, TwiC, UsartC0, UsartD1},
    map::{adc::Adc, port::Port, spi::Spi, twi::Twi, usart::Usart},
};

#[test]
fn take_once() {
    let p = Peripherals::take();
    assert!(p.is_some());
    assert!(Peripherals::take().is_none());
    assert!(Peripherals::take().is_none());
}

#[test]
fn tokens_are_zero_sized() {
    assert_eq!(size_of::<Peripherals>(), 0);
    assert_eq!(size_of::<UsartC0>(), 0);
    assert_eq!(size_of::<Port<0x0600>>(), 0);
}

#[test]
fn base_addresses() {
    assert_eq!(AdcA::ADDRESS, 0x0200);
    assert_eq!(TwiC::ADDRESS, 0x0480);
    assert_eq!(PortC::ADDRESS, 0x0640);
    assert_eq!(UsartC0::ADDRESS, 0x08A0);
    assert_eq!(UsartD1::ADDRESS, 0x09B0);
    assert_eq!(SpiC::ADDRESS, 0x08C0);
    assert_eq!(Adc::<0x0240>::ADDRESS, 0x0240);
    assert_eq!(Twi::<0x04A0>::ADDRESS, 0x04A0);
    assert_eq!(Spi::<0x09C0>::ADDRESS, 0x09C0);
    assert_eq!(Usart::<0x0AA0>::ADDRESS, 0x0AA0);
}

#[test]
fn register_addresses() {
    let p = unsafe { Peripherals::steal() };
    assert_eq!(p.usartc0.baudctrlb().address(), 0x08A7);
    assert_eq!(p.spic.data().address(), 0x08C3);
    assert_eq!(p.twic.mstatus().address(), 0x0484);
    assert_eq!(p.porta.pinctrl(5).address(), 0x0615);
    assert_eq!(p.porta.pinctrl(13).address(), 0x0615);
    assert_eq!(p.porta.intmask::<1>().address(), 0x060B);
    assert_eq!(p.adca.ch::<2>().muxctrl().address(), 0x0231);
    assert_eq!(p.adca.chres::<3>().address(), 0x0216);
    assert_eq!(p.clk.usbctrl().address(), 0x0044);
    assert_eq!(p.osc.pllctrl().address(), 0x0055);
}
