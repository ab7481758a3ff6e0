//! Clock system.
//!
//! CTRL, PSCTRL and LOCK are protected by the configuration change protection
//! mechanism; see [`cpu`](super::cpu).

use super::osc::Oscillator;
use crate::{token::Token, FieldValue};

periph! {
    /// CLK register block.
    pub struct Clk<const BASE: usize> @ BASE;

    /// System clock selection. Protected.
    ctrl: Ctrl(u8) @ 0x00 {
        /// System clock source.
        sclksel: bits(0..=2) => SystemSource;
    }

    /// Prescalers. Protected.
    psctrl: PsCtrl(u8) @ 0x01 {
        /// Prescaler A division.
        psadiv: bits(2..=6) => PrescalerA;
        /// Prescaler B and C division.
        psbcdiv: bits(0..=1) => PrescalerBC;
    }

    /// Lock of CTRL and PSCTRL until the next reset. Protected.
    lock: Lock(u8) @ 0x02 {
        /// Lock.
        lock: bit(0);
    }

    /// RTC clock.
    rtcctrl: RtcCtrl(u8) @ 0x03 {
        /// RTC clock source.
        rtcsrc: bits(1..=3) => RtcSource;
        /// RTC clock enable.
        rtcen: bit(0);
    }

    /// USB clock.
    usbctrl: UsbCtrl(u8) @ 0x04 {
        /// USB prescaler division.
        usbpsdiv: bits(3..=5) => UsbPrescaler;
        /// USB clock source.
        usbsrc: bits(1..=2) => UsbSource;
        /// USB clock enable.
        usbsen: bit(0);
    }
}

unsafe impl<const BASE: usize> Token for Clk<BASE> {
    #[inline(always)]
    unsafe fn take() -> Self {
        unsafe { Self::steal() }
    }
}

/// System clock source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SystemSource {
    /// Internal 2 MHz RC oscillator, selected after reset.
    #[default]
    Rc2M = 0,
    /// Internal 32 MHz RC oscillator.
    Rc32M = 1,
    /// Internal 32.768 kHz RC oscillator.
    Rc32K = 2,
    /// External crystal oscillator or clock.
    Xosc = 3,
    /// Phase locked loop.
    Pll = 4,
}

impl SystemSource {
    /// Returns the oscillator that has to be ready before the source can be
    /// selected.
    pub const fn oscillator(self) -> Oscillator {
        match self {
            Self::Rc2M => Oscillator::Rc2M,
            Self::Rc32M => Oscillator::Rc32M,
            Self::Rc32K => Oscillator::Rc32K,
            Self::Xosc => Oscillator::Xosc,
            Self::Pll => Oscillator::Pll,
        }
    }
}

/// Prescaler A division factor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PrescalerA {
    /// Divide by 1.
    #[default]
    Div1 = 0x00,
    /// Divide by 2.
    Div2 = 0x01,
    /// Divide by 4.
    Div4 = 0x03,
    /// Divide by 8.
    Div8 = 0x05,
    /// Divide by 16.
    Div16 = 0x07,
    /// Divide by 32.
    Div32 = 0x09,
    /// Divide by 64.
    Div64 = 0x0B,
    /// Divide by 128.
    Div128 = 0x0D,
    /// Divide by 256.
    Div256 = 0x0F,
    /// Divide by 512.
    Div512 = 0x11,
}

impl PrescalerA {
    /// Returns the division factor.
    pub const fn divisor(self) -> u32 {
        1 << ((self as u8 + 1) / 2)
    }
}

/// Prescaler B and C division factors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PrescalerBC {
    /// B by 1, C by 1.
    #[default]
    Div1x1 = 0,
    /// B by 1, C by 2.
    Div1x2 = 1,
    /// B by 4, C by 1.
    Div4x1 = 2,
    /// B by 2, C by 2.
    Div2x2 = 3,
}

/// RTC clock source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RtcSource {
    /// 1.024 kHz from the internal 32 kHz ULP oscillator.
    Ulp = 0,
    /// 1.024 kHz from the 32.768 kHz crystal oscillator on TOSC.
    Tosc = 1,
    /// 1.024 kHz from the internal 32.768 kHz RC oscillator.
    Rcosc = 2,
    /// 32.768 kHz from the 32.768 kHz crystal oscillator on TOSC.
    Tosc32 = 5,
    /// 32.768 kHz from the internal 32.768 kHz RC oscillator.
    Rcosc32 = 6,
    /// External clock on TOSC1.
    ExtClk = 7,
}

/// USB clock prescaler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum UsbPrescaler {
    /// Divide by 1.
    #[default]
    Div1 = 0,
    /// Divide by 2.
    Div2 = 1,
    /// Divide by 4.
    Div4 = 2,
    /// Divide by 8.
    Div8 = 3,
    /// Divide by 16.
    Div16 = 4,
    /// Divide by 32.
    Div32 = 5,
}

/// USB clock source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum UsbSource {
    /// Phase locked loop.
    Pll = 0,
    /// Internal 32 MHz RC oscillator.
    Rc32M = 1,
}
