//! Oscillators.

use crate::{token::Token, FieldValue};

periph! {
    /// OSC register block.
    pub struct Osc<const BASE: usize> @ BASE;

    /// Oscillator enables, one bit per [`Oscillator`].
    ctrl: Ctrl(u8) @ 0x00 {
        /// PLL enable.
        pllen: bit(4);
        /// External oscillator enable.
        xoscen: bit(3);
        /// Internal 32.768 kHz RC oscillator enable.
        rc32ken: bit(2);
        /// Internal 32 MHz RC oscillator enable.
        rc32men: bit(1);
        /// Internal 2 MHz RC oscillator enable.
        rc2men: bit(0);
    }

    /// Oscillator ready flags, laid out like CTRL.
    status: Status(u8) @ 0x01 {
        /// PLL locked.
        pllrdy: bit(4);
        /// External oscillator stable.
        xoscrdy: bit(3);
        /// Internal 32.768 kHz RC oscillator stable.
        rc32krdy: bit(2);
        /// Internal 32 MHz RC oscillator stable.
        rc32mrdy: bit(1);
        /// Internal 2 MHz RC oscillator stable.
        rc2mrdy: bit(0);
    }

    /// External oscillator control.
    xoscctrl: XoscCtrl(u8) @ 0x02 {
        /// Crystal frequency range.
        frqrange: bits(6..=7) => FrequencyRange;
        /// 32.768 kHz crystal low power mode.
        x32klpm: bit(5);
        /// 16 MHz crystal high power mode.
        xoscpwr: bit(4);
        /// Oscillator type and start-up time.
        xoscsel: bits(0..=3) => XoscSelect;
    }

    /// PLL control. Only writable while the PLL is disabled.
    pllctrl: PllCtrl(u8) @ 0x05 {
        /// Reference clock.
        pllsrc: bits(6..=7) => PllSource;
        /// Divide the output by 2.
        plldiv: bit(5);
        /// Multiplication factor.
        pllfac: bits(0..=4);
    }
}

unsafe impl<const BASE: usize> Token for Osc<BASE> {
    #[inline(always)]
    unsafe fn take() -> Self {
        unsafe { Self::steal() }
    }
}

/// A clock generator. The discriminant is its bit position in both CTRL and
/// STATUS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Oscillator {
    /// Internal 2 MHz RC oscillator.
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

impl Oscillator {
    /// Returns the enable bit in CTRL, which is also the ready bit in STATUS.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

/// Crystal frequency range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum FrequencyRange {
    /// 0.4 to 2 MHz.
    Mhz0_4To2 = 0,
    /// 2 to 9 MHz.
    Mhz2To9 = 1,
    /// 9 to 12 MHz.
    Mhz9To12 = 2,
    /// 12 to 16 MHz.
    Mhz12To16 = 3,
}

/// External oscillator type and start-up time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum XoscSelect {
    /// External clock, 6 CLK.
    ExtClk = 0x00,
    /// 32.768 kHz crystal on TOSC, 32K CLK.
    Tosc32K = 0x02,
    /// 0.4 to 16 MHz crystal, 256 CLK.
    Xtal256Clk = 0x03,
    /// 0.4 to 16 MHz crystal, 1K CLK.
    Xtal1KClk = 0x07,
    /// 0.4 to 16 MHz crystal, 16K CLK.
    Xtal16KClk = 0x0B,
}

/// PLL reference clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PllSource {
    /// Internal 2 MHz RC oscillator.
    Rc2M = 0,
    /// Internal 32 MHz RC oscillator, divided by 4.
    Rc32M = 2,
    /// External oscillator.
    Xosc = 3,
}

impl PllSource {
    /// Returns the oscillator feeding the PLL.
    pub const fn oscillator(self) -> Oscillator {
        match self {
            Self::Rc2M => Oscillator::Rc2M,
            Self::Rc32M => Oscillator::Rc32M,
            Self::Xosc => Oscillator::Xosc,
        }
    }
}
