//! Serial peripheral interface.

use super::IntLevel;
use crate::{token::Token, FieldValue};

periph! {
    /// SPI register block.
    pub struct Spi<const BASE: usize> @ BASE;

    /// Control register.
    ctrl: Ctrl(u8) @ 0x00 {
        /// Double clock rate.
        clk2x: bit(7);
        /// Module enable.
        enable: bit(6);
        /// Data order, LSB first when set.
        dord: bit(5);
        /// Master mode.
        master: bit(4);
        /// Clock polarity and phase.
        mode: bits(2..=3) => Mode;
        /// Clock prescaler.
        prescaler: bits(0..=1) => Prescaler;
    }

    /// Interrupt control.
    intctrl: IntCtrl(u8) @ 0x01 {
        /// Interrupt level.
        intlvl: bits(0..=1) => IntLevel;
    }

    /// Status flags.
    status: Status(u8) @ 0x02 {
        /// Transfer complete.
        if_: bit(7);
        /// Write collision.
        wrcol: bit(6);
    }

    /// Shift register.
    data: Data(u8) @ 0x03;
}

unsafe impl<const BASE: usize> Token for Spi<BASE> {
    #[inline(always)]
    unsafe fn take() -> Self {
        unsafe { Self::steal() }
    }
}

/// SPI clock polarity and phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// Idle low, sample on the leading edge.
    #[default]
    Mode0 = 0,
    /// Idle low, sample on the trailing edge.
    Mode1 = 1,
    /// Idle high, sample on the leading edge.
    Mode2 = 2,
    /// Idle high, sample on the trailing edge.
    Mode3 = 3,
}

/// SPI clock prescaler. The effective division is halved when CLK2X is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    /// CPU clock / 4.
    Div4 = 0,
    /// CPU clock / 16.
    Div16 = 1,
    /// CPU clock / 64.
    Div64 = 2,
    /// CPU clock / 128.
    Div128 = 3,
}

impl Prescaler {
    /// Returns the division factor without CLK2X.
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Div4 => 4,
            Self::Div16 => 16,
            Self::Div64 => 64,
            Self::Div128 => 128,
        }
    }
}
