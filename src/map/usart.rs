//! Universal synchronous/asynchronous receiver/transmitter.

use super::IntLevel;
use crate::{token::Token, FieldValue};

periph! {
    /// USART register block.
    pub struct Usart<const BASE: usize> @ BASE;

    /// Transmit/receive data buffer.
    data: Data(u8) @ 0x00;

    /// Status flags.
    status: Status(u8) @ 0x01 {
        /// Receive complete.
        rxcif: bit(7);
        /// Transmit complete.
        txcif: bit(6);
        /// Data register empty.
        dreif: bit(5);
        /// Frame error.
        ferr: bit(4);
        /// Receive buffer overflow.
        bufovf: bit(3);
        /// Parity error.
        perr: bit(2);
        /// Ninth receive bit.
        rxb8: bit(0);
    }

    /// Interrupt levels.
    ctrla: CtrlA(u8) @ 0x03 {
        /// Data register empty, transmit complete and receive complete
        /// levels, lowest slot first.
        intlvl: array(0, 2, 3) => IntLevel;
        /// Receive complete interrupt level.
        rxcintlvl: bits(4..=5) => IntLevel;
        /// Transmit complete interrupt level.
        txcintlvl: bits(2..=3) => IntLevel;
        /// Data register empty interrupt level.
        dreintlvl: bits(0..=1) => IntLevel;
    }

    /// Enables and speed control.
    ctrlb: CtrlB(u8) @ 0x04 {
        /// Receiver enable.
        rxen: bit(4);
        /// Transmitter enable.
        txen: bit(3);
        /// Double transmission speed.
        clk2x: bit(2);
        /// Multi-processor communication mode.
        mpcm: bit(1);
        /// Ninth transmit bit.
        txb8: bit(0);
    }

    /// Frame format.
    ctrlc: CtrlC(u8) @ 0x05 {
        /// Communication mode.
        cmode: bits(6..=7) => CommMode;
        /// Parity mode.
        pmode: bits(4..=5) => Parity;
        /// Two stop bits.
        sbmode: bit(3);
        /// Character size.
        chsize: bits(0..=2) => CharSize;
    }

    /// Low byte of BSEL.
    baudctrla: BaudCtrlA(u8) @ 0x06;

    /// BSCALE and the high nibble of BSEL.
    baudctrlb: BaudCtrlB(u8) @ 0x07 {
        /// Baud rate scale factor, two's complement.
        bscale: bits(4..=7);
        /// High nibble of BSEL.
        bsel: bits(0..=3);
    }
}

unsafe impl<const BASE: usize> Token for Usart<BASE> {
    #[inline(always)]
    unsafe fn take() -> Self {
        unsafe { Self::steal() }
    }
}

/// Character size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CharSize {
    /// 5 data bits.
    Bits5 = 0,
    /// 6 data bits.
    Bits6 = 1,
    /// 7 data bits.
    Bits7 = 2,
    /// 8 data bits.
    #[default]
    Bits8 = 3,
    /// 9 data bits.
    Bits9 = 7,
}

/// Communication mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CommMode {
    /// Asynchronous USART.
    Asynchronous = 0,
    /// Synchronous USART.
    Synchronous = 1,
    /// Infrared.
    Irda = 2,
    /// Master SPI.
    MasterSpi = 3,
}

/// Parity mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Parity {
    /// No parity bit.
    #[default]
    Disabled = 0,
    /// Even parity.
    Even = 2,
    /// Odd parity.
    Odd = 3,
}
