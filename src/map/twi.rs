//! Two-wire interface. Only the common and master registers are mapped.

use super::IntLevel;
use crate::{token::Token, FieldValue};

periph! {
    /// TWI register block.
    pub struct Twi<const BASE: usize> @ BASE;

    /// Common control.
    ctrl: Ctrl(u8) @ 0x00 {
        /// SDA hold time.
        sdahold: bits(1..=2) => SdaHold;
        /// External driver interface enable.
        edien: bit(0);
    }

    /// Master control A.
    mctrla: MCtrlA(u8) @ 0x01 {
        /// Master interrupt level.
        intlvl: bits(6..=7) => IntLevel;
        /// Read interrupt enable.
        rien: bit(5);
        /// Write interrupt enable.
        wien: bit(4);
        /// Master enable.
        enable: bit(3);
    }

    /// Master control B.
    mctrlb: MCtrlB(u8) @ 0x02 {
        /// Inactive bus timeout.
        timeout: bits(2..=3) => Timeout;
        /// Quick command enable.
        qcen: bit(1);
        /// Smart mode enable.
        smen: bit(0);
    }

    /// Master control C.
    mctrlc: MCtrlC(u8) @ 0x03 {
        /// Acknowledge action, NACK when set.
        ackact: bit(2);
        /// Command.
        cmd: bits(0..=1) => Command;
    }

    /// Master status.
    mstatus: MStatus(u8) @ 0x04 {
        /// Read interrupt flag.
        rif: bit(7);
        /// Write interrupt flag.
        wif: bit(6);
        /// Clock hold.
        clkhold: bit(5);
        /// Last acknowledge received, NACK when set.
        rxack: bit(4);
        /// Arbitration lost.
        arblost: bit(3);
        /// Bus error.
        buserr: bit(2);
        /// Bus state.
        busstate: bits(0..=1) => BusState;
    }

    /// Master baud rate divisor.
    mbaud: MBaud(u8) @ 0x05;

    /// Master address.
    maddr: MAddr(u8) @ 0x06;

    /// Master data.
    mdata: MData(u8) @ 0x07;
}

unsafe impl<const BASE: usize> Token for Twi<BASE> {
    #[inline(always)]
    unsafe fn take() -> Self {
        unsafe { Self::steal() }
    }
}

/// SDA hold time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SdaHold {
    /// No hold time.
    #[default]
    Off = 0,
    /// 50 ns.
    Ns50 = 1,
    /// 300 ns.
    Ns300 = 2,
    /// 400 ns.
    Ns400 = 3,
}

/// Inactive bus timeout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Timeout {
    /// Disabled.
    #[default]
    Disabled = 0,
    /// 50 us.
    Us50 = 1,
    /// 100 us.
    Us100 = 2,
    /// 200 us.
    Us200 = 3,
}

/// Master command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// No action.
    NoAct = 0,
    /// Repeated START.
    RepStart = 1,
    /// Byte receive.
    RecvTrans = 2,
    /// STOP.
    Stop = 3,
}

/// Bus state as seen by the master.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BusState {
    /// Unknown, after reset or disable.
    Unknown = 0,
    /// Idle.
    Idle = 1,
    /// Owned by this master.
    Owner = 2,
    /// Owned by another master.
    Busy = 3,
}

impl BusState {
    /// Decodes the two BUSSTATE bits; every encoding is valid.
    #[inline]
    pub const fn from_raw(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Unknown,
            1 => Self::Idle,
            2 => Self::Owner,
            _ => Self::Busy,
        }
    }
}
