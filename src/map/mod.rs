//! Register blocks of the XMEGA peripherals.
//!
//! Each block is a zero-sized [`Token`](crate::token::Token) generic over its
//! base address; the addresses of the selected device live in
//! [`device`](crate::device). Offsets and bit positions follow the XMEGA AU
//! manual.

pub mod adc;
pub mod clk;
pub mod cpu;
pub mod osc;
pub mod port;
pub mod spi;
pub mod twi;
pub mod usart;

use crate::FieldValue;

/// Interrupt level of a peripheral interrupt source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum IntLevel {
    /// Interrupt disabled.
    Off = 0,
    /// Low level.
    Lo = 1,
    /// Medium level.
    Med = 2,
    /// High level.
    Hi = 3,
}
