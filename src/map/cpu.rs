//! Configuration change protection.
//!
//! Protected I/O registers only accept a write issued right after the
//! [`Signature::IoReg`] signature was written to CCP; any other write is
//! ignored by the hardware.

use crate::reg::Reg;

periph! {
    /// CPU register block.
    pub(crate) struct Cpu<const BASE: usize> @ BASE;

    /// Configuration change protection.
    ccp: Ccp(u8) @ 0x04;
}

/// Base of the CPU register block, the same on every device.
pub const CPU_BASE: usize = 0x0030;

/// CCP signatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Signature {
    /// Self-programming instructions.
    Spm = 0x9D,
    /// Protected I/O registers.
    IoReg = 0xD8,
}

/// Writes `value` to the protected register `reg`.
///
/// The hardware opens a four cycle window after the signature, so both stores
/// run with interrupts held off.
pub(crate) fn protected_write(reg: Reg<u8>, value: u8) {
    let ccp = unsafe { Cpu::<CPU_BASE>::steal() }.ccp();
    critical_section::with(|_| {
        ccp.write(Signature::IoReg as u8);
        reg.write(value);
    });
}
