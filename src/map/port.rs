//! I/O port.

use super::IntLevel;
use crate::{reg::Reg, token::Token, FieldValue};

periph! {
    /// PORT register block.
    pub struct Port<const BASE: usize> @ BASE;

    /// Data direction.
    dir: Dir(u8) @ 0x00;
    /// Data direction set.
    dirset: DirSet(u8) @ 0x01;
    /// Data direction clear.
    dirclr: DirClr(u8) @ 0x02;
    /// Data direction toggle.
    dirtgl: DirTgl(u8) @ 0x03;
    /// Output value.
    out: Out(u8) @ 0x04;
    /// Output value set.
    outset: OutSet(u8) @ 0x05;
    /// Output value clear.
    outclr: OutClr(u8) @ 0x06;
    /// Output value toggle.
    outtgl: OutTgl(u8) @ 0x07;
    /// Input value.
    input: In(u8) @ 0x08;

    /// Interrupt levels.
    intctrl: IntCtrl(u8) @ 0x09 {
        /// Levels of interrupt 0 and 1, interrupt 0 first.
        intlvl: array(0, 2, 2) => IntLevel;
    }

    /// Interrupt 0 pin mask.
    int0mask: Int0Mask(u8) @ 0x0A;
    /// Interrupt 1 pin mask.
    int1mask: Int1Mask(u8) @ 0x0B;

    /// Interrupt flags.
    intflags: IntFlags(u8) @ 0x0C {
        /// Interrupt 1 flag.
        int1if: bit(1);
        /// Interrupt 0 flag.
        int0if: bit(0);
    }

    /// Pin remap.
    remap: Remap(u8) @ 0x0E;

    /// Pin 0 configuration; every pin has one at `0x10 + n`, see
    /// [`Port::pinctrl`].
    pin0ctrl: PinCtrl(u8) @ 0x10 {
        /// Slew rate limit.
        srlen: bit(7);
        /// Inverted I/O.
        invert: bit(6);
        /// Output and pull configuration.
        opc: bits(3..=5) => OutputConfig;
        /// Input sense configuration.
        isc: bits(0..=2) => InputSense;
    }
}

unsafe impl<const BASE: usize> Token for Port<BASE> {
    #[inline(always)]
    unsafe fn take() -> Self {
        unsafe { Self::steal() }
    }
}

/// Offsets of the PIN0CTRL..PIN7CTRL registers.
pub const PINCTRL_OFFSETS: [usize; 8] = [0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17];

/// Offsets of the INT0MASK and INT1MASK registers.
pub const INTMASK_OFFSETS: [usize; 2] = [Int0Mask::OFFSET, Int1Mask::OFFSET];

impl<const BASE: usize> Port<BASE> {
    /// Returns the configuration register of pin `pin & 7`.
    #[inline(always)]
    pub const fn pinctrl(&self, pin: u8) -> PinCtrl {
        pinctrl_at(BASE, pin)
    }

    /// Returns the pin mask register of interrupt `INT`.
    #[inline(always)]
    pub const fn intmask<const INT: usize>(&self) -> Reg<u8> {
        intmask_at::<INT>(BASE)
    }
}

/// Returns the configuration register of pin `pin & 7` of the port at `base`.
#[inline(always)]
pub(crate) const fn pinctrl_at(base: usize, pin: u8) -> PinCtrl {
    unsafe { PinCtrl::at(base + PINCTRL_OFFSETS[(pin & 7) as usize]) }
}

/// Returns the pin mask register of interrupt `INT` of the port at `base`.
#[inline(always)]
pub(crate) const fn intmask_at<const INT: usize>(base: usize) -> Reg<u8> {
    const { assert!(INT < 2, "a port has interrupts 0 and 1 only") };
    unsafe { Reg::at(base + INTMASK_OFFSETS[INT]) }
}

/// Input sense configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum InputSense {
    /// Sense both edges.
    #[default]
    BothEdges = 0,
    /// Sense rising edge.
    Rising = 1,
    /// Sense falling edge.
    Falling = 2,
    /// Sense low level.
    Level = 3,
    /// Digital input buffer disabled.
    InputDisable = 7,
}

/// Output and pull configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, FieldValue)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OutputConfig {
    /// Totem-pole.
    #[default]
    Totem = 0,
    /// Totem-pole with bus-keeper.
    BusKeeper = 1,
    /// Totem-pole with pull-down on input.
    PullDown = 2,
    /// Totem-pole with pull-up on input.
    PullUp = 3,
    /// Wired-OR.
    WiredOr = 4,
    /// Wired-AND.
    WiredAnd = 5,
    /// Wired-OR with pull-down.
    WiredOrPull = 6,
    /// Wired-AND with pull-up.
    WiredAndPull = 7,
}
