use super::{Pin, PinConfig};
use crate::{
    map::port::{self, DirClr, DirSet, In, Out, OutClr, OutSet, OutTgl},
    reg::{FieldVal, Reg},
};

/// Several pins of the port at `PORT` driven as one value.
///
/// Built from a tuple of two to eight pins of the same port. Reads and writes
/// are right-aligned to the lowest member pin, so for pins 2 and 5 bit 0 of
/// the value maps to pin 2 and bit 3 to pin 5. Pins between the members are
/// not touched.
///
/// ```
/// use xmega_core::device::Peripherals;
/// use xmega_core::gpio::PinGroup;
///
/// let p = Peripherals::take().unwrap();
/// let pins = p.portd.split();
/// let group = PinGroup::from((pins.p2, pins.p5));
/// assert_eq!(group.mask(), 0b0010_0100);
/// assert_eq!(group.shift(), 2);
/// let (p2, p5) = group.free();
/// ```
pub struct PinGroup<const PORT: usize, P> {
    pins: P,
    mask: u8,
    shift: u8,
}

impl<const PORT: usize, P> PinGroup<PORT, P> {
    #[inline]
    const fn with_mask(pins: P, mask: u8) -> Self {
        Self { pins, mask, shift: mask.trailing_zeros() as u8 }
    }

    /// Releases the member pins.
    #[inline]
    pub fn free(self) -> P {
        self.pins
    }

    /// Returns the union of the member pin masks.
    #[inline]
    pub const fn mask(&self) -> u8 {
        self.mask
    }

    /// Returns the number of the lowest member pin.
    #[inline]
    pub const fn shift(&self) -> u8 {
        self.shift
    }

    /// Makes every member an output.
    #[inline]
    pub fn set_output(&self) {
        self.reg(DirSet::OFFSET).write(self.mask);
    }

    /// Makes every member an input.
    #[inline]
    pub fn set_input(&self) {
        self.reg(DirClr::OFFSET).write(self.mask);
    }

    /// Drives every member high.
    #[inline]
    pub fn set_high(&self) {
        self.reg(OutSet::OFFSET).write(self.mask);
    }

    /// Drives every member low.
    #[inline]
    pub fn set_low(&self) {
        self.reg(OutClr::OFFSET).write(self.mask);
    }

    /// Inverts every member output.
    #[inline]
    pub fn toggle(&self) {
        self.reg(OutTgl::OFFSET).write(self.mask);
    }

    /// Reads the member inputs, right-aligned.
    #[inline]
    pub fn read(&self) -> u8 {
        (self.reg(In::OFFSET).read() & self.mask) >> self.shift
    }

    /// Drives the member outputs from the right-aligned `value`, leaving the
    /// other pins of the port alone. Bits that don't land on a member are
    /// dropped.
    #[inline]
    pub fn write(&self, value: u8) {
        self.reg(Out::OFFSET).modify(FieldVal::new(value << self.shift, self.mask));
    }

    #[inline(always)]
    fn reg(&self, offset: usize) -> Reg<u8> {
        unsafe { Reg::at(PORT + offset) }
    }

    /// Writes `config` to the configuration register of every member.
    pub fn configure(&self, config: PinConfig) {
        for pin in (0..8).filter(|pin| self.mask & (1 << pin) != 0) {
            port::pinctrl_at(PORT, pin).write(config.bits());
        }
    }
}

macro_rules! pin_group {
    ($($pin:ident),+) => {
        impl<const PORT: usize, $(const $pin: u8),+> From<($(Pin<PORT, $pin>,)+)>
            for PinGroup<PORT, ($(Pin<PORT, $pin>,)+)>
        {
            #[inline]
            fn from(pins: ($(Pin<PORT, $pin>,)+)) -> Self {
                Self::with_mask(pins, 0 $(| Pin::<PORT, $pin>::MASK)+)
            }
        }
    };
}

pin_group!(A, B);
pin_group!(A, B, C);
pin_group!(A, B, C, D);
pin_group!(A, B, C, D, E);
pin_group!(A, B, C, D, E, F);
pin_group!(A, B, C, D, E, F, G);
pin_group!(A, B, C, D, E, F, G, H);
