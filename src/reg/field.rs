use super::{Bits, Reg};
use core::{marker::PhantomData, ops::BitOr};

/// Returns the mask of bits `start..=stop`.
///
/// ```
/// assert_eq!(xmega_core::reg::bit_range(2, 4), 0b0001_1100);
/// assert_eq!(xmega_core::reg::bit_range(0, 31), u32::MAX);
/// ```
#[inline(always)]
pub const fn bit_range(start: u8, stop: u8) -> u32 {
    let high = (1_u64 << (stop + 1)) - 1;
    let low = (1_u64 << start) - 1;
    (high & !low) as u32
}

/// A value that can be stored in a register field.
///
/// Implemented for the unsigned integers, for `bool`, and for enumerations
/// through `#[derive(FieldValue)]`. Converting into bits never fails: values
/// wider than the field are truncated by the field mask.
pub trait FieldValue<R: Bits>: Copy {
    /// What a read of the field returns. Enumerations read back as
    /// `Option<Self>`, because a register may hold a reserved encoding.
    type Output;

    /// Converts the value to right-aligned register bits.
    fn into_bits(self) -> R;

    /// Interprets right-aligned register bits.
    fn from_bits(bits: R) -> Self::Output;
}

macro_rules! field_value {
    ($type:ty) => {
        impl<R: Bits> FieldValue<R> for $type {
            type Output = Self;

            #[inline(always)]
            fn into_bits(self) -> R {
                R::from_u32(u32::from(self))
            }

            #[inline(always)]
            fn from_bits(bits: R) -> Self {
                bits.into_u32() as $type
            }
        }
    };
}

field_value!(u8);
field_value!(u16);
field_value!(u32);

impl<R: Bits> FieldValue<R> for bool {
    type Output = Self;

    #[inline(always)]
    fn into_bits(self) -> R {
        if self {
            R::ONE
        } else {
            R::ZERO
        }
    }

    #[inline(always)]
    fn from_bits(bits: R) -> Self {
        !bits.is_zero()
    }
}

/// Value and mask of one or more fields of the same register.
///
/// Produced by [`Field::shift`] and combined with `|`; applied with
/// [`Reg::modify`] (untouched bits preserved) or [`Reg::store`] (untouched
/// bits cleared).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldVal<R> {
    value: R,
    mask: R,
}

impl<R: Bits> FieldVal<R> {
    /// Creates a value/mask pair. Value bits outside of `mask` are dropped.
    #[inline(always)]
    pub fn new(value: R, mask: R) -> Self {
        Self { value: value & mask, mask }
    }

    /// Returns the value bits.
    #[inline(always)]
    pub fn value(self) -> R {
        self.value
    }

    /// Returns the mask of the bits this value covers.
    #[inline(always)]
    pub fn mask(self) -> R {
        self.mask
    }

    /// Merges two pairs, combining both values and masks.
    #[inline(always)]
    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self { value: self.value | other.value, mask: self.mask | other.mask }
    }

    /// Writes the covered bits into `reg`, preserving the rest.
    #[inline(always)]
    pub fn apply(self, reg: &Reg<R>) {
        reg.modify(self);
    }
}

impl<R: Bits> BitOr for FieldVal<R> {
    type Output = Self;

    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        self.combine(rhs)
    }
}

/// A named bit range `start..=stop` of a register, holding a `V`.
pub struct Field<R, V = R> {
    reg: Reg<R>,
    start: u8,
    stop: u8,
    _value: PhantomData<fn() -> V>,
}

impl<R, V> Clone for Field<R, V> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, V> Copy for Field<R, V> {}

impl<R: Bits, V: FieldValue<R>> Field<R, V> {
    /// Binds bits `start..=stop` of `reg`.
    ///
    /// # Panics
    ///
    /// If `start > stop` or `stop` is outside of the register. In a `const`
    /// context this is a compile error.
    #[inline(always)]
    pub const fn new(reg: Reg<R>, start: u8, stop: u8) -> Self {
        assert!(start <= stop && stop < R::WIDTH, "field outside of register");
        Self { reg, start, stop, _value: PhantomData }
    }

    /// Returns the parent register.
    #[inline(always)]
    pub const fn reg(&self) -> Reg<R> {
        self.reg
    }

    /// Returns the lowest bit of the field.
    #[inline(always)]
    pub const fn start(&self) -> u8 {
        self.start
    }

    /// Returns the highest bit of the field.
    #[inline(always)]
    pub const fn stop(&self) -> u8 {
        self.stop
    }

    /// Returns the number of bits in the field.
    #[inline(always)]
    pub const fn width(&self) -> u8 {
        self.stop - self.start + 1
    }

    /// Returns the mask of the field within the register.
    #[inline(always)]
    pub fn mask(&self) -> R {
        R::from_u32(bit_range(self.start, self.stop))
    }

    /// Positions `value` in the field, for combining with other fields.
    #[inline(always)]
    pub fn shift(&self, value: V) -> FieldVal<R> {
        let mask = self.mask();
        FieldVal { value: (value.into_bits() << self.start) & mask, mask }
    }

    /// Writes `value` into the field, preserving the other bits of the
    /// register. Bits of `value` that don't fit are silently dropped.
    #[inline(always)]
    pub fn write(&self, value: V) {
        self.write_bits(value.into_bits());
    }

    /// Writes right-aligned raw `bits` into the field.
    #[inline(always)]
    pub fn write_bits(&self, bits: R) {
        let mask = self.mask();
        let current = self.reg.read();
        self.reg.write((current & !mask) | ((bits << self.start) & mask));
    }

    /// Reads the field.
    #[inline(always)]
    pub fn read(&self) -> V::Output {
        V::from_bits(self.read_bits())
    }

    /// Reads the field as right-aligned raw bits.
    #[inline(always)]
    pub fn read_bits(&self) -> R {
        self.get_bits(self.reg.read())
    }

    /// Extracts the field from a previously read register value.
    #[inline(always)]
    pub fn get(&self, snapshot: R) -> V::Output {
        V::from_bits(self.get_bits(snapshot))
    }

    #[inline(always)]
    fn get_bits(&self, snapshot: R) -> R {
        (snapshot & self.mask()) >> self.start
    }
}

impl<R: Bits> Field<R, bool> {
    /// Sets the bit.
    #[inline(always)]
    pub fn set(&self) {
        self.write(true);
    }

    /// Clears the bit.
    #[inline(always)]
    pub fn clear(&self) {
        self.write(false);
    }

    /// Returns `true` if the bit is set.
    #[inline(always)]
    pub fn is_set(&self) -> bool {
        self.read()
    }

    /// Returns `true` if the bit is cleared.
    #[inline(always)]
    pub fn is_clear(&self) -> bool {
        !self.read()
    }
}
