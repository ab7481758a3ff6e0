use super::{bit_range, Bits, Field, FieldVal, FieldValue, Reg};
use core::marker::PhantomData;

/// `N` identical `width`-bit fields packed contiguously from bit `start` of one
/// register.
///
/// XMEGA uses this shape for groups of interrupt levels and per-channel
/// flags. The whole array is always written with a single register access.
pub struct FieldArray<R, V, const N: usize> {
    reg: Reg<R>,
    start: u8,
    width: u8,
    _value: PhantomData<fn() -> V>,
}

impl<R, V, const N: usize> Clone for FieldArray<R, V, N> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, V, const N: usize> Copy for FieldArray<R, V, N> {}

impl<R: Bits, V: FieldValue<R>, const N: usize> FieldArray<R, V, N> {
    /// Binds `N` fields of `width` bits starting at bit `start` of `reg`.
    ///
    /// # Panics
    ///
    /// If the array doesn't fit in the register. In a `const` context this is
    /// a compile error.
    #[inline(always)]
    pub const fn new(reg: Reg<R>, start: u8, width: u8) -> Self {
        assert!(
            N > 0 && width > 0 && start as usize + width as usize * N <= R::WIDTH as usize,
            "field array outside of register"
        );
        Self { reg, start, width, _value: PhantomData }
    }

    /// Returns the parent register.
    #[inline(always)]
    pub const fn reg(&self) -> Reg<R> {
        self.reg
    }

    /// Returns the number of fields.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`; an array holds at least one field.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the mask of the whole array within the register.
    #[inline(always)]
    pub fn mask(&self) -> R {
        R::from_u32(bit_range(self.start, self.span_stop()))
    }

    /// Returns field `I`, which covers bits
    /// `start + I * width..=start + (I + 1) * width - 1`.
    #[inline(always)]
    pub const fn get<const I: usize>(&self) -> Field<R, V> {
        const { assert!(I < N, "field index out of range") };
        let start = self.start + I as u8 * self.width;
        Field::new(self.reg, start, start + self.width - 1)
    }

    /// Positions a pre-packed right-aligned `bits` value over the array.
    #[inline(always)]
    pub fn shift(&self, bits: R) -> FieldVal<R> {
        let mask = self.mask();
        FieldVal::new((bits << self.start) & mask, mask)
    }

    /// Positions `value` replicated into every field.
    #[inline(always)]
    pub fn shift_all(&self, value: V) -> FieldVal<R> {
        self.shift(self.replicate(value))
    }

    /// Writes a pre-packed right-aligned value over the whole array,
    /// preserving the other bits of the register.
    #[inline(always)]
    pub fn write(&self, bits: R) {
        self.reg.modify(self.shift(bits));
    }

    /// Writes `value` into every field with one register access.
    #[inline(always)]
    pub fn write_all(&self, value: V) {
        self.write(self.replicate(value));
    }

    /// Reads the whole array as a right-aligned packed value.
    #[inline(always)]
    pub fn read(&self) -> R {
        (self.reg.read() & self.mask()) >> self.start
    }

    /// Reads every field, lowest first.
    #[inline(always)]
    pub fn unpack(&self) -> [V::Output; N] {
        let packed = self.read();
        let slot = self.slot_mask();
        core::array::from_fn(|i| V::from_bits((packed >> (i as u8 * self.width)) & slot))
    }

    fn replicate(&self, value: V) -> R {
        let bits = value.into_bits() & self.slot_mask();
        let mut packed = R::ZERO;
        for i in 0..N {
            packed = packed | (bits << (i as u8 * self.width));
        }
        packed
    }

    fn slot_mask(&self) -> R {
        R::from_u32(bit_range(0, self.width - 1))
    }

    fn span_stop(&self) -> u8 {
        self.start + N as u8 * self.width - 1
    }
}
