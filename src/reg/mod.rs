//! Safe API for memory-mapped registers.
//!
//! A [`Reg`] is a typed descriptor of one hardware storage location: an
//! address plus the register width, expressed by the [`Bits`] type parameter
//! (`u8`, `u16` or `u32`). A [`Field`] is a bit range inside a register, and a
//! [`FieldArray`] is a run of identical fields packed into one register.
//!
//! ```
//! use xmega_core::reg::{Field, Reg};
//! # xmega_core::sim::reset();
//!
//! let ctrl = unsafe { Reg::<u8>::at(0x2000) };
//! ctrl.write(0b1000_0001);
//!
//! let mode = Field::<u8>::new(ctrl, 2, 4);
//! mode.write(0b101);
//! assert_eq!(ctrl.read(), 0b1001_0101);
//! assert_eq!(mode.read(), 0b101);
//! ```
//!
//! Multi-field writes are expressed as [`FieldVal`] value/mask pairs so that
//! one register access updates several fields without clobbering the rest:
//!
//! ```
//! use xmega_core::reg::{Field, Reg};
//! # xmega_core::sim::reset();
//!
//! let ctrl = unsafe { Reg::<u8>::at(0x2000) };
//! ctrl.write(0xFF);
//! let enable = Field::<u8, bool>::new(ctrl, 7, 7);
//! let mode = Field::<u8>::new(ctrl, 0, 1);
//! ctrl.modify(enable.shift(false) | mode.shift(0b10));
//! assert_eq!(ctrl.read(), 0b0111_1110);
//! ```

#[macro_use]
mod macros;

mod bits;
mod field;
mod field_array;
mod raw;

pub use self::{
    bits::Bits,
    field::{bit_range, Field, FieldVal, FieldValue},
    field_array::FieldArray,
};

use core::{fmt, marker::PhantomData};

/// Memory-mapped register binding.
///
/// The descriptor is two bytes wide on AVR and is normally built in a `const`
/// context, so every access folds down to a load or store at a constant
/// address.
pub struct Reg<R> {
    address: usize,
    _raw: PhantomData<fn() -> R>,
}

impl<R> Clone for Reg<R> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Reg<R> {}

impl<R> fmt::Debug for Reg<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reg({:#06x})", self.address)
    }
}

impl<R> PartialEq for Reg<R> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl<R> Eq for Reg<R> {}

impl<R: Bits> Reg<R> {
    /// Binds a register of width `R` at `address`.
    ///
    /// # Safety
    ///
    /// `address` must be the address of a hardware register of exactly the
    /// width of `R`, and every other binding of the same location must use the
    /// same width.
    #[inline(always)]
    pub const unsafe fn at(address: usize) -> Self {
        Self { address, _raw: PhantomData }
    }

    /// Returns the memory address of the register.
    #[inline(always)]
    pub const fn address(&self) -> usize {
        self.address
    }

    /// Reads the raw register value.
    #[inline(always)]
    pub fn read(&self) -> R {
        unsafe { R::load(self.address) }
    }

    /// Writes `value` verbatim.
    #[inline(always)]
    pub fn write(&self, value: R) {
        unsafe { R::store(self.address, value) }
    }

    /// Writes the value part of `val`. Bits outside of `val`'s mask become
    /// zero.
    #[inline(always)]
    pub fn store(&self, val: FieldVal<R>) {
        self.write(val.value());
    }

    /// Replaces the bits covered by `val`'s mask, preserving the rest.
    #[inline(always)]
    pub fn modify(&self, val: FieldVal<R>) {
        let mask = val.mask();
        self.write((self.read() & !mask) | (val.value() & mask));
    }

    /// Sets the bits of `mask`.
    #[inline(always)]
    pub fn set_bits(&self, mask: R) {
        self.write(self.read() | mask);
    }

    /// Clears the bits of `mask`.
    #[inline(always)]
    pub fn clear_bits(&self, mask: R) {
        self.write(self.read() & !mask);
    }

    /// Reads the register, passes the value through `f` and writes the result
    /// back.
    #[inline(always)]
    pub fn update<F: FnOnce(R) -> R>(&self, f: F) {
        self.write(f(self.read()));
    }
}

mod compile_tests {
    //! ```compile_fail
    //! use xmega_core::reg::{Field, Reg};
    //! const MODE: Field<u8> = Field::new(unsafe { Reg::at(0x2000) }, 6, 8);
    //! fn main() {
    //!     MODE.write(1);
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use xmega_core::reg::{FieldArray, Reg};
    //! const LEVELS: FieldArray<u8, u8, 4> = FieldArray::new(unsafe { Reg::at(0x2000) }, 0, 2);
    //! fn main() {
    //!     LEVELS.get::<4>().write(1);
    //! }
    //! ```
}
