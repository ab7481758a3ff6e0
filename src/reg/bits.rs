use super::raw;
use core::fmt::Debug;
use core::mem::size_of;
use core::ops::{BitAnd, BitOr, Not, Shl, Shr};

/// Underlying integer of a [`Reg`](super::Reg).
///
/// Wider registers are accessed one byte at a time, low byte first for both
/// loads and stores. XMEGA latches the high byte of a 16-bit register in a
/// shared TEMP register on the low-byte access, so this order is part of the
/// hardware contract.
pub trait Bits
where
    Self: Sized
        + Debug
        + Copy
        + Eq
        + Not<Output = Self>
        + BitOr<Output = Self>
        + BitAnd<Output = Self>
        + Shl<u8, Output = Self>
        + Shr<u8, Output = Self>,
{
    /// Width of the type in bits.
    const WIDTH: u8;

    /// All bits cleared.
    const ZERO: Self;

    /// The value of one.
    const ONE: Self;

    /// Converts `bits` to `Self`, discarding the bits that don't fit.
    fn from_u32(bits: u32) -> Self;

    /// Widens `self` to `u32`.
    fn into_u32(self) -> u32;

    /// Returns `true` if all bits are zeros.
    #[inline(always)]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// Loads a value from `address`.
    ///
    /// # Safety
    ///
    /// `address` must point to a readable register of this width.
    unsafe fn load(address: usize) -> Self;

    /// Stores `value` to `address`.
    ///
    /// # Safety
    ///
    /// `address` must point to a writable register of this width.
    unsafe fn store(address: usize, value: Self);
}

macro_rules! bits {
    ($type:ty) => {
        impl Bits for $type {
            const WIDTH: u8 = (size_of::<$type>() * 8) as u8;
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline(always)]
            fn from_u32(bits: u32) -> Self {
                bits as $type
            }

            #[inline(always)]
            fn into_u32(self) -> u32 {
                self as u32
            }

            #[inline(always)]
            unsafe fn load(address: usize) -> Self {
                let mut value: $type = 0;
                for i in 0..size_of::<$type>() {
                    let byte = unsafe { raw::read8(address + i) };
                    value |= <$type>::from(byte) << (i * 8);
                }
                value
            }

            #[inline(always)]
            unsafe fn store(address: usize, value: Self) {
                for i in 0..size_of::<$type>() {
                    unsafe { raw::write8(address + i, (value >> (i * 8)) as u8) };
                }
            }
        }
    };
}

bits!(u8);
bits!(u16);
bits!(u32);
