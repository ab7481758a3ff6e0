//! Byte access backend.
//!
//! On AVR every access is a volatile load or store. On any other target the
//! accesses go to the [`sim`](crate::sim) memory image.

#[cfg(target_arch = "avr")]
#[inline(always)]
pub(crate) unsafe fn read8(address: usize) -> u8 {
    unsafe { core::ptr::read_volatile(address as *const u8) }
}

#[cfg(target_arch = "avr")]
#[inline(always)]
pub(crate) unsafe fn write8(address: usize, value: u8) {
    unsafe { core::ptr::write_volatile(address as *mut u8, value) }
}

#[cfg(not(target_arch = "avr"))]
#[inline(always)]
pub(crate) unsafe fn read8(address: usize) -> u8 {
    crate::sim::read8(address)
}

#[cfg(not(target_arch = "avr"))]
#[inline(always)]
pub(crate) unsafe fn write8(address: usize, value: u8) {
    crate::sim::write8(address, value);
}
