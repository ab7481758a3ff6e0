//! The [`Token`] trait.
//!
//! A token is a zero-sized type, at most one instance of which ever exists.
//! Every peripheral register block in [`map`](crate::map) is a token: owning
//! the value is owning the hardware instance, so a driver holding it can run
//! multi-step read-modify-write sequences without anyone else touching the
//! registers in between. While affinity could be represented by Rust
//! type-system, uniqueness couldn't. Therefore the concept relies on the two
//! `unsafe` contracts below.
//!
//! 1. *Implementing* the trait is `unsafe`, and it is the implementer
//!    responsibility to ensure the following:
//!
//!     * The type must not implement [`Clone`].
//!     * The type must be instantiated only inside [`Token::take`] method.
//!     * The type must be zero-sized.
//!
//! 2. *Calling* [`Token::take`] is `unsafe`, and it is the caller
//!    responsibility to ensure that at most one instance of the type ever
//!    exists.
//!
//! Most programs never call [`Token::take`] directly.
//! [`Peripherals::take`](crate::device::Peripherals::take) hands out every
//! block of the selected device once:
//!
//! ```
//! use xmega_core::device::Peripherals;
//!
//! let p = Peripherals::take().unwrap();
//! assert_eq!(core::mem::size_of_val(&p), 0);
//! assert!(Peripherals::take().is_none());
//! ```
//!
//! Since tokens are zero-sized, passing the instance around doesn't consume
//! the stack, and storing the instance inside a driver doesn't consume the
//! memory.

/// A zero-sized affine type, at most one instance of which ever exists.
///
/// # Safety
///
/// The above properties can't be expressed with Rust type-system, therefore
/// the trait is marked `unsafe`, and it is the implementer's responsibility to
/// keep the following invariants:
///
/// 1. The type must not implement [`Clone`].
/// 2. The type must be instantiated only inside [`Token::take`] method.
/// 3. The type must be zero-sized.
pub unsafe trait Token: Sized + Send + 'static {
    /// Creates the token instance.
    ///
    /// # Safety
    ///
    /// At most one instance of the token must ever exist. This invariant can't
    /// be expressed with Rust type-system, therefore the method is marked
    /// `unsafe`, and it is the caller responsibility to keep the invariant.
    unsafe fn take() -> Self;
}

mod compile_tests {
    //! ```compile_fail
    //! use xmega_core::map::usart::Usart;
    //! fn main() {
    //!     let usart = Usart::<0x08A0> { _priv: () };
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     let a = p.usartc0;
    //!     let b = p.usartc0;
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use xmega_core::map::spi::Spi;
    //! fn main() {
    //!     let spi = unsafe { Spi::<0x08C0>::steal() };
    //! }
    //! ```
}
