//! General purpose I/O.
//!
//! A [`Port`](crate::map::port::Port) token is [split](crate::map::port::Port::split)
//! into eight [`Pin`]s. Pin operations live in the [`GpioPin`] trait, shared
//! by compile-time pins and run-time [`AnyPin`]s. Pins of one port can be
//! bundled into a [`PinGroup`].
//!
//! ```
//! use xmega_core::device::Peripherals;
//! use xmega_core::gpio::{GpioPin, PinConfig, PinRole};
//! # use xmega_core::sim;
//!
//! let p = Peripherals::take().unwrap();
//! let pins = p.porta.split();
//! pins.p3.set_role(PinRole::OutputHigh);
//! pins.p4.configure(PinConfig::PULLUP | PinConfig::FALLING);
//! # assert_eq!(sim::writes_to(0x0601), [0b0000_1000]);
//! # assert_eq!(sim::writes_to(0x0605), [0b0000_1000]);
//! # assert_eq!(sim::peek(0x0614), 0b0001_1010);
//! ```

mod config;
mod group;
mod pin;

pub use self::{
    config::{PinConfig, PinRole},
    group::PinGroup,
    pin::{AnyPin, GpioPin, Pin, Pins},
};

mod compile_tests {
    //! ```compile_fail
    //! use xmega_core::gpio::Pin;
    //! fn main() {
    //!     let pin = unsafe { Pin::<0x0600, 8>::steal() };
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! use xmega_core::gpio::PinGroup;
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     let (c, d) = (p.portc.split(), p.portd.split());
    //!     let group = PinGroup::from((c.p0, d.p1));
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use xmega_core::device::Peripherals;
    //! use xmega_core::gpio::GpioPin;
    //! fn main() {
    //!     let p = Peripherals::take().unwrap();
    //!     p.porta.split().p0.enable_interrupt::<2>();
    //! }
    //! ```
    //!
    //! ```compile_fail
    //! use xmega_core::gpio::GpioPin;
    //! struct Rogue;
    //! impl GpioPin for Rogue {
    //!     fn port(&self) -> usize {
    //!         0x1234
    //!     }
    //!     fn number(&self) -> u8 {
    //!         0
    //!     }
    //! }
    //! fn main() {
    //!     Rogue.set_output();
    //! }
    //! ```
}
