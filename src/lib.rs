//! Zero-cost register model and blocking peripheral drivers for the AVR
//! XMEGA family.
//!
//! The crate is layered, leaves first:
//!
//! * [`reg`] - register, bitfield and bitfield-array accessors with masked
//!   read-modify-write.
//! * [`map`] - register blocks of the peripherals (offsets, bit layouts, value
//!   enumerations), generic over the instance base address.
//! * [`device`] - base addresses of the selected device variant and the
//!   [`Peripherals`](device::Peripherals) singleton.
//! * [`gpio`] - pins, pin groups and pin roles.
//! * [`drv`] - clock system, UART, SPI, TWI, ADC and LED drivers.
//!
//! Every accessor compiles down to a plain volatile load or store at a
//! constant address. When the crate is built for anything other than AVR, the
//! accessors operate on the [`sim`] memory image instead, which is how the
//! test suite drives the drivers on a host machine.
//!
//! # Usage
//!
//! ```
//! use xmega_core::device::Peripherals;
//! use xmega_core::drv::uart::{Uart, UartConfig};
//! use xmega_core::drv::led::Led;
//!
//! const CPU: u32 = 2_000_000;
//!
//! let p = Peripherals::take().unwrap();
//! let portc = p.portc.split();
//! let serial = Uart::new(p.usartc0, portc.p2, portc.p3);
//! serial.init::<CPU, 9600, true>(UartConfig::default());
//! serial.start();
//!
//! let led = Led::inverted(portc.p0);
//! led.init();
//! led.on();
//! # drop(serial);
//! ```
//!
//! # Device selection
//!
//! Exactly one of the `atxmega256a3u` (default), `atxmega128a4u` or
//! `atxmega128a1u` features selects the table of base addresses in
//! [`device`].

#![warn(missing_docs, unsafe_op_in_unsafe_fn)]
#![no_std]

#[cfg(not(target_arch = "avr"))]
extern crate std;

extern crate self as xmega_core;

#[cfg(not(feature = "device-selected"))]
compile_error!(
    "This crate requires you to specify your target chip as a feature.

    Please select one of the following

    * atxmega256a3u
    * atxmega128a4u
    * atxmega128a1u
    "
);

#[macro_use]
mod log;
#[macro_use]
pub mod reg;

pub mod device;
pub mod drv;
pub mod gpio;
pub mod map;
pub mod prelude;
#[cfg(not(target_arch = "avr"))]
pub mod sim;
pub mod token;

pub use xmega_core_macros::FieldValue;
