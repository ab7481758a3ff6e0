//! Blocking peripheral drivers.
//!
//! A driver owns its peripheral token and pins, applies the pin roles in
//! `init`, and hands everything back with `free`. Clock frequencies and baud
//! rates are const generics, so settings are computed and range checked at
//! compile time.

pub mod adc;
pub mod clk;
pub mod led;
pub mod spi;
pub mod twi;
pub mod uart;
