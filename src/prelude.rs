//! The xmega-core prelude.
//!
//! Brings the traits whose methods drivers and pins are used through into
//! scope:
//!
//! ```
//! use xmega_core::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::{gpio::GpioPin, reg::FieldValue, token::Token};
