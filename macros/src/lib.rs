//! xmega-core procedural macros.
//!
//! See `xmega-core` documentation for details.

extern crate proc_macro;

mod field_value;

use proc_macro::TokenStream;

/// Implements `xmega_core::reg::FieldValue` for a fieldless enum.
///
/// Every variant maps to its discriminant; reading back a bit pattern that no
/// variant owns yields `None`.
#[proc_macro_derive(FieldValue)]
pub fn derive_field_value(input: TokenStream) -> TokenStream {
    field_value::proc_macro_derive(input)
}
