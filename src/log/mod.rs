//! Logging support.
//!
//! Drivers report lifecycle events and protocol failures through the
//! crate-internal `trace!`, `debug!` and `warn!` macros. With the `defmt`
//! feature they forward to the corresponding [`defmt`] macros, otherwise they
//! expand to nothing and leave no trace in the binary.
//!
//! Log statements must only use `{}` and `{=..}` placeholders understood by
//! `defmt`, and every argument must be used outside of the log statement too.

#[macro_use]
mod macros;
