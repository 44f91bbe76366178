#![no_std]
#![warn(clippy::all)]

//! Parameter coding core of a SILK-class speech codec.
//!
//! The crate converts between entropy-coded side information and the
//! quantised LPC, LTP, pitch and gain parameters that drive SILK synthesis.
//! Everything lives under [`silk`]; the entropy coder itself is supplied by
//! the caller through [`silk::entropy::SymbolDecoder`] and
//! [`silk::entropy::SymbolEncoder`].

extern crate alloc;

pub mod silk;

pub use silk::errors::{Result, SilkError};
