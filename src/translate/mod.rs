//! Decoding DNA into domain values.
//!
//! A [`Translator`] turns a gene's raw symbols into the value it encodes
//! (a number, a parameter, anything the caller scores). Keeping decoding
//! separate from the genome lets the same chromosome layout be read
//! different ways.
//!
//! # Built-in translators
//!
//! - [`BinaryIntTranslator`]: binary DNA as an unsigned integer
//! - [`BinaryFloatTranslator`]: binary DNA as `significand * 10^exponent`
//! - [`DecimalIntTranslator`]: decimal DNA as an unsigned integer
//!
//! [`TranslatedFitness`] bridges a translator and a scoring closure into a
//! [`FitnessFn`](crate::ga::FitnessFn).

mod translators;
mod types;

pub use translators::{BinaryFloatTranslator, BinaryIntTranslator, DecimalIntTranslator};
pub use types::{TranslatedFitness, Translator};
