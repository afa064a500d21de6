//! This crate provides approximate quantiles over data streams in a moderate
//! amount of memory.
//!
//! Order statistics is a rough business. Exact solutions are expensive in
//! terms of memory and computation. This crate implements the biased-quantile
//! summary of Cormode, Korn, Muthukrishnan and Srivastava, in which the
//! caller chooses where on the rank domain the error budget is spent: low
//! quantiles, high quantiles or everywhere equally. Space consumption stays
//! well below the stream length for any fixed error tolerance.
#![deny(
    missing_docs,
    missing_copy_implementations,
    missing_debug_implementations,
    unstable_features,
    unused_import_braces
)]

pub mod ckms;
pub mod util;

/// Errors raised when configuring a summary.
///
/// Configuration is validated once, at construction. A summary that
/// constructs successfully cannot fail at insert or query time.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The error tolerance ε must lie in `(0.0, 0.5)`. Anything at or above
    /// `0.5` would drive the compression period `floor(1/(2ε))` to zero.
    #[error("epsilon {0} out of range, must lie in (0.0, 0.5)")]
    InvalidEpsilon(f64),
}
