#![warn(missing_docs)]
//! A solver for the Van Westendorp price sensitivity meter.
//!
//! Survey respondents name four prices: the price at which a product is
//! "too expensive", "expensive", "cheap" and "too cheap". Each answer set
//! induces a cumulative percentage curve over price, and the characteristic
//! price points of the survey are the places where pairs of these curves cross.
//!
//! The entry point is [`Survey::analyze`], which computes all four
//! [`PricePoint`]s over a [`PriceGrid`] that covers every observed answer.

/**
 * These are the core data types the analysis operates on.
 */
mod types;
pub use types::*;

/// The ordered map used for analysis results.
///
/// We use non-std collections here for their ordering semantics and performance
pub type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
