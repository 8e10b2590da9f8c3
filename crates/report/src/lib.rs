//! Summary digest for the product metrics engine.
//!
//! Consumes engine outputs only; the arithmetic here is limited to counts,
//! ratios and unweighted means of per-group rates.

pub mod summary;

pub use summary::{format_count, mean, SummaryReport};
