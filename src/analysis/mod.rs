//! Session result analysis.
//!
//! Home of the results aggregator, the one pure computation between the
//! provider and the presentation layer.

pub mod aggregator;

pub use aggregator::*;
