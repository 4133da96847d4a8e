//! Dashboard rendering and report file generation.

pub mod generator;

pub use generator::*;
