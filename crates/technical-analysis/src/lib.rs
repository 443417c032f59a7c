pub mod indicators;
pub mod analyzer;
pub mod chart;

#[cfg(test)]
mod indicators_tests;

pub use indicators::*;
pub use analyzer::*;
pub use chart::*;
