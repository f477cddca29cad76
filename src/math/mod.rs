//! Mathematical utilities: least squares and trend regressions.

pub mod ols;
pub mod regression;

pub use ols::*;
pub use regression::*;
