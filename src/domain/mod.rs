//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - API-shaped inputs (`Company`, `ReportingPeriod`, `TimeSeriesPoint`)
//! - trend coefficients (`RegressionCoefficients`, `FitKind`)
//! - calculation outputs (`ProjectedPoint`, `ChangeUnavailable`)
//! - run configuration (`ProjectionConfig`, `ChangeConfig`, `RankConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
