//! `klimat-trends` library crate.
//!
//! Emissions trend math behind the Klimatkollen dashboards:
//!
//! - `trends`: approximated extrapolation + Carbon Law projection
//! - `emissions`: change since a company's base year
//! - `math`: least squares and trend regressions
//!
//! The binary (`klimat`) is a thin wrapper so the calculations stay testable
//! without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod emissions;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod trends;
