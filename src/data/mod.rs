//! Remote data sources.

pub mod api;

pub use api::*;
