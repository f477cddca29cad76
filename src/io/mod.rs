//! Input/output helpers.
//!
//! - series CSV + companies JSON ingest (`ingest`)
//! - projection exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
