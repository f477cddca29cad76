//! Company-level emissions calculations.
//!
//! - base-year change with explicit "not computable" reasons (`base_year`)
//! - reporting periods as yearly series + latest year-over-year change (`series`)

pub mod base_year;
pub mod series;

pub use base_year::*;
pub use series::*;
