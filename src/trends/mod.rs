//! Emissions trend projection.
//!
//! The projector itself is pure: the as-of year is always passed in. Front-ends
//! that want "today" call [`current_year`] once and thread the value through.

pub mod projection;

pub use projection::*;

use chrono::{Datelike, Local};

/// Calendar year of the local clock.
pub fn current_year() -> i32 {
    Local::now().year()
}
