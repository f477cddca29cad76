//! Trend projection: historical totals, short-term extrapolation and the Carbon Law path.
//!
//! For every year from the first observation to `end_year` the projector emits a
//! [`ProjectedPoint`]:
//!
//! - `total`: the reported value, passed through.
//! - `approximated`: from the last reported year up to the as-of year, the last
//!   reported value extrapolated along the regression trend.
//! - `carbon_law`: from the as-of year onward, a fixed-rate decay starting at the
//!   as-of year's (actual or extrapolated) value.
//!
//! Extrapolation rules:
//! - linear: `last + slope * Δ`, floored at 0
//! - exponential: `last * exp(b * Δ)`, clamped to
//!   `[EXPONENTIAL_MIN, EXPONENTIAL_MAX]` so steep fits cannot run away
//!
//! Missing data never errors; it shows up as `None` fields.

use std::collections::HashMap;

use crate::domain::{ProjectedPoint, RegressionCoefficients, TimeSeriesPoint};

/// Annual reduction rate of the Carbon Law trajectory.
pub const CARBON_LAW_REDUCTION_RATE: f64 = 0.1172;

/// Lower clamp for exponential extrapolation.
pub const EXPONENTIAL_MIN: f64 = 0.1;

/// Upper clamp for exponential extrapolation.
pub const EXPONENTIAL_MAX: f64 = 1_000_000.0;

/// Project a yearly series forward to `end_year`.
///
/// `as_of_year` plays the role of "the current year": approximations stop there
/// and the Carbon Law path starts there. `_base_year` is accepted for callers that
/// track it alongside the series; it does not change the output shape.
///
/// Year differences are taken in `i64`, so extreme years cannot overflow. The
/// output holds one point per year, so callers bound `end_year - series[0].year`.
///
/// Returns an empty vec for an empty series.
pub fn project(
    series: &[TimeSeriesPoint],
    coefficients: Option<&RegressionCoefficients>,
    end_year: i32,
    _base_year: Option<i32>,
    as_of_year: i32,
) -> Vec<ProjectedPoint> {
    let Some(first_year) = series.first().map(|p| p.year) else {
        return Vec::new();
    };

    let actuals: HashMap<i32, f64> = series
        .iter()
        .filter_map(|p| p.total.map(|v| (p.year, v)))
        .collect();

    // (year, value) of the most recent reported observation.
    let last = actuals
        .iter()
        .max_by_key(|(year, _)| **year)
        .map(|(year, value)| (*year, *value));

    let carbon_law_base = match (last, coefficients) {
        (Some((last_year, last_value)), Some(c)) => match actuals.get(&as_of_year) {
            Some(v) => Some(*v),
            None => Some(extrapolate(c, last_value, i64::from(as_of_year) - i64::from(last_year))),
        },
        _ => None,
    };

    (first_year..=end_year)
        .map(|year| {
            let approximated = match (last, coefficients) {
                (Some((last_year, last_value)), Some(c)) if year >= last_year && year <= as_of_year => {
                    Some(extrapolate(c, last_value, i64::from(year) - i64::from(last_year)))
                }
                _ => None,
            };

            let carbon_law = match carbon_law_base {
                Some(base) if year >= as_of_year => {
                    carbon_law_value(base, i64::from(year) - i64::from(as_of_year))
                }
                _ => None,
            };

            ProjectedPoint {
                year,
                total: actuals.get(&year).copied(),
                approximated,
                carbon_law,
            }
        })
        .collect()
}

/// Extrapolate `last_value` forward by `years_ahead` along the trend.
///
/// `years_ahead == 0` returns `last_value` unchanged.
pub fn extrapolate(coefficients: &RegressionCoefficients, last_value: f64, years_ahead: i64) -> f64 {
    if years_ahead == 0 {
        return last_value;
    }
    let dt = years_ahead as f64;
    match *coefficients {
        RegressionCoefficients::Linear { slope, .. } => (last_value + slope * dt).max(0.0),
        RegressionCoefficients::Exponential { b, .. } => {
            let v = last_value * (b * dt).exp();
            if v.is_nan() {
                EXPONENTIAL_MIN
            } else {
                v.clamp(EXPONENTIAL_MIN, EXPONENTIAL_MAX)
            }
        }
    }
}

/// Carbon Law value `years_after` years past the start, or `None` if not positive.
pub fn carbon_law_value(base: f64, years_after: i64) -> Option<f64> {
    let v = base * (1.0 - CARBON_LAW_REDUCTION_RATE).powf(years_after as f64);
    (v.is_finite() && v > 0.0).then_some(v)
}
