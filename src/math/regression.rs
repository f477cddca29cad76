//! Trend regressions over yearly emissions series.
//!
//! Two families are supported:
//!
//! - linear: `total = intercept + slope * year`
//! - exponential: `total = a * exp(b * year)`, fitted as the log-linear model
//!   `ln(total) = ln(a) + b * year`
//!
//! Years are centered before solving so the design matrix stays well conditioned
//! (raw calendar years around 2000 dwarf the intercept column).

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::domain::{FitKind, RegressionCoefficients, TimeSeriesPoint};
use crate::math::solve_least_squares;

/// Minimum number of usable observations for a trend fit.
pub const MIN_FIT_POINTS: usize = 2;

/// Fit a straight line through every point with a finite total.
pub fn fit_linear(points: &[TimeSeriesPoint]) -> Option<RegressionCoefficients> {
    let obs: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| match p.total {
            Some(v) if v.is_finite() => Some((p.year as f64, v)),
            _ => None,
        })
        .collect();

    let (center, beta) = centered_fit(&obs)?;
    let slope = beta[1];
    let intercept = beta[0] - slope * center;

    finite(RegressionCoefficients::Linear { slope, intercept })
}

/// Fit an exponential curve through every point with a strictly positive total.
pub fn fit_exponential(points: &[TimeSeriesPoint]) -> Option<RegressionCoefficients> {
    let obs: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| match p.total {
            Some(v) if v.is_finite() && v > 0.0 => Some((p.year as f64, v.ln())),
            _ => None,
        })
        .collect();

    let (center, beta) = centered_fit(&obs)?;
    let b = beta[1];
    let a = (beta[0] - b * center).exp();

    finite(RegressionCoefficients::Exponential { a, b })
}

/// Fit the requested family, optionally starting the window at `base_year`.
///
/// Returns `None` when fewer than [`MIN_FIT_POINTS`] usable observations remain.
pub fn fit_coefficients(
    series: &[TimeSeriesPoint],
    kind: FitKind,
    base_year: Option<i32>,
) -> Option<RegressionCoefficients> {
    let window: Vec<TimeSeriesPoint> = match base_year {
        Some(start) => series.iter().copied().filter(|p| p.year >= start).collect(),
        None => series.to_vec(),
    };

    let fit = match kind {
        FitKind::Linear => fit_linear(&window),
        FitKind::Exponential => fit_exponential(&window),
    };

    if fit.is_none() {
        debug!(
            "no {kind:?} fit: {} points in window (base year {base_year:?})",
            window.len()
        );
    }
    fit
}

/// Solve `y = β0 + β1 * (x - center)`; returns `(center, β)`.
fn centered_fit(obs: &[(f64, f64)]) -> Option<(f64, DVector<f64>)> {
    if obs.len() < MIN_FIT_POINTS {
        return None;
    }

    let n = obs.len();
    let center = obs.iter().map(|(x, _)| x).sum::<f64>() / n as f64;

    let x = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { obs[i].0 - center });
    let y = DVector::from_iterator(n, obs.iter().map(|(_, v)| *v));

    let beta = solve_least_squares(&x, &y)?;
    Some((center, beta))
}

fn finite(c: RegressionCoefficients) -> Option<RegressionCoefficients> {
    let ok = match c {
        RegressionCoefficients::Linear { slope, intercept } => slope.is_finite() && intercept.is_finite(),
        RegressionCoefficients::Exponential { a, b } => a.is_finite() && b.is_finite(),
    };
    ok.then_some(c)
}
