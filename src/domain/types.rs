//! Shared domain types.
//!
//! These types mirror the JSON shapes returned by the Klimatkollen API (hence the
//! camelCase serde renames) so API responses and saved files deserialize straight
//! into them. Everything here is read-only input or transient output: nothing is
//! mutated in place by the calculations.

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One yearly emissions observation.
///
/// `total = None` means nothing was reported for that year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub year: i32,
    #[serde(default)]
    pub total: Option<f64>,
}

impl TimeSeriesPoint {
    pub fn new(year: i32, total: Option<f64>) -> Self {
        Self { year, total }
    }
}

/// Emissions block of a reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Emissions {
    #[serde(default)]
    pub calculated_total_emissions: Option<f64>,
}

/// A company's disclosed reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub emissions: Option<Emissions>,
}

impl ReportingPeriod {
    /// Reporting year, taken as the calendar year of `end_date`.
    pub fn year(&self) -> i32 {
        self.end_date.year()
    }

    /// Total emissions, if any were reported.
    pub fn total_emissions(&self) -> Option<f64> {
        self.emissions.and_then(|e| e.calculated_total_emissions)
    }
}

/// A company-declared reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseYear {
    pub year: i32,
}

/// The subset of a company record the calculations need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub wikidata_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reporting_periods: Vec<ReportingPeriod>,
    #[serde(default)]
    pub base_year: Option<BaseYear>,
}

/// Regression coefficients describing a series' trend.
///
/// - `Linear`: `total(year) = intercept + slope * year`
/// - `Exponential`: `total(year) = a * exp(b * year)`; `b` is the continuous
///   growth rate per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RegressionCoefficients {
    Linear { slope: f64, intercept: f64 },
    Exponential { a: f64, b: f64 },
}

impl RegressionCoefficients {
    pub fn kind(&self) -> FitKind {
        match self {
            RegressionCoefficients::Linear { .. } => FitKind::Linear,
            RegressionCoefficients::Exponential { .. } => FitKind::Exponential,
        }
    }
}

/// Which regression family to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FitKind {
    Linear,
    Exponential,
}

/// One year of projection output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPoint {
    pub year: i32,
    /// Reported value, passed through unchanged.
    pub total: Option<f64>,
    /// Extrapolation from the last reported year up to the as-of year.
    pub approximated: Option<f64>,
    /// Carbon Law reduction path from the as-of year onward.
    pub carbon_law: Option<f64>,
}

/// Why a base-year change could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeUnavailable {
    /// The company has no reporting periods.
    NoReportingPeriods,
    /// The company has not declared a base year.
    NoBaseYear,
    /// No reporting period ends in the base year.
    BaselineNotFound,
    /// Baseline emissions are missing, zero, negative or non-finite.
    BaselineInvalid,
    /// No later period with usable emissions.
    NoLatestPeriod,
    /// The latest usable period is the base year itself.
    SameYear,
    /// The change exceeded the outlier threshold.
    OutlierFiltered,
}

impl ChangeUnavailable {
    pub const ALL: [ChangeUnavailable; 7] = [
        ChangeUnavailable::NoReportingPeriods,
        ChangeUnavailable::NoBaseYear,
        ChangeUnavailable::BaselineNotFound,
        ChangeUnavailable::BaselineInvalid,
        ChangeUnavailable::NoLatestPeriod,
        ChangeUnavailable::SameYear,
        ChangeUnavailable::OutlierFiltered,
    ];

    /// Short label for terminal output.
    pub fn label(self) -> &'static str {
        match self {
            ChangeUnavailable::NoReportingPeriods => "no reporting periods",
            ChangeUnavailable::NoBaseYear => "no base year",
            ChangeUnavailable::BaselineNotFound => "no period in base year",
            ChangeUnavailable::BaselineInvalid => "invalid baseline emissions",
            ChangeUnavailable::NoLatestPeriod => "no later emissions",
            ChangeUnavailable::SameYear => "latest period is the base year",
            ChangeUnavailable::OutlierFiltered => "outlier (>200%)",
        }
    }
}

impl std::fmt::Display for ChangeUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::error::Error for ChangeUnavailable {}

/// Options for `change_from_base_year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeOptions {
    /// Use the chronologically last period even if it has no (or zero) emissions.
    pub use_last_period: bool,
}
