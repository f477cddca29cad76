//! Run configuration as understood by the pipeline.
//!
//! These are derived from CLI flags (plus defaults).

use std::path::PathBuf;

use crate::domain::{ChangeOptions, FitKind};

/// Where company records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanySource {
    /// A JSON dump (array of companies, or a single company).
    File(PathBuf),
    /// The Klimatkollen API (`KLIMATKOLLEN_API_URL`).
    Api,
}

/// Where the series to project comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesSource {
    /// A `year,total` CSV.
    Csv(PathBuf),
    /// A company's reporting periods.
    Company { id: String, source: CompanySource },
}

#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    pub series: SeriesSource,
    pub fit: FitKind,
    pub end_year: i32,
    pub as_of_year: i32,
    /// Overrides the company's declared base year (start of the fit window).
    pub base_year: Option<i32>,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ChangeConfig {
    pub source: CompanySource,
    /// Restrict to one company; `None` reports every company.
    pub company: Option<String>,
    pub options: ChangeOptions,
}

#[derive(Debug, Clone)]
pub struct RankConfig {
    pub source: CompanySource,
    pub options: ChangeOptions,
    pub top_n: usize,
}
