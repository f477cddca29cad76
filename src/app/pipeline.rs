//! Shared pipeline logic behind the CLI commands.
//!
//! load companies / series -> fit trend -> project / compare -> outputs
//!
//! Front-ends only format what these functions return.

use log::{debug, info};

use crate::data::KlimatkollenClient;
use crate::domain::{
    ChangeConfig, ChangeUnavailable, Company, CompanySource, ProjectedPoint, ProjectionConfig, RankConfig,
    RegressionCoefficients, SeriesSource, TimeSeriesPoint,
};
use crate::emissions::{change_from_base_year, company_series};
use crate::error::AppError;
use crate::io::ingest::{load_companies_json, load_series_csv};
use crate::math::fit_coefficients;
use crate::report::{Ranking, rank_by_base_year_change};
use crate::trends::project;

/// Longest projection (in years, first reported year to end year) a run accepts.
pub const MAX_PROJECTION_SPAN: i64 = 500;

/// All computed outputs of a single projection run.
#[derive(Debug, Clone)]
pub struct ProjectionRun {
    pub label: String,
    pub series: Vec<TimeSeriesPoint>,
    pub base_year: Option<i32>,
    pub coefficients: Option<RegressionCoefficients>,
    pub points: Vec<ProjectedPoint>,
}

/// Load, fit and project the configured series.
pub fn run_projection(config: &ProjectionConfig) -> Result<ProjectionRun, AppError> {
    let (label, series, company_base_year) = match &config.series {
        SeriesSource::Csv(path) => {
            let ingest = load_series_csv(path)?;
            info!(
                "read {} rows from {} ({} skipped)",
                ingest.rows_read,
                path.display(),
                ingest.row_errors.len()
            );
            (path.display().to_string(), ingest.points, None)
        }
        SeriesSource::Company { id, source } => {
            let company = load_company(source, id)?;
            let label = if company.name.is_empty() {
                id.clone()
            } else {
                company.name.clone()
            };
            let base_year = company.base_year.map(|b| b.year);
            (label, company_series(&company), base_year)
        }
    };

    project_series(label, series, config.base_year.or(company_base_year), config)
}

/// Fit and project an already-loaded series.
pub fn project_series(
    label: String,
    series: Vec<TimeSeriesPoint>,
    base_year: Option<i32>,
    config: &ProjectionConfig,
) -> Result<ProjectionRun, AppError> {
    if series.is_empty() {
        return Err(AppError::insufficient_data(format!("{label}: no reported years to project.")));
    }
    if config.end_year < series[0].year {
        return Err(AppError::usage(format!(
            "End year {} is before the first reported year {}.",
            config.end_year, series[0].year
        )));
    }
    let span = i64::from(config.end_year) - i64::from(series[0].year);
    if span > MAX_PROJECTION_SPAN {
        return Err(AppError::usage(format!(
            "Projection from {} to {} spans {span} years (max {MAX_PROJECTION_SPAN}).",
            series[0].year, config.end_year
        )));
    }

    let coefficients = fit_coefficients(&series, config.fit, base_year);
    if coefficients.is_none() {
        debug!("{label}: projecting without a trend");
    }

    let points = project(
        &series,
        coefficients.as_ref(),
        config.end_year,
        base_year,
        config.as_of_year,
    );

    Ok(ProjectionRun {
        label,
        series,
        base_year,
        coefficients,
        points,
    })
}

/// Base-year change per company (all, or the one requested).
pub fn run_change(config: &ChangeConfig) -> Result<Vec<(Company, Result<f64, ChangeUnavailable>)>, AppError> {
    let companies = match &config.company {
        Some(id) => vec![load_company(&config.source, id)?],
        None => load_companies(&config.source)?,
    };

    Ok(companies
        .into_iter()
        .map(|c| {
            let change = change_from_base_year(&c, config.options);
            (c, change)
        })
        .collect())
}

/// Rank every company by base-year change.
pub fn run_rank(config: &RankConfig) -> Result<Ranking, AppError> {
    let companies = load_companies(&config.source)?;
    if companies.is_empty() {
        return Err(AppError::insufficient_data("No companies to rank."));
    }
    Ok(rank_by_base_year_change(&companies, config.options, config.top_n))
}

pub fn load_companies(source: &CompanySource) -> Result<Vec<Company>, AppError> {
    match source {
        CompanySource::File(path) => {
            let companies = load_companies_json(path)?;
            info!("loaded {} companies from {}", companies.len(), path.display());
            Ok(companies)
        }
        CompanySource::Api => KlimatkollenClient::from_env()?.fetch_companies(),
    }
}

/// Look up one company by Wikidata id.
pub fn load_company(source: &CompanySource, id: &str) -> Result<Company, AppError> {
    match source {
        CompanySource::File(_) => load_companies(source)?
            .into_iter()
            .find(|c| c.wikidata_id.eq_ignore_ascii_case(id))
            .ok_or_else(|| AppError::usage(format!("Company '{id}' not found."))),
        CompanySource::Api => KlimatkollenClient::from_env()?.fetch_company(id),
    }
}
