//! Export projections to CSV or JSON.
//!
//! The CSV is meant for spreadsheets; the JSON mirrors `ProjectedPoint`'s serde
//! shape so charts can consume it directly.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::domain::{ProjectedPoint, RegressionCoefficients};
use crate::error::AppError;

/// Saved projection file (JSON).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionFile<'a> {
    pub tool: &'static str,
    pub as_of_year: i32,
    pub end_year: i32,
    pub base_year: Option<i32>,
    pub coefficients: Option<&'a RegressionCoefficients>,
    pub points: &'a [ProjectedPoint],
}

/// Write projected points as CSV (`year,total,approximated,carbon_law`).
pub fn write_projection_csv(path: &Path, points: &[ProjectedPoint]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_projection_csv_to(file, points)?;
    info!("wrote {} projected years to {}", points.len(), path.display());
    Ok(())
}

/// CSV writer behind [`write_projection_csv`], usable with any sink.
pub fn write_projection_csv_to<W: Write>(sink: W, points: &[ProjectedPoint]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);

    writer
        .write_record(["year", "total", "approximated", "carbon_law"])
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        writer
            .write_record([
                p.year.to_string(),
                fmt_opt(p.total),
                fmt_opt(p.approximated),
                fmt_opt(p.carbon_law),
            ])
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to flush export CSV: {e}")))
}

/// Write a projection plus its run metadata as pretty JSON.
pub fn write_projection_json(path: &Path, projection: &ProjectionFile<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create projection JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, projection)
        .map_err(|e| AppError::usage(format!("Failed to write projection JSON: {e}")))?;

    info!("wrote projection JSON to {}", path.display());
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.4}")).unwrap_or_default()
}
