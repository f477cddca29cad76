//! File ingest: company JSON dumps and yearly series CSVs.
//!
//! Series CSV schema (header names are case-insensitive):
//!
//! ```text
//! year,total
//! 2019,1200.5
//! 2020,
//! 2021,1010
//! ```
//!
//! A blank / `null` / `NA` total means "not reported". Years outside
//! [`PLAUSIBLE_YEARS`] are rejected. Rows that cannot be parsed are skipped and
//! reported as [`RowError`]s; only a missing file, missing columns, or zero
//! usable rows fail the load.

use std::collections::HashMap;
use std::fs::File;
use std::ops::RangeInclusive;
use std::path::Path;

use csv::StringRecord;
use log::warn;

use crate::domain::{Company, TimeSeriesPoint};
use crate::error::AppError;

/// Reporting years accepted from a series CSV.
pub const PLAUSIBLE_YEARS: RangeInclusive<i32> = 1900..=2200;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Parsed series plus skipped rows.
#[derive(Debug, Clone)]
pub struct SeriesIngest {
    /// Points sorted by year, one per year.
    pub points: Vec<TimeSeriesPoint>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a `year,total` CSV into a sorted series.
pub fn load_series_csv(path: &Path) -> Result<SeriesIngest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_series_csv(file)
}

/// Parse a `year,total` CSV from any reader.
pub fn read_series_csv<R: std::io::Read>(reader: R) -> Result<SeriesIngest, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let year_idx = *header_map
        .get("year")
        .ok_or_else(|| AppError::usage("Series CSV is missing a 'year' column."))?;
    let total_idx = ["total", "emissions", "value"]
        .iter()
        .find_map(|name| header_map.get(*name).copied())
        .ok_or_else(|| AppError::usage("Series CSV is missing a 'total' column."))?;

    let mut by_year: HashMap<i32, Option<f64>> = HashMap::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: 1-based lines, plus the header line.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, year_idx, total_idx) {
            Ok((year, total)) => {
                if by_year.insert(year, total).is_some() {
                    row_errors.push(RowError {
                        line,
                        message: format!("duplicate year {year}; later row wins"),
                    });
                }
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    for err in &row_errors {
        warn!("series CSV line {}: {}", err.line, err.message);
    }

    if by_year.is_empty() {
        return Err(AppError::insufficient_data("No valid rows in series CSV."));
    }

    let mut points: Vec<TimeSeriesPoint> = by_year
        .into_iter()
        .map(|(year, total)| TimeSeriesPoint::new(year, total))
        .collect();
    points.sort_by_key(|p| p.year);

    Ok(SeriesIngest {
        points,
        row_errors,
        rows_read,
    })
}

/// Load companies from a JSON file holding either an array or a single company.
pub fn load_companies_json(path: &Path) -> Result<Vec<Company>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open companies JSON '{}': {e}", path.display())))?;
    let value: serde_json::Value = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid companies JSON '{}': {e}", path.display())))?;
    companies_from_value(value)
}

fn companies_from_value(value: serde_json::Value) -> Result<Vec<Company>, AppError> {
    let parsed = if value.is_array() {
        serde_json::from_value::<Vec<Company>>(value)
    } else {
        serde_json::from_value::<Company>(value).map(|c| vec![c])
    };
    parsed.map_err(|e| AppError::usage(format!("Unexpected companies JSON shape: {e}")))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, year_idx: usize, total_idx: usize) -> Result<(i32, Option<f64>), String> {
    let raw_year = record.get(year_idx).unwrap_or("").trim();
    let year: i32 = raw_year
        .parse()
        .map_err(|_| format!("invalid year '{raw_year}'"))?;
    if !PLAUSIBLE_YEARS.contains(&year) {
        return Err(format!(
            "year {year} outside {}..={}",
            PLAUSIBLE_YEARS.start(),
            PLAUSIBLE_YEARS.end()
        ));
    }

    let raw_total = record.get(total_idx).unwrap_or("").trim();
    let total = parse_optional_f64(raw_total).map_err(|_| format!("invalid total '{raw_total}' for {year}"))?;
    Ok((year, total))
}

fn parse_optional_f64(raw: &str) -> Result<Option<f64>, ()> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let v: f64 = raw.replace('_', "").parse().map_err(|_| ())?;
    if v.is_finite() { Ok(Some(v)) } else { Err(()) }
}
