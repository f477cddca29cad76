//! Percentage change in total emissions since a company's declared base year.
//!
//! The calculation fails closed: every data-quality problem maps to a
//! [`ChangeUnavailable`] reason instead of a number.
//!
//! Rules:
//! 1. The baseline is the period whose `end_date` falls in the base year.
//! 2. Baseline emissions must be finite and strictly positive.
//! 3. The latest period is either the chronologically last one
//!    (`use_last_period`), or the most recent one with emissions `> 0`, so gaps
//!    in reporting do not read as a 100% drop.
//! 4. A latest period in the base year itself carries no change.
//! 5. Changes beyond `±OUTLIER_THRESHOLD_PERCENT` are treated as restatements or
//!    scope changes rather than real reductions.

use log::trace;

use crate::domain::{ChangeOptions, ChangeUnavailable, Company, ReportingPeriod};

/// Largest absolute change (in percent) accepted as a real signal.
pub const OUTLIER_THRESHOLD_PERCENT: f64 = 200.0;

/// Percentage change from the base-year period to the latest valid period.
pub fn change_from_base_year(company: &Company, options: ChangeOptions) -> Result<f64, ChangeUnavailable> {
    if company.reporting_periods.is_empty() {
        return Err(ChangeUnavailable::NoReportingPeriods);
    }
    let base_year = company.base_year.ok_or(ChangeUnavailable::NoBaseYear)?.year;

    let mut periods: Vec<&ReportingPeriod> = company.reporting_periods.iter().collect();
    periods.sort_by_key(|p| p.start_date);

    let baseline_period = periods
        .iter()
        .find(|p| p.year() == base_year)
        .ok_or(ChangeUnavailable::BaselineNotFound)?;

    let baseline = baseline_period
        .total_emissions()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or(ChangeUnavailable::BaselineInvalid)?;

    let latest_period = if options.use_last_period {
        periods
            .last()
            .and_then(|p| p.total_emissions().filter(|v| v.is_finite()).map(|v| (p.year(), v)))
    } else {
        periods
            .iter()
            .rev()
            .find_map(|p| p.total_emissions().filter(|v| v.is_finite() && *v > 0.0).map(|v| (p.year(), v)))
    };
    let (latest_year, latest) = latest_period.ok_or(ChangeUnavailable::NoLatestPeriod)?;

    if latest_year == base_year {
        return Err(ChangeUnavailable::SameYear);
    }

    let change = (latest - baseline) / baseline * 100.0;
    trace!(
        "{}: base {base_year}={baseline}, latest {latest_year}={latest}, change {change:.2}%",
        company.name
    );

    if change.abs() > OUTLIER_THRESHOLD_PERCENT {
        return Err(ChangeUnavailable::OutlierFiltered);
    }

    Ok(change)
}

/// [`change_from_base_year`] with the reason discarded.
pub fn base_year_change(company: &Company, options: ChangeOptions) -> Option<f64> {
    change_from_base_year(company, options).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BaseYear, Emissions};
    use chrono::NaiveDate;

    fn period(year: i32, total: Option<f64>) -> ReportingPeriod {
        ReportingPeriod {
            start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
            emissions: Some(Emissions {
                calculated_total_emissions: total,
            }),
        }
    }

    fn company(base_year: Option<i32>, periods: Vec<ReportingPeriod>) -> Company {
        Company {
            wikidata_id: "Q1".to_string(),
            name: "Test AB".to_string(),
            reporting_periods: periods,
            base_year: base_year.map(|year| BaseYear { year }),
        }
    }

    #[test]
    fn twenty_percent_reduction() {
        let c = company(Some(2020), vec![period(2020, Some(1000.0)), period(2023, Some(800.0))]);
        let change = change_from_base_year(&c, ChangeOptions::default()).unwrap();
        assert!((change + 20.0).abs() < 1e-12);
    }

    #[test]
    fn periods_are_sorted_before_selection() {
        let c = company(
            Some(2020),
            vec![period(2022, Some(900.0)), period(2020, Some(1000.0)), period(2021, Some(950.0))],
        );
        let change = change_from_base_year(&c, ChangeOptions::default()).unwrap();
        assert!((change + 10.0).abs() < 1e-12);
    }

    #[test]
    fn missing_inputs_fail_closed() {
        let no_periods = company(Some(2020), vec![]);
        assert_eq!(
            change_from_base_year(&no_periods, ChangeOptions::default()),
            Err(ChangeUnavailable::NoReportingPeriods)
        );

        let no_base = company(None, vec![period(2020, Some(10.0)), period(2021, Some(9.0))]);
        assert_eq!(
            change_from_base_year(&no_base, ChangeOptions::default()),
            Err(ChangeUnavailable::NoBaseYear)
        );

        let not_found = company(Some(2015), vec![period(2020, Some(10.0)), period(2021, Some(9.0))]);
        assert_eq!(
            change_from_base_year(&not_found, ChangeOptions::default()),
            Err(ChangeUnavailable::BaselineNotFound)
        );
    }

    #[test]
    fn zero_or_missing_baseline_is_invalid() {
        for baseline in [Some(0.0), None, Some(f64::NAN), Some(-3.0)] {
            let c = company(Some(2020), vec![period(2020, baseline), period(2022, Some(10.0))]);
            assert_eq!(
                change_from_base_year(&c, ChangeOptions::default()),
                Err(ChangeUnavailable::BaselineInvalid)
            );
        }

        let mut no_block = period(2020, None);
        no_block.emissions = None;
        let c = company(Some(2020), vec![no_block, period(2022, Some(10.0))]);
        assert_eq!(base_year_change(&c, ChangeOptions::default()), None);
    }

    #[test]
    fn zero_latest_walks_back_to_base_year() {
        let c = company(Some(2020), vec![period(2020, Some(1000.0)), period(2023, Some(0.0))]);
        assert_eq!(
            change_from_base_year(&c, ChangeOptions::default()),
            Err(ChangeUnavailable::SameYear)
        );
    }

    #[test]
    fn zero_latest_skips_to_previous_valid_period() {
        let c = company(
            Some(2020),
            vec![period(2020, Some(1000.0)), period(2022, Some(700.0)), period(2023, None)],
        );
        let change = change_from_base_year(&c, ChangeOptions::default()).unwrap();
        assert!((change + 30.0).abs() < 1e-12);
    }

    #[test]
    fn use_last_period_takes_the_last_value_as_is() {
        let c = company(
            Some(2020),
            vec![period(2020, Some(1000.0)), period(2022, Some(700.0)), period(2023, Some(0.0))],
        );
        let opts = ChangeOptions { use_last_period: true };
        assert_eq!(change_from_base_year(&c, opts), Ok(-100.0));

        let missing = company(Some(2020), vec![period(2020, Some(1000.0)), period(2023, None)]);
        assert_eq!(change_from_base_year(&missing, opts), Err(ChangeUnavailable::NoLatestPeriod));
    }

    #[test]
    fn outliers_are_filtered() {
        let c = company(Some(2020), vec![period(2020, Some(10.0)), period(2023, Some(40.0))]);
        assert_eq!(
            change_from_base_year(&c, ChangeOptions::default()),
            Err(ChangeUnavailable::OutlierFiltered)
        );

        // Exactly at the threshold is kept.
        let edge = company(Some(2020), vec![period(2020, Some(10.0)), period(2023, Some(30.0))]);
        assert_eq!(change_from_base_year(&edge, ChangeOptions::default()), Ok(200.0));
    }
}
