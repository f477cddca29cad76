//! Company reporting periods as yearly series.

use std::collections::BTreeMap;

use crate::domain::{Company, ReportingPeriod, TimeSeriesPoint};

/// One point per reporting year, keyed by the calendar year of `end_date`.
///
/// Points come back sorted by year. When two periods end in the same year the
/// earliest-starting one is used, the same period `change_from_base_year` takes as
/// its baseline.
pub fn company_series(company: &Company) -> Vec<TimeSeriesPoint> {
    let mut periods: Vec<&ReportingPeriod> = company.reporting_periods.iter().collect();
    periods.sort_by_key(|p| p.start_date);

    let mut by_year: BTreeMap<i32, Option<f64>> = BTreeMap::new();
    for p in periods {
        by_year.entry(p.year()).or_insert(p.total_emissions());
    }

    by_year
        .into_iter()
        .map(|(year, total)| TimeSeriesPoint::new(year, total))
        .collect()
}

/// Percentage change between the two most recent periods with emissions `> 0`.
///
/// `None` when fewer than two such periods exist.
pub fn latest_period_change(company: &Company) -> Option<f64> {
    let mut valid: Vec<(i32, f64)> = company_series(company)
        .into_iter()
        .filter_map(|p| p.total.filter(|v| v.is_finite() && *v > 0.0).map(|v| (p.year, v)))
        .collect();

    let (_, current) = valid.pop()?;
    let (_, previous) = valid.pop()?;
    Some((current - previous) / previous * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BaseYear, ChangeOptions, Emissions};
    use crate::emissions::change_from_base_year;
    use chrono::NaiveDate;

    fn period(start: (i32, u32), end: (i32, u32), total: Option<f64>) -> ReportingPeriod {
        ReportingPeriod {
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, 28).unwrap(),
            emissions: Some(Emissions {
                calculated_total_emissions: total,
            }),
        }
    }

    fn company(periods: Vec<ReportingPeriod>) -> Company {
        Company {
            wikidata_id: "Q2".to_string(),
            name: "Serie AB".to_string(),
            reporting_periods: periods,
            base_year: None,
        }
    }

    #[test]
    fn series_is_sorted_and_deduplicated_by_year() {
        let c = company(vec![
            period((2022, 1), (2022, 12), Some(80.0)),
            period((2020, 1), (2020, 12), Some(100.0)),
            // Broken fiscal year ending in 2022 and starting earlier: kept.
            period((2021, 5), (2022, 4), Some(85.0)),
            period((2021, 1), (2021, 12), None),
        ]);
        let s = company_series(&c);
        assert_eq!(
            s,
            vec![
                TimeSeriesPoint::new(2020, Some(100.0)),
                TimeSeriesPoint::new(2021, None),
                TimeSeriesPoint::new(2022, Some(85.0)),
            ]
        );
    }

    #[test]
    fn same_year_periods_match_the_base_year_baseline() {
        let mut c = company(vec![
            period((2020, 1), (2020, 12), Some(1000.0)),
            period((2019, 5), (2020, 4), Some(500.0)),
            period((2023, 1), (2023, 12), Some(800.0)),
        ]);
        c.base_year = Some(BaseYear { year: 2020 });

        let series = company_series(&c);
        assert_eq!(series[0], TimeSeriesPoint::new(2020, Some(500.0)));

        let change = change_from_base_year(&c, ChangeOptions::default()).unwrap();
        let baseline = series[0].total.unwrap();
        assert!((change - (800.0 - baseline) / baseline * 100.0).abs() < 1e-12);
        assert!((change - 60.0).abs() < 1e-12);
    }

    #[test]
    fn latest_change_skips_gaps() {
        let c = company(vec![
            period((2020, 1), (2020, 12), Some(100.0)),
            period((2021, 1), (2021, 12), Some(0.0)),
            period((2022, 1), (2022, 12), Some(90.0)),
        ]);
        let change = latest_period_change(&c).unwrap();
        assert!((change + 10.0).abs() < 1e-12);

        let single = company(vec![period((2020, 1), (2020, 12), Some(100.0))]);
        assert_eq!(latest_period_change(&single), None);
    }
}
