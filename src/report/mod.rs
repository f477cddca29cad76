//! Reporting utilities: base-year rankings and formatted terminal output.

pub mod format;

pub use format::*;

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::domain::{ChangeOptions, ChangeUnavailable, Company};
use crate::emissions::{change_from_base_year, latest_period_change};

/// One ranked company.
#[derive(Debug, Clone)]
pub struct RankedCompany {
    pub wikidata_id: String,
    pub name: String,
    pub base_year: i32,
    /// Percent change since the base year.
    pub change: f64,
    /// Percent change between the two latest reported years, if known.
    pub latest_change: Option<f64>,
}

/// Companies ordered by base-year change plus a tally of the ones left out.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Largest reduction first.
    pub ranked: Vec<RankedCompany>,
    pub excluded: BTreeMap<ChangeUnavailable, usize>,
    pub total: usize,
}

impl Ranking {
    pub fn excluded_count(&self) -> usize {
        self.excluded.values().sum()
    }
}

/// Rank companies by base-year change (ascending), keeping the top `top_n`.
///
/// `top_n = 0` keeps every ranked company.
pub fn rank_by_base_year_change(companies: &[Company], options: ChangeOptions, top_n: usize) -> Ranking {
    let results: Vec<Result<RankedCompany, ChangeUnavailable>> = companies
        .par_iter()
        .map(|c| -> Result<RankedCompany, ChangeUnavailable> {
            let change = change_from_base_year(c, options)?;
            // `change_from_base_year` already required a base year.
            let base_year = c.base_year.map(|b| b.year).ok_or(ChangeUnavailable::NoBaseYear)?;
            Ok(RankedCompany {
                wikidata_id: c.wikidata_id.clone(),
                name: c.name.clone(),
                base_year,
                change,
                latest_change: latest_period_change(c),
            })
        })
        .collect();

    let mut ranking = Ranking {
        total: companies.len(),
        ..Ranking::default()
    };
    for r in results {
        match r {
            Ok(rc) => ranking.ranked.push(rc),
            Err(reason) => *ranking.excluded.entry(reason).or_insert(0) += 1,
        }
    }

    ranking.ranked.sort_by(|a, b| {
        a.change
            .total_cmp(&b.change)
            .then_with(|| a.name.cmp(&b.name))
    });
    if top_n > 0 {
        ranking.ranked.truncate(top_n);
    }
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BaseYear, Emissions, ReportingPeriod};
    use chrono::NaiveDate;

    fn company(id: &str, base: Option<i32>, totals: &[(i32, f64)]) -> Company {
        Company {
            wikidata_id: id.to_string(),
            name: format!("Company {id}"),
            base_year: base.map(|year| BaseYear { year }),
            reporting_periods: totals
                .iter()
                .map(|&(year, total)| ReportingPeriod {
                    start_date: NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
                    emissions: Some(Emissions {
                        calculated_total_emissions: Some(total),
                    }),
                })
                .collect(),
        }
    }

    #[test]
    fn ranks_largest_reduction_first_and_tallies_exclusions() {
        let companies = vec![
            company("Q1", Some(2019), &[(2019, 100.0), (2023, 90.0)]),
            company("Q2", Some(2019), &[(2019, 100.0), (2022, 70.0), (2023, 50.0)]),
            company("Q3", None, &[(2019, 100.0), (2023, 90.0)]),
            company("Q4", Some(2019), &[(2019, 10.0), (2023, 50.0)]),
        ];

        let ranking = rank_by_base_year_change(&companies, ChangeOptions::default(), 0);
        let ids: Vec<&str> = ranking.ranked.iter().map(|r| r.wikidata_id.as_str()).collect();
        assert_eq!(ids, vec!["Q2", "Q1"]);
        assert_eq!(ranking.total, 4);
        assert_eq!(ranking.excluded_count(), 2);
        assert_eq!(ranking.excluded.get(&ChangeUnavailable::NoBaseYear), Some(&1));
        assert_eq!(ranking.excluded.get(&ChangeUnavailable::OutlierFiltered), Some(&1));

        let q2 = &ranking.ranked[0];
        assert!((q2.change + 50.0).abs() < 1e-12);
        let latest = q2.latest_change.unwrap();
        assert!((latest + 28.571428571428573).abs() < 1e-9);
    }

    #[test]
    fn top_n_truncates() {
        let companies = vec![
            company("Q1", Some(2019), &[(2019, 100.0), (2023, 90.0)]),
            company("Q2", Some(2019), &[(2019, 100.0), (2023, 80.0)]),
        ];
        let ranking = rank_by_base_year_change(&companies, ChangeOptions::default(), 1);
        assert_eq!(ranking.ranked.len(), 1);
        assert_eq!(ranking.ranked[0].wikidata_id, "Q2");
    }
}
