//! Formatted terminal output.
//!
//! Formatting lives here so the calculation modules stay free of presentation
//! concerns.

use crate::domain::{ChangeUnavailable, Company, ProjectedPoint, RegressionCoefficients};
use crate::report::Ranking;

/// Projection table with a short header describing the run.
pub fn format_projection(
    label: &str,
    points: &[ProjectedPoint],
    coefficients: Option<&RegressionCoefficients>,
    as_of_year: i32,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== klimat - emissions projection: {label} ===\n"));
    out.push_str(&format!("As-of year: {as_of_year}\n"));
    match coefficients {
        Some(RegressionCoefficients::Linear { slope, intercept }) => {
            out.push_str(&format!("Trend: linear slope={slope:.4}/yr intercept={intercept:.4}\n"));
        }
        Some(RegressionCoefficients::Exponential { a, b }) => {
            let pct = (b.exp() - 1.0) * 100.0;
            out.push_str(&format!("Trend: exponential a={a:.6e} b={b:.6} ({pct:+.2}%/yr)\n"));
        }
        None => out.push_str("Trend: none (not enough data for a projection)\n"),
    }
    out.push('\n');

    out.push_str(&format!("{:>6} {:>14} {:>14} {:>14}\n", "year", "total", "approximated", "carbon_law"));
    out.push_str(&format!("{:-<6} {:-<14} {:-<14} {:-<14}\n", "", "", "", ""));
    for p in points {
        out.push_str(
            format!(
                "{:>6} {:>14} {:>14} {:>14}\n",
                p.year,
                fmt_opt(p.total),
                fmt_opt(p.approximated),
                fmt_opt(p.carbon_law),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// One line describing a company's base-year change (or why there is none).
pub fn format_change(company: &Company, change: Result<f64, ChangeUnavailable>) -> String {
    let name = display_name(company);
    match (change, company.base_year) {
        (Ok(v), Some(base)) => format!("{name}: {v:+.1}% since {}", base.year),
        (Ok(v), None) => format!("{name}: {v:+.1}%"),
        (Err(reason), _) => format!("{name}: n/a ({reason})"),
    }
}

/// Ranking table plus exclusion summary.
pub fn format_ranking(ranking: &Ranking) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Base-year change ranking ({} of {} companies computable):\n",
        ranking.total - ranking.excluded_count(),
        ranking.total
    ));
    out.push_str(
        format!(
            "{:>4} {:<32} {:<10} {:>6} {:>10} {:>10}",
            "#", "company", "id", "base", "change", "latest"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<4} {:-<32} {:-<10} {:-<6} {:-<10} {:-<10}", "", "", "", "", "", "").trim_end(),
    );
    out.push('\n');

    for (i, r) in ranking.ranked.iter().enumerate() {
        out.push_str(
            format!(
                "{:>4} {:<32} {:<10} {:>6} {:>10} {:>10}",
                i + 1,
                truncate(&r.name, 32),
                truncate(&r.wikidata_id, 10),
                r.base_year,
                format!("{:+.1}%", r.change),
                r.latest_change.map(|v| format!("{v:+.1}%")).unwrap_or_else(|| "-".to_string()),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    if !ranking.excluded.is_empty() {
        out.push_str("\nExcluded:\n");
        for reason in ChangeUnavailable::ALL {
            if let Some(n) = ranking.excluded.get(&reason) {
                out.push_str(&format!("  {n:>5}  {reason}\n"));
            }
        }
    }

    out
}

fn display_name(company: &Company) -> String {
    match (company.name.is_empty(), company.wikidata_id.is_empty()) {
        (false, false) => format!("{} ({})", company.name, company.wikidata_id),
        (false, true) => company.name.clone(),
        (true, false) => company.wikidata_id.clone(),
        (true, true) => "<unnamed>".to_string(),
    }
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BaseYear;
    use crate::report::RankedCompany;

    #[test]
    fn projection_table_marks_missing_values() {
        let points = [ProjectedPoint {
            year: 2024,
            total: None,
            approximated: Some(12.5),
            carbon_law: None,
        }];
        let c = RegressionCoefficients::Linear {
            slope: -1.0,
            intercept: 2036.0,
        };
        let text = format_projection("Test AB", &points, Some(&c), 2024);
        assert!(text.contains("Trend: linear slope=-1.0000/yr"));
        let row: Vec<&str> = text.lines().last().unwrap().split_whitespace().collect();
        assert_eq!(row, vec!["2024", "-", "12.50", "-"]);
    }

    #[test]
    fn change_line_explains_missing_values() {
        let company = Company {
            wikidata_id: "Q9".to_string(),
            name: "Nine AB".to_string(),
            reporting_periods: vec![],
            base_year: Some(BaseYear { year: 2018 }),
        };
        assert_eq!(format_change(&company, Ok(-12.34)), "Nine AB (Q9): -12.3% since 2018");
        assert_eq!(
            format_change(&company, Err(ChangeUnavailable::NoReportingPeriods)),
            "Nine AB (Q9): n/a (no reporting periods)"
        );
    }

    #[test]
    fn ranking_lists_exclusions() {
        let mut ranking = Ranking {
            ranked: vec![RankedCompany {
                wikidata_id: "Q1".to_string(),
                name: "A very long company name that will not fit".to_string(),
                base_year: 2019,
                change: -42.0,
                latest_change: None,
            }],
            total: 3,
            ..Ranking::default()
        };
        ranking.excluded.insert(ChangeUnavailable::SameYear, 2);

        let text = format_ranking(&ranking);
        assert!(text.starts_with("Base-year change ranking (1 of 3 companies computable):"));
        assert!(text.contains("-42.0%"));
        assert!(text.contains("A very long company name that w."));
        assert!(text.contains("      2  latest period is the base year"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Åkerö", 10), "Åkerö");
        assert_eq!(truncate("Östergötland", 5), "Öste.");
    }
}
