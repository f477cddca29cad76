//! Command-line parsing for the emissions trend tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! calculation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::FitKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "klimat", version, about = "Emissions trend projections and base-year changes (Klimatkollen data)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Project a yearly series: approximated trend up to the as-of year, Carbon Law path after.
    Project(ProjectArgs),
    /// Print the change in emissions since each company's base year.
    Change(ChangeArgs),
    /// Rank companies by change since their base year.
    Rank(RankArgs),
}

/// Where to read companies from (defaults to the API).
#[derive(Debug, Args, Clone)]
pub struct CompanySourceArgs {
    /// Companies JSON file (API dump). When omitted, the Klimatkollen API is used.
    #[arg(long, value_name = "JSON")]
    pub companies: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ProjectArgs {
    /// Series CSV with `year,total` columns.
    #[arg(long, value_name = "CSV", conflicts_with = "company", required_unless_present = "company")]
    pub series: Option<PathBuf>,

    /// Company Wikidata id whose reporting periods form the series.
    #[arg(long, value_name = "ID")]
    pub company: Option<String>,

    #[command(flatten)]
    pub source: CompanySourceArgs,

    /// Regression family used for the trend.
    #[arg(long, value_enum, default_value_t = FitKind::Linear)]
    pub fit: FitKind,

    /// Last projected year.
    #[arg(long, default_value_t = 2050)]
    pub end_year: i32,

    /// Year treated as "now" (defaults to the current calendar year).
    #[arg(long)]
    pub as_of: Option<i32>,

    /// First year of the regression window (defaults to the company's base year).
    #[arg(long)]
    pub base_year: Option<i32>,

    /// Export the projection to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the projection (with run metadata) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct ChangeArgs {
    /// Only report this company (Wikidata id); all companies otherwise.
    #[arg(long, value_name = "ID")]
    pub company: Option<String>,

    #[command(flatten)]
    pub source: CompanySourceArgs,

    /// Compare against the last reporting period even if it has no emissions.
    #[arg(long)]
    pub use_last_period: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct RankArgs {
    #[command(flatten)]
    pub source: CompanySourceArgs,

    /// Show the top-N companies (0 = all).
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// Compare against the last reporting period even if it has no emissions.
    #[arg(long)]
    pub use_last_period: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn project_requires_a_series_or_company() {
        assert!(Cli::try_parse_from(["klimat", "project"]).is_err());
        assert!(Cli::try_parse_from(["klimat", "project", "--series", "a.csv", "--company", "Q1"]).is_err());

        let cli = Cli::try_parse_from(["klimat", "project", "--company", "Q1", "--fit", "exponential"]).unwrap();
        let Command::Project(args) = cli.command else {
            panic!("expected project");
        };
        assert_eq!(args.fit, FitKind::Exponential);
        assert_eq!(args.end_year, 2050);
    }
}
