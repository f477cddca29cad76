//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initialises logging
//! - parses CLI arguments
//! - runs the projection / change / ranking pipelines
//! - prints reports and writes optional exports

use clap::Parser;
use log::warn;

use crate::cli::{ChangeArgs, Command, CompanySourceArgs, ProjectArgs, RankArgs};
use crate::domain::{ChangeConfig, ChangeOptions, CompanySource, ProjectionConfig, RankConfig, SeriesSource};
use crate::error::AppError;
use crate::io::export::{ProjectionFile, write_projection_csv, write_projection_json};

pub mod pipeline;

/// Entry point for the `klimat` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Project(args) => handle_project(args),
        Command::Change(args) => handle_change(args),
        Command::Rank(args) => handle_rank(args),
    }
}

fn handle_project(args: ProjectArgs) -> Result<(), AppError> {
    let config = projection_config_from_args(&args, crate::trends::current_year())?;
    let run = pipeline::run_projection(&config)?;

    println!(
        "{}",
        crate::report::format_projection(&run.label, &run.points, run.coefficients.as_ref(), config.as_of_year)
    );

    if let Some(path) = &config.export_csv {
        write_projection_csv(path, &run.points)?;
    }
    if let Some(path) = &config.export_json {
        let file = ProjectionFile {
            tool: "klimat",
            as_of_year: config.as_of_year,
            end_year: config.end_year,
            base_year: run.base_year,
            coefficients: run.coefficients.as_ref(),
            points: &run.points,
        };
        write_projection_json(path, &file)?;
    }

    Ok(())
}

fn handle_change(args: ChangeArgs) -> Result<(), AppError> {
    let config = ChangeConfig {
        source: company_source(&args.source),
        company: args.company.clone(),
        options: ChangeOptions {
            use_last_period: args.use_last_period,
        },
    };

    for (company, change) in pipeline::run_change(&config)? {
        println!("{}", crate::report::format_change(&company, change));
    }
    Ok(())
}

fn handle_rank(args: RankArgs) -> Result<(), AppError> {
    let config = RankConfig {
        source: company_source(&args.source),
        options: ChangeOptions {
            use_last_period: args.use_last_period,
        },
        top_n: args.top,
    };

    let ranking = pipeline::run_rank(&config)?;
    if ranking.ranked.is_empty() {
        warn!("no company had a computable base-year change");
    }
    println!("{}", crate::report::format_ranking(&ranking));
    Ok(())
}

/// Build a projection config; `current_year` is used when `--as-of` is absent.
pub fn projection_config_from_args(args: &ProjectArgs, current_year: i32) -> Result<ProjectionConfig, AppError> {
    let series = match (&args.series, &args.company) {
        (Some(path), _) => SeriesSource::Csv(path.clone()),
        (None, Some(id)) => SeriesSource::Company {
            id: id.clone(),
            source: company_source(&args.source),
        },
        (None, None) => return Err(AppError::usage("Pass --series <CSV> or --company <ID>.")),
    };

    let as_of_year = args.as_of.unwrap_or(current_year);
    if args.end_year < as_of_year {
        return Err(AppError::usage(format!(
            "--end-year {} must not be before the as-of year {as_of_year}.",
            args.end_year
        )));
    }

    Ok(ProjectionConfig {
        series,
        fit: args.fit,
        end_year: args.end_year,
        as_of_year,
        base_year: args.base_year,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    })
}

fn company_source(args: &CompanySourceArgs) -> CompanySource {
    match &args.companies {
        Some(path) => CompanySource::File(path.clone()),
        None => CompanySource::Api,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn project_args(argv: &[&str]) -> ProjectArgs {
        let mut full = vec!["klimat", "project"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Project(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn as_of_defaults_to_current_year() {
        let config = projection_config_from_args(&project_args(&["--series", "s.csv"]), 2026).unwrap();
        assert_eq!(config.as_of_year, 2026);
        assert_eq!(config.series, SeriesSource::Csv("s.csv".into()));
    }

    #[test]
    fn company_without_file_uses_api() {
        let config =
            projection_config_from_args(&project_args(&["--company", "Q5", "--as-of", "2024"]), 2026).unwrap();
        assert_eq!(config.as_of_year, 2024);
        assert_eq!(
            config.series,
            SeriesSource::Company {
                id: "Q5".to_string(),
                source: CompanySource::Api
            }
        );
    }

    #[test]
    fn end_year_before_as_of_is_rejected() {
        let err = projection_config_from_args(&project_args(&["--series", "s.csv", "--end-year", "2020"]), 2026)
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
