use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::path::PathBuf;

use crate::serve::{self, ServeConfig};
use crate::{output, ReportConfig, DEFAULT_CHARTER_SHEET, DEFAULT_DISTRICT_SHEET};

pub fn command() -> Command {
    Command::new("sped-gap")
        .version(clap::crate_version!())
        .about("Build the SPED funding gap report from the district/charter workbook")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("build")
                .about("Generate the static HTML report")
                .arg(
                    Arg::new("input")
                        .help("Workbook with the district and charter sheets")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Where to write the HTML report (overwritten if present)")
                        .default_value("index.html")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("district_sheet")
                        .long("district-sheet")
                        .help("Name of the district sheet")
                        .default_value(DEFAULT_DISTRICT_SHEET)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("charter_sheet")
                        .long("charter-sheet")
                        .help("Name of the charter sheet")
                        .default_value(DEFAULT_CHARTER_SHEET)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("csv_dir")
                        .long("csv-dir")
                        .help("Also export districts.csv and charters.csv into this directory")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("summary_json")
                        .long("summary-json")
                        .help("Also write the summary statistics as JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .help("Skip the console summary")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("serve")
                .about("Preview a report directory over HTTP (blocks until stopped)")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .help("Directory to serve")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .default_value("8000")
                        .value_parser(clap::value_parser!(u16)),
                )
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .default_value(serve::DEFAULT_BIND)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                ),
        )
}

pub fn run() -> Result<()> {
    let matches = command().get_matches();
    match matches.subcommand() {
        Some(("build", m)) => run_build(m),
        Some(("serve", m)) => run_serve(m),
        _ => unreachable!("subcommand_required is set"),
    }
}

fn build_config(m: &ArgMatches) -> ReportConfig {
    let mut config = ReportConfig::new(
        required_path(m, "input"),
        required_path(m, "output"),
    );
    if let Some(sheet) = m.get_one::<String>("district_sheet") {
        config.district_sheet = sheet.clone();
    }
    if let Some(sheet) = m.get_one::<String>("charter_sheet") {
        config.charter_sheet = sheet.clone();
    }
    config.csv_dir = m.get_one::<PathBuf>("csv_dir").cloned();
    config.summary_json = m.get_one::<PathBuf>("summary_json").cloned();
    config
}

fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    // Both ids are `required` or carry a default.
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn run_build(m: &ArgMatches) -> Result<()> {
    let config = build_config(m);
    let report = crate::build(&config)
        .with_context(|| format!("Failed to build report from {}", config.input.display()))?;
    if !m.get_flag("quiet") {
        output::preview_summary(&report);
        println!("(Report written to {})", config.output.display());
    }
    Ok(())
}

fn run_serve(m: &ArgMatches) -> Result<()> {
    let config = ServeConfig {
        dir: m
            .get_one::<PathBuf>("dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        bind: m
            .get_one::<String>("bind")
            .cloned()
            .unwrap_or_else(|| serve::DEFAULT_BIND.to_string()),
        port: m.get_one::<u16>("port").copied().unwrap_or(serve::DEFAULT_PORT),
    };
    serve::serve(config.clone())
        .with_context(|| format!("Preview server on {}:{} failed", config.bind, config.port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn build_defaults() {
        let m = command().get_matches_from(["sped-gap", "build", "data.xlsx"]);
        let (_, sub) = m.subcommand().unwrap();
        let config = build_config(sub);
        assert_eq!(config.input, PathBuf::from("data.xlsx"));
        assert_eq!(config.output, PathBuf::from("index.html"));
        assert_eq!(config.district_sheet, "Sheet1");
        assert_eq!(config.charter_sheet, "Sheet2");
        assert!(config.csv_dir.is_none());
    }

    #[test]
    fn build_overrides() {
        let m = command().get_matches_from([
            "sped-gap",
            "build",
            "data.xlsx",
            "-o",
            "out/report.html",
            "--district-sheet",
            "Districts",
            "--csv-dir",
            "out",
        ]);
        let (_, sub) = m.subcommand().unwrap();
        let config = build_config(sub);
        assert_eq!(config.output, PathBuf::from("out/report.html"));
        assert_eq!(config.district_sheet, "Districts");
        assert_eq!(config.csv_dir, Some(PathBuf::from("out")));
    }
}
