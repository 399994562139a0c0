//! Builds the SPED funding gap report: two workbook sheets (districts and
//! charters) in, one static HTML page out.
//!
//! The pipeline per sheet is load → sort → disambiguate → aggregate →
//! format; see [`reports::transform_sheet`]. Everything is rendered in memory
//! before the first byte is written, so a failed run leaves no partial output.
pub mod cli;
pub mod error;
pub mod loader;
pub mod output;
pub mod render;
pub mod reports;
pub mod serve;
pub mod types;
pub mod util;

use std::path::{Path, PathBuf};

use log::info;

pub use error::{InputError, OutputError, ReportError, Result};
pub use types::{FundingRow, GapStats, Report, SheetKind, SheetReport};

pub const DEFAULT_DISTRICT_SHEET: &str = "Sheet1";
pub const DEFAULT_CHARTER_SHEET: &str = "Sheet2";

/// Resolved options for one `build` run.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub district_sheet: String,
    pub charter_sheet: String,
    /// Also write `districts.csv` / `charters.csv` here.
    pub csv_dir: Option<PathBuf>,
    /// Also write the aggregate statistics as JSON.
    pub summary_json: Option<PathBuf>,
}

impl ReportConfig {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        ReportConfig {
            input: input.into(),
            output: output.into(),
            district_sheet: DEFAULT_DISTRICT_SHEET.to_string(),
            charter_sheet: DEFAULT_CHARTER_SHEET.to_string(),
            csv_dir: None,
            summary_json: None,
        }
    }
}

/// Build the report with default sheet names and no companion exports.
pub fn build_report(input: &Path, output: &Path) -> Result<Report> {
    build(&ReportConfig::new(input, output))
}

/// Load and transform both sheets and render the page without touching the
/// filesystem beyond reading the workbook.
pub fn generate(config: &ReportConfig) -> Result<(Report, String)> {
    info!("Reading {}", config.input.display());
    let mut workbook = loader::open(&config.input)?;
    let districts = load_sheet(&mut workbook, &config.district_sheet, SheetKind::Districts)?;
    let charters = load_sheet(&mut workbook, &config.charter_sheet, SheetKind::Charters)?;
    let report = reports::assemble(districts, charters);
    let html = render::render_html(&report)?;
    Ok((report, html))
}

pub fn build(config: &ReportConfig) -> Result<Report> {
    let (report, html) = generate(config)?;

    let mut files: Vec<(PathBuf, Vec<u8>)> = vec![(config.output.clone(), html.into_bytes())];
    if let Some(dir) = &config.csv_dir {
        for sheet in [&report.districts, &report.charters] {
            let path = dir.join(format!("{}.csv", sheet.kind.file_stem()));
            let bytes = output::csv_bytes(&path, &sheet.rows)?;
            files.push((path, bytes));
        }
    }
    if let Some(path) = &config.summary_json {
        files.push((path.clone(), output::summary_json(&report)?.into_bytes()));
    }

    for (path, bytes) in &files {
        output::write_file(path, bytes)?;
    }
    Ok(report)
}

fn load_sheet(workbook: &mut loader::Workbook, sheet: &str, kind: SheetKind) -> Result<SheetReport> {
    let range = loader::read_sheet(workbook, sheet)?;
    let rows = loader::load_rows(&range, sheet)?;
    Ok(reports::transform_sheet(kind, rows))
}
