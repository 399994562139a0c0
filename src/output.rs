use crate::error::OutputError;
use crate::types::{FundingRow, Report, SheetReport, SummaryJson, SummaryRow};
use crate::util::{format_currency, format_int};
use log::info;
use std::path::Path;
use tabled::{settings::Style, Table};

/// Overwrite `path` with `contents`. A missing parent directory is an error,
/// not something we create.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<(), OutputError> {
    std::fs::write(path, contents).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Display rows as CSV, headers taken from the serde labels.
pub fn csv_bytes(path: &Path, rows: &[FundingRow]) -> Result<Vec<u8>, OutputError> {
    let csv_err = |source: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut wtr = csv::Writer::from_writer(Vec::new());
    for r in rows {
        wtr.serialize(r).map_err(csv_err)?;
    }
    wtr.into_inner().map_err(|e| OutputError::Io {
        path: path.to_path_buf(),
        source: e.into_error(),
    })
}

pub fn summary_json(report: &Report) -> Result<String, OutputError> {
    let summary = SummaryJson {
        districts: &report.districts.stats,
        charters: &report.charters.stats,
        total_net_gap: report.total_net_gap,
    };
    serde_json::to_string_pretty(&summary).map_err(|source| OutputError::Json {
        what: "summary".to_string(),
        source,
    })
}

fn summary_row(sheet: &SheetReport) -> SummaryRow {
    let s = &sheet.stats;
    SummaryRow {
        sheet: sheet.kind.label().to_string(),
        rows: format_int(s.total_rows),
        surplus: format!("{} ({:.1}%)", s.surplus_count, s.surplus_pct),
        deficit: format!("{} ({:.1}%)", s.deficit_count, s.deficit_pct),
        net_gap: format_currency(s.net_gap),
    }
}

pub fn summary_table(report: &Report) -> String {
    let rows = vec![
        summary_row(&report.districts),
        summary_row(&report.charters),
    ];
    Table::new(rows).with(Style::markdown()).to_string()
}

pub fn preview_summary(report: &Report) {
    println!("Summary Statistics\n");
    println!("{}\n", summary_table(report));
    println!(
        "Total Net Funding Gap: {}\n",
        format_currency(report.total_net_gap)
    );
}
