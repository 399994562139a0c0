use crate::types::{FundingRow, GapStats, InputRow, Report, SheetKind, SheetReport};
use crate::util::{format_currency, format_district_number, format_int, percentage};
use log::info;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Run the per-sheet pipeline: sort, disambiguate, aggregate, format.
pub fn transform_sheet(kind: SheetKind, mut rows: Vec<InputRow>) -> SheetReport {
    // `sort_by` is stable, so equal gaps keep their spreadsheet order.
    rows.sort_by(|a, b| {
        b.funding_gap
            .partial_cmp(&a.funding_gap)
            .unwrap_or(Ordering::Equal)
    });

    let names = disambiguated_names(&rows);
    let gaps: Vec<f64> = rows.iter().map(|r| r.funding_gap).collect();
    let stats = gap_stats(&gaps);

    let rows: Vec<FundingRow> = rows
        .into_iter()
        .zip(names)
        .map(|(r, district_name)| FundingRow {
            district_number: format_district_number(r.district_number),
            district_name,
            enrollment: format_int(r.enrollment),
            expenditure: format_currency(r.expenditure),
            state_funding: format_currency(r.state_funding),
            funding_gap: format_currency(r.funding_gap),
            funding_gap_raw: r.funding_gap,
            spent: r.expenditure,
            received: r.state_funding,
        })
        .collect();

    info!(
        "{}: {} surplus, {} deficit, net {}",
        kind.label(),
        stats.surplus_count,
        stats.deficit_count,
        format_currency(stats.net_gap)
    );
    SheetReport { kind, rows, stats }
}

/// Display names with `" - '000042"` appended to every name that occurs more
/// than once in the sheet. Unique names come back untouched.
pub fn disambiguated_names(rows: &[InputRow]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in rows {
        *counts.entry(r.district_name.as_str()).or_default() += 1;
    }
    rows.iter()
        .map(|r| {
            if counts[r.district_name.as_str()] > 1 {
                format!(
                    "{} - {}",
                    r.district_name,
                    format_district_number(r.district_number)
                )
            } else {
                r.district_name.clone()
            }
        })
        .collect()
}

/// Surplus/deficit split over raw gaps. Zero gaps count toward neither side.
pub fn gap_stats(gaps: &[f64]) -> GapStats {
    let mut stats = GapStats {
        total_rows: gaps.len(),
        ..GapStats::default()
    };
    for &g in gaps {
        if g > 0.0 {
            stats.surplus_count += 1;
            stats.surplus_total += g;
        } else if g < 0.0 {
            stats.deficit_count += 1;
            stats.deficit_total += g;
        }
    }
    let population = stats.surplus_count + stats.deficit_count;
    stats.surplus_pct = percentage(stats.surplus_count, population);
    stats.deficit_pct = percentage(stats.deficit_count, population);
    stats.net_gap = stats.surplus_total + stats.deficit_total;
    stats
}

pub fn assemble(districts: SheetReport, charters: SheetReport) -> Report {
    let total_net_gap = districts.stats.net_gap + charters.stats.net_gap;
    info!("Total net funding gap: {}", format_currency(total_net_gap));
    Report {
        districts,
        charters,
        total_net_gap,
    }
}
