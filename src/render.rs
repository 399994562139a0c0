// Populates the static report page.
//
// The page itself (styles, DataTables setup, Chart.js bars, PNG download)
// lives in `templates/report.html`; this module only fills in the
// `{{placeholder}}` slots with summary figures and the embedded row data.
use crate::error::OutputError;
use crate::types::{FundingRow, GapStats, Report};
use crate::util::format_currency;
use std::collections::HashMap;

const TEMPLATE: &str = include_str!("templates/report.html");

pub fn render_html(report: &Report) -> Result<String, OutputError> {
    let districts_json = rows_json(&report.districts.rows, "district rows")?;
    let charters_json = rows_json(&report.charters.rows, "charter rows")?;

    let mut slots: Vec<(String, String)> = Vec::new();
    summary_slots(&mut slots, "districts", &report.districts.stats);
    summary_slots(&mut slots, "charters", &report.charters.stats);
    slots.push(("total_net_gap".into(), format_currency(report.total_net_gap)));
    slots.push(("districts_json".into(), districts_json));
    slots.push(("charters_json".into(), charters_json));

    Ok(fill(TEMPLATE, &slots.into_iter().collect()))
}

/// Substitute `{{name}}` slots in a single left-to-right pass. Inserted
/// values are never rescanned, so data that happens to contain `{{...}}`
/// comes through verbatim. Unknown slots are left as they are.
fn fill(template: &str, slots: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let name = &after[..close];
                match slots.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn summary_slots(slots: &mut Vec<(String, String)>, prefix: &str, stats: &GapStats) {
    slots.push((format!("{prefix}_surplus_count"), stats.surplus_count.to_string()));
    slots.push((format!("{prefix}_surplus_pct"), format!("{:.1}", stats.surplus_pct)));
    slots.push((format!("{prefix}_deficit_count"), stats.deficit_count.to_string()));
    slots.push((format!("{prefix}_deficit_pct"), format!("{:.1}", stats.deficit_pct)));
    slots.push((format!("{prefix}_net_gap"), format_currency(stats.net_gap)));
}

/// Row records as a JS array literal. `</` is escaped so a district name can
/// never terminate the surrounding `<script>` element.
fn rows_json(rows: &[FundingRow], what: &str) -> Result<String, OutputError> {
    let json = serde_json::to_string(rows).map_err(|source| OutputError::Json {
        what: what.to_string(),
        source,
    })?;
    Ok(json.replace("</", "<\\/"))
}
