use serde::Serialize;
use tabled::Tabled;

/// Which of the two workbook sheets a row collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    Districts,
    Charters,
}

impl SheetKind {
    pub fn label(self) -> &'static str {
        match self {
            SheetKind::Districts => "Districts",
            SheetKind::Charters => "Charters",
        }
    }

    /// Stem used for companion export file names.
    pub fn file_stem(self) -> &'static str {
        match self {
            SheetKind::Districts => "districts",
            SheetKind::Charters => "charters",
        }
    }
}

/// Source headers, in projection order.
pub const HEADER_DISTRICT_NUMBER: &str = "DISTRICT NUMBER";
pub const HEADER_DISTRICT_NAME: &str = "DISTRICT NAME";
pub const HEADER_ENROLLMENT: &str = "Enrollment";
pub const HEADER_EXPENDITURE: &str = "GF Students with Disabilities (PICs 23,33,43)";
pub const HEADER_STATE_FUNDING: &str = "23-Special Education Adjusted Allotment 48.102";
pub const HEADER_FUNDING_GAP: &str = "2022-2023 Special Education Funding Gap";

pub const SOURCE_HEADERS: [&str; 6] = [
    HEADER_DISTRICT_NUMBER,
    HEADER_DISTRICT_NAME,
    HEADER_ENROLLMENT,
    HEADER_EXPENDITURE,
    HEADER_STATE_FUNDING,
    HEADER_FUNDING_GAP,
];

/// One validated spreadsheet row. Money columns are already normalized to
/// `f64` so nothing downstream needs to care whether the cell held a number
/// or a `$1,234` string.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub district_number: u32,
    pub district_name: String,
    pub enrollment: i64,
    pub expenditure: f64,
    pub state_funding: f64,
    pub funding_gap: f64,
}

/// A row as embedded in the report. Field order is the column order the
/// client-side table sees.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FundingRow {
    #[serde(rename = "District Number")]
    pub district_number: String,
    #[serde(rename = "District Name")]
    pub district_name: String,
    #[serde(rename = "Enrollment")]
    pub enrollment: String,
    #[serde(rename = "SPED District Expenditure (GF)")]
    pub expenditure: String,
    #[serde(rename = "SPED State Funding")]
    pub state_funding: String,
    #[serde(rename = "SPED Funding Gap")]
    pub funding_gap: String,
    #[serde(rename = "SPED Funding Gap Raw")]
    pub funding_gap_raw: f64,
    #[serde(rename = "Spent")]
    pub spent: f64,
    #[serde(rename = "Received")]
    pub received: f64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct GapStats {
    pub total_rows: usize,
    pub surplus_count: usize,
    pub deficit_count: usize,
    pub surplus_total: f64,
    pub deficit_total: f64,
    pub surplus_pct: f64,
    pub deficit_pct: f64,
    pub net_gap: f64,
}

/// Transformed rows plus statistics for one sheet.
#[derive(Debug, Clone)]
pub struct SheetReport {
    pub kind: SheetKind,
    pub rows: Vec<FundingRow>,
    pub stats: GapStats,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub districts: SheetReport,
    pub charters: SheetReport,
    pub total_net_gap: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryJson<'a> {
    pub districts: &'a GapStats,
    pub charters: &'a GapStats,
    pub total_net_gap: f64,
}

/// Console preview line for `tabled`.
#[derive(Debug, Clone, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "Sheet")]
    pub sheet: String,
    #[tabled(rename = "Rows")]
    pub rows: String,
    #[tabled(rename = "Surplus")]
    pub surplus: String,
    #[tabled(rename = "Deficit")]
    pub deficit: String,
    #[tabled(rename = "Net Funding Gap")]
    pub net_gap: String,
}
