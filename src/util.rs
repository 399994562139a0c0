// Utility helpers for parsing and formatting money values.
//
// Spreadsheet exports hand us currency either as real numbers or as
// pre-formatted strings like `-$1,234`. Everything funnels through
// `parse_currency` so the rest of the code only sees `f64`.
use num_format::{Locale, ToFormattedString};

/// Parse a currency-ish string into `f64`.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (this also keeps
///   `inf`/`NaN` out).
/// - Strips `$`, thousands separators and inner spaces before parsing, so
///   `-$1,234`, `$-1,234` and `-1234` all parse to the same value.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_currency(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let cleaned: String = s
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    let v = cleaned.parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

/// Parse an identifier such as `"001902"` or `"'001902"` (the apostrophe is
/// what spreadsheets use to force text).
pub fn parse_id(s: &str) -> Option<u32> {
    let s = s.trim().trim_start_matches('\'');
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>().ok()
}

/// Format a money value as `$1,234` or `-$1,234`.
///
/// Cents are truncated toward zero, never rounded, so `-0.9` becomes `$0`.
pub fn format_currency(v: f64) -> String {
    let whole = v.trunc() as i64;
    if whole < 0 {
        format!("-${}", whole.unsigned_abs().to_formatted_string(&Locale::en))
    } else {
        format!("${}", whole.to_formatted_string(&Locale::en))
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Six-digit padded district number behind a `'` so downstream renderers
/// keep it as text.
pub fn format_district_number(n: u32) -> String {
    format!("'{:06}", n)
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    // An empty population reports 0% rather than NaN.
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
