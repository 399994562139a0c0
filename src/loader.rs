use crate::error::InputError;
use crate::types::{
    InputRow, HEADER_DISTRICT_NAME, HEADER_DISTRICT_NUMBER, HEADER_ENROLLMENT,
    HEADER_EXPENDITURE, HEADER_FUNDING_GAP, HEADER_STATE_FUNDING, SOURCE_HEADERS,
};
use crate::util::{parse_currency, parse_id};
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub type Workbook = Sheets<BufReader<File>>;

static EMPTY: Data = Data::Empty;

pub fn open(path: &Path) -> Result<Workbook, InputError> {
    open_workbook_auto(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_sheet(workbook: &mut Workbook, sheet: &str) -> Result<Range<Data>, InputError> {
    let names = workbook.sheet_names();
    if !names.iter().any(|n| n == sheet) {
        return Err(InputError::MissingSheet {
            sheet: sheet.to_string(),
            available: names.join(", "),
        });
    }
    workbook
        .worksheet_range(sheet)
        .map_err(|e| InputError::Sheet {
            sheet: sheet.to_string(),
            reason: e.to_string(),
        })
}

/// Positions of the projected columns within the header row.
struct Columns {
    number: usize,
    name: usize,
    enrollment: usize,
    expenditure: usize,
    state_funding: usize,
    funding_gap: usize,
}

impl Columns {
    fn locate(header: &[Data], sheet: &str) -> Result<Self, InputError> {
        let find = |wanted: &str| {
            header
                .iter()
                .position(|cell| matches!(cell, Data::String(s) if s == wanted))
                .ok_or_else(|| InputError::MissingColumn {
                    sheet: sheet.to_string(),
                    column: wanted.to_string(),
                })
        };
        Ok(Columns {
            number: find(HEADER_DISTRICT_NUMBER)?,
            name: find(HEADER_DISTRICT_NAME)?,
            enrollment: find(HEADER_ENROLLMENT)?,
            expenditure: find(HEADER_EXPENDITURE)?,
            state_funding: find(HEADER_STATE_FUNDING)?,
            funding_gap: find(HEADER_FUNDING_GAP)?,
        })
    }

    fn indices(&self) -> [usize; 6] {
        [
            self.number,
            self.name,
            self.enrollment,
            self.expenditure,
            self.state_funding,
            self.funding_gap,
        ]
    }
}

/// Validate a sheet's cells into typed rows.
///
/// The first row of the used range is the header. Rows whose projected cells
/// are all empty are padding and get skipped; any other row must parse
/// completely or the whole sheet is rejected.
pub fn load_rows(range: &Range<Data>, sheet: &str) -> Result<Vec<InputRow>, InputError> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| InputError::MissingColumn {
        sheet: sheet.to_string(),
        column: SOURCE_HEADERS[0].to_string(),
    })?;
    let cols = Columns::locate(header, sheet)?;
    // 1-based spreadsheet row of the header, for error messages.
    let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0) + 1;

    let mut blank_rows = 0usize;
    let mut out = Vec::new();
    for (idx, row) in rows.enumerate() {
        let row_no = first_row + idx + 1;
        let cell = |i: usize| row.get(i).unwrap_or(&EMPTY);

        if cols.indices().iter().all(|&i| is_blank(cell(i))) {
            debug!("{}: skipping blank row {}", sheet, row_no);
            blank_rows += 1;
            continue;
        }

        let invalid = |column: &str, value: &Data| InputError::InvalidValue {
            sheet: sheet.to_string(),
            row: row_no,
            column: column.to_string(),
            value: value.to_string(),
        };

        let number = cell(cols.number);
        let name = cell(cols.name);
        let enrollment = cell(cols.enrollment);
        let expenditure = cell(cols.expenditure);
        let state_funding = cell(cols.state_funding);
        let funding_gap = cell(cols.funding_gap);

        out.push(InputRow {
            district_number: id_value(number).ok_or_else(|| invalid(HEADER_DISTRICT_NUMBER, number))?,
            district_name: text_value(name).ok_or_else(|| invalid(HEADER_DISTRICT_NAME, name))?,
            enrollment: money_value(enrollment)
                .map(|v| v.trunc() as i64)
                .ok_or_else(|| invalid(HEADER_ENROLLMENT, enrollment))?,
            expenditure: money_value(expenditure)
                .ok_or_else(|| invalid(HEADER_EXPENDITURE, expenditure))?,
            state_funding: money_value(state_funding)
                .ok_or_else(|| invalid(HEADER_STATE_FUNDING, state_funding))?,
            funding_gap: money_value(funding_gap)
                .ok_or_else(|| invalid(HEADER_FUNDING_GAP, funding_gap))?,
        });
    }

    info!(
        "{}: loaded {} rows ({} blank skipped)",
        sheet,
        out.len(),
        blank_rows
    );
    Ok(out)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Numbers pass through; strings go through the currency parser.
pub fn money_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::String(s) => parse_currency(s),
        _ => None,
    }
}

fn id_value(cell: &Data) -> Option<u32> {
    match cell {
        Data::Int(i) => u32::try_from(*i).ok(),
        Data::Float(f) if f.is_finite() && *f >= 0.0 && *f <= u32::MAX as f64 => {
            Some(f.trunc() as u32)
        }
        Data::String(s) => parse_id(s),
        _ => None,
    }
}

fn text_value(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Data::Int(_) | Data::Float(_) => Some(cell.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build an in-memory sheet: header row plus `rows`, all cells as given.
    fn sheet(header: &[&str], rows: Vec<Vec<Data>>) -> Range<Data> {
        let width = header.len() as u32;
        let height = rows.len() as u32 + 1;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (c, h) in header.iter().enumerate() {
            range.set_value((0, c as u32), Data::String(h.to_string()));
        }
        for (r, row) in rows.into_iter().enumerate() {
            for (c, v) in row.into_iter().enumerate() {
                range.set_value((r as u32 + 1, c as u32), v);
            }
        }
        range
    }

    fn row(number: i64, name: &str, gap: Data) -> Vec<Data> {
        vec![
            Data::Int(number),
            Data::String(name.to_string()),
            Data::Float(1000.0),
            Data::String("$2,000".to_string()),
            Data::Float(1500.0),
            gap,
        ]
    }

    #[test]
    fn loads_mixed_numeric_and_formatted_cells() {
        let range = sheet(
            &SOURCE_HEADERS,
            vec![row(1902, "Alpha ISD", Data::String("-$1,234".to_string()))],
        );
        let rows = load_rows(&range, "Sheet1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            InputRow {
                district_number: 1902,
                district_name: "Alpha ISD".to_string(),
                enrollment: 1000,
                expenditure: 2000.0,
                state_funding: 1500.0,
                funding_gap: -1234.0,
            }
        );
    }

    #[test]
    fn column_order_in_sheet_does_not_matter() {
        let mut header: Vec<&str> = SOURCE_HEADERS.iter().rev().copied().collect();
        header.push("Unused");
        let mut cells = row(7, "Beta ISD", Data::Int(50));
        cells.reverse();
        cells.push(Data::String("ignored".to_string()));
        let rows = load_rows(&sheet(&header, vec![cells]), "Sheet1").unwrap();
        assert_eq!(rows[0].district_number, 7);
        assert_eq!(rows[0].funding_gap, 50.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let header = &SOURCE_HEADERS[..5];
        let err = load_rows(&sheet(header, vec![]), "Sheet2").unwrap_err();
        match err {
            InputError::MissingColumn { sheet, column } => {
                assert_eq!(sheet, "Sheet2");
                assert_eq!(column, HEADER_FUNDING_GAP);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unparseable_money_names_row_and_column() {
        let range = sheet(
            &SOURCE_HEADERS,
            vec![
                row(1, "A", Data::Int(5)),
                row(2, "B", Data::String("n/a".to_string())),
            ],
        );
        let err = load_rows(&range, "Sheet1").unwrap_err();
        match err {
            InputError::InvalidValue { row, column, .. } => {
                assert_eq!(row, 3);
                assert_eq!(column, HEADER_FUNDING_GAP);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_padding_rows_are_skipped() {
        let blank = vec![Data::Empty; 6];
        let range = sheet(&SOURCE_HEADERS, vec![row(1, "A", Data::Int(5)), blank]);
        let rows = load_rows(&range, "Sheet1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].district_name, "A");
    }

    #[test]
    fn partially_empty_row_is_an_error() {
        let mut cells = row(1, "A", Data::Int(5));
        cells[2] = Data::Empty;
        let err = load_rows(&sheet(&SOURCE_HEADERS, vec![cells]), "Sheet1").unwrap_err();
        assert!(matches!(err, InputError::InvalidValue { .. }));
    }
}
