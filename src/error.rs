//! Error types for report generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Sheet '{sheet}' not found (available: {available})")]
    MissingSheet { sheet: String, available: String },

    #[error("Failed to read sheet '{sheet}': {reason}")]
    Sheet { sheet: String, reason: String },

    #[error("Sheet '{sheet}' is missing column '{column}'")]
    MissingColumn { sheet: String, column: String },

    #[error("Sheet '{sheet}', row {row}, column '{column}': cannot parse {value:?}")]
    InvalidValue {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_sheet_and_column() {
        let err: ReportError = InputError::MissingColumn {
            sheet: "Sheet2".to_string(),
            column: "Enrollment".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Sheet 'Sheet2' is missing column 'Enrollment'"
        );
        assert!(matches!(err, ReportError::Input(_)));
    }

    #[test]
    fn output_error_keeps_io_source() {
        let err = OutputError::Io {
            path: PathBuf::from("/nope/index.html"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing parent"),
        };
        assert!(err.to_string().contains("/nope/index.html"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
