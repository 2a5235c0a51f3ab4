//! Error types for listing ingestion.

use thiserror::Error;

/// Errors that can occur while loading the listings table.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The source file could not be opened or read.
    #[error("failed to read listings source: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader rejected the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header line does not carry the expected column at this position.
    #[error("unexpected header at column {index}: expected '{expected}', found '{found}'")]
    HeaderMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    /// A header or data line has the wrong number of fields.
    #[error("row {row} has {found} fields, expected {expected}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A cell of an integer column did not parse.
    #[error("invalid integer '{value}' in column '{column}' at row {row}")]
    InvalidInteger {
        row: usize,
        column: String,
        value: String,
    },

    /// A cell of a float column did not parse.
    #[error("invalid number '{value}' in column '{column}' at row {row}")]
    InvalidFloat {
        row: usize,
        column: String,
        value: String,
    },

    /// No column with this name exists in the table.
    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// The column exists but holds a different scalar type.
    #[error("column '{column}' holds {actual} values, not {requested}")]
    ColumnType {
        column: String,
        requested: &'static str,
        actual: &'static str,
    },

    /// Columns handed to the table constructor differ in length.
    #[error("column '{column}' has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
