//! CSV ingestion into a typed [`Table`].
//!
//! The listings file has a fixed layout: 16 columns whose names and scalar
//! types are declared in [`LISTING_SCHEMA`]. Every cell is coerced to its
//! declared type while reading; any failure aborts the load.

use crate::data::{field, Column, ColumnData, ColumnType, Table};
use crate::error::{IngestError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Declared name and type of one input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ColumnType,
    /// Empty cells read as zero instead of failing to parse.
    pub blank_as_zero: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self {
            name,
            kind,
            blank_as_zero: false,
        }
    }

    const fn blank_as_zero(mut self) -> Self {
        self.blank_as_zero = true;
        self
    }
}

/// Layout of the New York listings file, by position.
pub const LISTING_SCHEMA: [FieldSpec; 16] = [
    FieldSpec::new(field::ID, ColumnType::Str),
    FieldSpec::new(field::NAME, ColumnType::Str),
    FieldSpec::new(field::HOST_ID, ColumnType::Str),
    FieldSpec::new(field::HOST_NAME, ColumnType::Str),
    FieldSpec::new(field::NEIGHBOURHOOD_GROUP, ColumnType::Str),
    FieldSpec::new(field::NEIGHBOURHOOD, ColumnType::Str),
    FieldSpec::new(field::LATITUDE, ColumnType::Float),
    FieldSpec::new(field::LONGITUDE, ColumnType::Float),
    FieldSpec::new(field::ROOM_TYPE, ColumnType::Str),
    FieldSpec::new(field::PRICE, ColumnType::Int),
    FieldSpec::new(field::MINIMUM_NIGHTS, ColumnType::Int),
    FieldSpec::new(field::NUMBER_OF_REVIEWS, ColumnType::Int),
    FieldSpec::new(field::LAST_REVIEW, ColumnType::Str),
    FieldSpec::new(field::REVIEWS_PER_MONTH, ColumnType::Float).blank_as_zero(),
    FieldSpec::new(field::HOST_LISTINGS_COUNT, ColumnType::Int),
    FieldSpec::new(field::AVAILABILITY_365, ColumnType::Int),
];

/// Load the listings file at `path`.
pub fn load_listings(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_listings(file)?;
    debug!(path = %path.display(), rows = table.len(), "parsed listings file");
    Ok(table)
}

/// Read listings from any reader using [`LISTING_SCHEMA`].
pub fn read_listings<R: Read>(reader: R) -> Result<Table> {
    read_table(reader, &LISTING_SCHEMA)
}

/// Read a headed CSV source whose columns follow `schema` by position.
///
/// Rows are numbered from 1 (the first data line) in errors; row 0 is the header.
pub fn read_table<R: Read>(reader: R, schema: &[FieldSpec]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    check_headers(&headers, schema)?;

    let mut builders: Vec<ColumnData> = schema
        .iter()
        .map(|spec| match spec.kind {
            ColumnType::Str => ColumnData::Str(Vec::new()),
            ColumnType::Int => ColumnData::Int(Vec::new()),
            ColumnType::Float => ColumnData::Float(Vec::new()),
        })
        .collect();

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result?;

        if record.len() != schema.len() {
            return Err(IngestError::FieldCount {
                row,
                expected: schema.len(),
                found: record.len(),
            });
        }

        for ((spec, builder), value) in schema.iter().zip(builders.iter_mut()).zip(record.iter()) {
            push_value(builder, spec, value, row)?;
        }
    }

    let columns = schema
        .iter()
        .zip(builders)
        .map(|(spec, data)| Column::new(spec.name, data))
        .collect();

    Table::new(columns)
}

fn check_headers(headers: &StringRecord, schema: &[FieldSpec]) -> Result<()> {
    if headers.len() != schema.len() {
        return Err(IngestError::FieldCount {
            row: 0,
            expected: schema.len(),
            found: headers.len(),
        });
    }

    for (index, (spec, found)) in schema.iter().zip(headers.iter()).enumerate() {
        if spec.name != found {
            return Err(IngestError::HeaderMismatch {
                index,
                expected: spec.name.to_string(),
                found: found.to_string(),
            });
        }
    }

    Ok(())
}

fn push_value(builder: &mut ColumnData, spec: &FieldSpec, value: &str, row: usize) -> Result<()> {
    match builder {
        ColumnData::Str(values) => values.push(value.to_string()),
        ColumnData::Int(values) => {
            let parsed = value.parse::<i64>().map_err(|_| IngestError::InvalidInteger {
                row,
                column: spec.name.to_string(),
                value: value.to_string(),
            })?;
            values.push(parsed);
        }
        ColumnData::Float(values) => {
            let parsed = if value.is_empty() && spec.blank_as_zero {
                0.0
            } else {
                value.parse::<f64>().map_err(|_| IngestError::InvalidFloat {
                    row,
                    column: spec.name.to_string(),
                    value: value.to_string(),
                })?
            };
            values.push(parsed);
        }
    }
    Ok(())
}
