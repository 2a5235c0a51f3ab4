use crate::error::{IngestError, Result};

/// Column names of the listings dataset, in file order.
pub mod field {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const HOST_ID: &str = "host_id";
    pub const HOST_NAME: &str = "host_name";
    pub const NEIGHBOURHOOD_GROUP: &str = "neighbourhood_group";
    pub const NEIGHBOURHOOD: &str = "neighbourhood";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const ROOM_TYPE: &str = "room_type";
    pub const PRICE: &str = "price";
    pub const MINIMUM_NIGHTS: &str = "minimum_nights";
    pub const NUMBER_OF_REVIEWS: &str = "number_of_reviews";
    pub const LAST_REVIEW: &str = "last_review";
    pub const REVIEWS_PER_MONTH: &str = "reviews_per_month";
    pub const HOST_LISTINGS_COUNT: &str = "calculated_host_listings_count";
    pub const AVAILABILITY_365: &str = "availability_365";
}

/// Scalar type declared for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Str,
    Int,
    Float,
}

impl ColumnType {
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Str => "string",
            ColumnType::Int => "integer",
            ColumnType::Float => "float",
        }
    }
}

/// Homogeneous values of one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Str(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Str(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Str(_) => ColumnType::Str,
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Float(_) => ColumnType::Float,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Columnar table with named, typed columns of equal length.
///
/// Row `i` of every column belongs to the same record. The constructor is the
/// only way to build a table, so the length invariant always holds.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);

        if let Some(bad) = columns.iter().find(|c| c.data.len() != rows) {
            return Err(IngestError::ColumnLength {
                column: bad.name.clone(),
                expected: rows,
                found: bad.data.len(),
            });
        }

        Ok(Self { columns, rows })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in header order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
    }

    pub fn str_column(&self, name: &str) -> Result<&[String]> {
        match &self.column(name)?.data {
            ColumnData::Str(v) => Ok(v),
            other => Err(type_error(name, ColumnType::Str, other)),
        }
    }

    pub fn int_column(&self, name: &str) -> Result<&[i64]> {
        match &self.column(name)?.data {
            ColumnData::Int(v) => Ok(v),
            other => Err(type_error(name, ColumnType::Int, other)),
        }
    }

    pub fn float_column(&self, name: &str) -> Result<&[f64]> {
        match &self.column(name)?.data {
            ColumnData::Float(v) => Ok(v),
            other => Err(type_error(name, ColumnType::Float, other)),
        }
    }
}

fn type_error(name: &str, requested: ColumnType, actual: &ColumnData) -> IngestError {
    IngestError::ColumnType {
        column: name.to_string(),
        requested: requested.name(),
        actual: actual.column_type().name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("group", ColumnData::Str(vec!["A".into(), "B".into()])),
            Column::new("price", ColumnData::Int(vec![10, 20])),
            Column::new("lat", ColumnData::Float(vec![40.5, 40.6])),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_len_and_headers() {
        let table = sample();
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), vec!["group", "price", "lat"]);
    }

    #[test]
    fn test_table_rejects_unequal_columns() {
        let result = Table::new(vec![
            Column::new("a", ColumnData::Int(vec![1, 2, 3])),
            Column::new("b", ColumnData::Int(vec![1, 2])),
        ]);
        match result {
            Err(IngestError::ColumnLength { column, expected, found }) => {
                assert_eq!(column, "b");
                assert_eq!(expected, 3);
                assert_eq!(found, 2);
            }
            other => panic!("expected ColumnLength, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new(Vec::new()).unwrap();
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }

    #[test]
    fn test_typed_accessors() {
        let table = sample();
        assert_eq!(table.str_column("group").unwrap(), &["A".to_string(), "B".to_string()]);
        assert_eq!(table.int_column("price").unwrap(), &[10, 20]);
        assert_eq!(table.float_column("lat").unwrap(), &[40.5, 40.6]);
    }

    #[test]
    fn test_accessor_wrong_type() {
        let table = sample();
        let err = table.float_column("price").unwrap_err();
        assert!(err.to_string().contains("holds integer values, not float"));
    }

    #[test]
    fn test_accessor_missing_column() {
        let table = sample();
        let err = table.int_column("nonexistent").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn(ref name) if name == "nonexistent"));
    }
}
