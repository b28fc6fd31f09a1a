//! Fully materialized query results.

use super::reader::DataReader;
use rusqlite::types::Value;
use rusqlite::Result;

/// Column names plus every row of one result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// Drains `reader` into a table.
    pub fn from_reader(mut reader: DataReader<'_>) -> Result<Self> {
        let columns = reader.columns().to_vec();
        let mut rows = Vec::new();
        while let Some(row) = reader.read()? {
            rows.push(row.into_values());
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row values in result order, each in column order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named `name` (ASCII case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    /// The value at `row` in the named column, or `None` when either is out
    /// of range.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }
}

/// The tables produced by each row-returning statement of a command, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub tables: Vec<DataTable>,
}

impl DataSet {
    /// The `index`-th result set, counting only row-returning statements.
    pub fn table(&self, index: usize) -> Option<&DataTable> {
        self.tables.get(index)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
