//! Forward-only row stream over an executing statement.

use rusqlite::types::Value;
use rusqlite::{Result, Rows};
use std::rc::Rc;

/// One row read from a [`DataReader`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    columns: Rc<[String]>,
    values: Vec<Value>,
}

impl DataRow {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value at column `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value of the column named `name` (ASCII case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .and_then(|i| self.values.get(i))
    }
}

/// A lazy, single-pass sequence of rows.
///
/// Readers are lent to a closure by `SqlHelper::execute_reader` and cannot
/// outlive it. Once the last row has been read, an error has been returned,
/// or [`close`](Self::close) is called, the underlying statement is reset and
/// the reader yields nothing further.
pub struct DataReader<'stmt> {
    columns: Rc<[String]>,
    rows: Option<Rows<'stmt>>,
}

impl<'stmt> DataReader<'stmt> {
    pub(crate) fn new(columns: Vec<String>, rows: Rows<'stmt>) -> Self {
        Self {
            columns: columns.into(),
            rows: Some(rows),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// True once the stream has been drained or has failed.
    pub fn is_closed(&self) -> bool {
        self.rows.is_none()
    }

    /// Reads the next row, or `None` when the stream is finished.
    pub fn read(&mut self) -> Result<Option<DataRow>> {
        let Some(rows) = self.rows.as_mut() else {
            return Ok(None);
        };
        let row = match rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => {
                self.rows = None;
                return Ok(None);
            }
            Err(err) => {
                self.rows = None;
                return Err(err);
            }
        };

        let mut values = Vec::with_capacity(self.columns.len());
        for index in 0..self.columns.len() {
            match row.get::<_, Value>(index) {
                Ok(value) => values.push(value),
                Err(err) => {
                    self.rows = None;
                    return Err(err);
                }
            }
        }
        Ok(Some(DataRow {
            columns: Rc::clone(&self.columns),
            values,
        }))
    }

    /// Stops reading and releases the statement.
    pub fn close(mut self) {
        self.rows = None;
    }
}

impl Iterator for DataReader<'_> {
    type Item = Result<DataRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read().transpose()
    }
}

impl std::fmt::Debug for DataReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataReader")
            .field("columns", &self.columns)
            .field("closed", &self.is_closed())
            .finish()
    }
}
