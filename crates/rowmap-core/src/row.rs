// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row store interfaces.
//!
//! The storage engine itself lives outside this crate. Conversion only needs
//! two narrow views of it:
//!
//! - [`Cursor`]: the current row of a query result, read by index
//! - [`RowValues`]: a named set of cells to insert or update

use crate::{error::ConvertError, value::Value};

/// Read access to the current row of a query result.
///
/// Indexes follow the projection the query was issued with, which for
/// entity queries is [`EntityConverter::projection`](crate::EntityConverter::projection).
pub trait Cursor {
    /// Number of cells in the row.
    fn column_count(&self) -> usize;

    /// Cell at `index`, or `None` past the end of the row.
    fn value(&self, index: usize) -> Option<&Value>;

    /// Check if the cell is null. Cells past the end count as null.
    fn is_null(&self, index: usize) -> bool {
        self.value(index).is_none_or(Value::is_null)
    }

    /// Cell at `index`, failing past the end of the row.
    fn get(&self, index: usize) -> Result<&Value, ConvertError> {
        self.value(index).ok_or(ConvertError::ColumnOutOfRange {
            index,
            width: self.column_count()
        })
    }

    /// Integer cell.
    fn get_i64(&self, index: usize) -> Result<i64, ConvertError> {
        match self.get(index)? {
            Value::Integer(v) => Ok(*v),
            other => Err(unexpected(index, "INTEGER", other))
        }
    }

    /// Real cell. Integer cells are widened.
    fn get_f64(&self, index: usize) -> Result<f64, ConvertError> {
        match self.get(index)? {
            Value::Real(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            other => Err(unexpected(index, "REAL", other))
        }
    }

    /// Text cell.
    fn get_str(&self, index: usize) -> Result<&str, ConvertError> {
        match self.get(index)? {
            Value::Text(v) => Ok(v.as_str()),
            other => Err(unexpected(index, "TEXT", other))
        }
    }

    /// Blob cell.
    fn get_blob(&self, index: usize) -> Result<&[u8], ConvertError> {
        match self.get(index)? {
            Value::Blob(v) => Ok(v.as_slice()),
            other => Err(unexpected(index, "BLOB", other))
        }
    }
}

fn unexpected(index: usize, expected: &'static str, found: &Value) -> ConvertError {
    ConvertError::UnexpectedValue {
        index,
        expected,
        found: found.kind()
    }
}

/// A materialized row.
///
/// Row stores that hand out owned rows can use this directly as their
/// [`Cursor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<Value>
}

impl Row {
    /// Create a row from its cells.
    pub const fn new(values: Vec<Value>) -> Self {
        Self {
            values
        }
    }

    /// Cells of the row.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the row, returning its cells.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl Cursor for Row {
    fn column_count(&self) -> usize {
        self.values.len()
    }

    fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Named cells for an insert or update.
///
/// Keeps insertion order. Writing a column twice replaces the earlier value.
/// A column that was never written is left to the store, which is how an
/// absent identity gets assigned by the store instead of being set to null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowValues {
    entries: Vec<(String, Value)>
}

impl RowValues {
    /// Create an empty set of cells.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new()
        }
    }

    /// Write a cell.
    pub fn put(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column.to_string(), value))
        }
    }

    /// Write an explicit null cell.
    pub fn put_null(&mut self, column: &str) {
        self.put(column, Value::Null);
    }

    /// Cell written for `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Check if `column` was written, null or not.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Remove the cell written for `column`.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let position = self.entries.iter().position(|(name, _)| name == column)?;
        Some(self.entries.remove(position).1)
    }

    /// Number of cells written.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over written cells in write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}
