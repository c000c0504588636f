// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row cell values and storable column types.

/// A single cell of a row.
///
/// Mirrors the storage classes of a typical embedded relational store.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,

    /// Signed 64-bit integer.
    Integer(i64),

    /// 64-bit float.
    Real(f64),

    /// UTF-8 text.
    Text(String),

    /// Raw bytes.
    Blob(Vec<u8>)
}

impl Value {
    /// Check if the cell is absent.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Storage class name, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Real(_) => "REAL",
            Self::Text(_) => "TEXT",
            Self::Blob(_) => "BLOB"
        }
    }

    /// Column type able to hold this value. `None` for [`Value::Null`].
    pub const fn column_type(&self) -> Option<ColumnType> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(ColumnType::Integer),
            Self::Real(_) => Some(ColumnType::Real),
            Self::Text(_) => Some(ColumnType::Text),
            Self::Blob(_) => Some(ColumnType::Blob)
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Storable type of a column as reported by its value converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Integer storage (also booleans and timestamps).
    Integer,

    /// Floating point storage.
    Real,

    /// Text storage.
    Text,

    /// Binary storage.
    Blob,

    /// Relation to another table. Never written by
    /// [`EntityConverter::to_row`](crate::EntityConverter::to_row).
    Join
}

impl ColumnType {
    /// SQL type keyword for schema creation.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::Text => "TEXT",
            Self::Blob => "BLOB",
            Self::Join => "JOIN"
        }
    }

    /// Check if the column is stored in the entity's own table.
    pub const fn is_stored(&self) -> bool {
        !matches!(self, Self::Join)
    }
}
