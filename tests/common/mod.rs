// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! In-memory row store used by the integration tests.
//!
//! Tables are keyed by the converter's table name. Each table assigns
//! increasing identities to rows stored without one and hands rows back in
//! insertion order, projected the way the converter asks for.

#![allow(dead_code)]

use std::collections::HashMap;

use rowmap::{ConvertError, EntityConverter, ID_COLUMN, Row, Value};

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows:    Vec<HashMap<String, Value>>
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<&'static str, Table>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entity` and write the assigned identity back.
    pub fn insert<T>(&mut self, converter: &EntityConverter<T>, entity: &mut T) -> Result<i64, ConvertError> {
        let values = converter.to_values(entity)?;
        let table = self.tables.entry(converter.table_name()).or_default();

        let id = match values.get(ID_COLUMN) {
            Some(Value::Integer(id)) => *id,
            _ => {
                table.next_id += 1;
                table.next_id
            }
        };

        let mut row: HashMap<String, Value> = values
            .iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect();
        row.insert(ID_COLUMN.to_string(), Value::Integer(id));
        table.rows.push(row);

        converter.assign_identity(Some(id), entity)?;
        Ok(id)
    }

    /// Rows of the converter's table, projected in cursor order.
    pub fn rows<T>(&self, converter: &EntityConverter<T>) -> Vec<Row> {
        let projection = converter.projection();
        self.tables
            .get(converter.table_name())
            .map(|table| {
                table
                    .rows
                    .iter()
                    .map(|stored| {
                        let cells = projection
                            .iter()
                            .map(|column| stored.get(*column).cloned().unwrap_or_default())
                            .collect();
                        Row::new(cells)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Read every row of the converter's table back into instances.
    pub fn all<T>(&self, converter: &EntityConverter<T>) -> Result<Vec<T>, ConvertError> {
        self.rows(converter)
            .iter()
            .map(|row| converter.from_row(row))
            .collect()
    }

    pub fn len(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |table| table.rows.len())
    }
}
