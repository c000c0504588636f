// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column resolution.
//!
//! Turns the enumerated fields of an entity into the ordered list of columns
//! its converter works with.
//!
//! # Rules
//!
//! For every field, in enumeration order:
//!
//! | Step | Condition | Outcome |
//! |------|-----------|---------|
//! | 1 | static storage, transient, or `ignore` annotation | skipped |
//! | 2 | column annotation | column name override |
//! | 3 | index annotation | index recorded |
//! | 4 | no converter for the value type | [`MappingError::UnsupportedFieldType`] |
//! | 5 | converter reports no column type | skipped |
//! | 6 | column named `_id` | identity checks |
//! | 7 | column name already taken | [`MappingError::DuplicateColumn`] |
//!
//! Annotations (steps 1, 2 and 3) are only consulted when
//! [`MappingOptions::use_annotations`] is set.

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
    ID_COLUMN,
    converter::{ConverterRegistry, ValueConverter},
    descriptor::{EntityDescriptor, FieldDescriptor, IndexDef},
    enumerate::enumerate_fields,
    error::{ConvertError, IdentityViolation, MappingError},
    registry::MappingOptions,
    row::{Cursor, RowValues},
    types::{FieldValue, TypeKey},
    value::ColumnType
};

/// One persisted field of an entity.
pub struct Column<T> {
    name:         &'static str,
    field:        FieldDescriptor<T>,
    index:        Option<IndexDef>,
    column_type:  ColumnType,
    converter:    Arc<dyn ValueConverter>,
    cursor_index: usize,
    is_identity:  bool,
    parameter:    Option<&'static str>
}

impl<T> Column<T> {
    /// Column name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the underlying field.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        self.field.name()
    }

    /// Index on the column.
    #[must_use]
    pub const fn index(&self) -> Option<IndexDef> {
        self.index
    }

    /// Storable type of the column.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Value type of the field.
    #[must_use]
    pub const fn value_type(&self) -> TypeKey {
        self.field.value_type()
    }

    /// Converter shared by every column of this value type.
    #[must_use]
    pub fn converter(&self) -> &Arc<dyn ValueConverter> {
        &self.converter
    }

    /// Position of the column in the row projection.
    #[must_use]
    pub const fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    /// Check if the value is supplied at construction.
    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        self.field.is_immutable()
    }

    /// Check if the field can hold an absent value.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.field.is_nullable()
    }

    /// Check if this is the identity column.
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        self.is_identity
    }

    /// Constructor parameter the column is bound to.
    #[must_use]
    pub const fn parameter(&self) -> Option<&'static str> {
        self.parameter
    }

    pub(crate) const fn bind(&mut self, parameter: &'static str) {
        self.parameter = Some(parameter);
    }

    pub(crate) fn read(&self, entity: &T) -> Option<FieldValue> {
        self.field.read(entity)
    }

    pub(crate) fn write(&self, entity: &mut T, value: Option<FieldValue>) -> Result<(), ConvertError> {
        self.field.write(entity, value)
    }

    /// Decode this column's cell. Null cells yield `None`.
    pub(crate) fn decode(&self, cursor: &dyn Cursor) -> Result<Option<FieldValue>, ConvertError> {
        if cursor.is_null(self.cursor_index) {
            return Ok(None);
        }
        self.converter.decode(cursor, self.cursor_index).map(Some)
    }

    pub(crate) fn encode(
        &self,
        value: Option<&FieldValue>,
        values: &mut RowValues
    ) -> Result<(), ConvertError> {
        self.converter.encode(value, self.name, values)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            name:         self.name,
            field:        self.field.clone(),
            index:        self.index,
            column_type:  self.column_type,
            converter:    Arc::clone(&self.converter),
            cursor_index: self.cursor_index,
            is_identity:  self.is_identity,
            parameter:    self.parameter
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("field", &self.field.name())
            .field("value_type", &self.field.value_type())
            .field("column_type", &self.column_type)
            .field("index", &self.index)
            .field("cursor_index", &self.cursor_index)
            .field("immutable", &self.is_immutable())
            .field("nullable", &self.is_nullable())
            .field("identity", &self.is_identity)
            .field("parameter", &self.parameter)
            .finish()
    }
}

/// Builds the column list of an entity.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver<'a> {
    converters: &'a ConverterRegistry,
    options:    MappingOptions
}

impl<'a> ColumnResolver<'a> {
    /// Resolver looking converters up in `converters`.
    pub fn new(converters: &'a ConverterRegistry, options: MappingOptions) -> Self {
        Self {
            converters,
            options
        }
    }

    /// Resolve the columns of `descriptor`.
    ///
    /// # Errors
    ///
    /// - [`MappingError::UnsupportedFieldType`] when a value type has no
    ///   converter
    /// - [`MappingError::InvalidIdentityColumn`] when `_id` is immutable, not
    ///   nullable, or not an `i64`
    /// - [`MappingError::DuplicateColumn`] when two fields share a column name
    pub fn resolve<T>(&self, descriptor: &EntityDescriptor<T>) -> Result<Vec<Column<T>>, MappingError> {
        let entity = descriptor.simple_name();
        let annotations = self.options.use_annotations;
        let mut columns: Vec<Column<T>> = Vec::new();

        for field in enumerate_fields(descriptor) {
            if let Some(reason) = skip_reason(field, annotations) {
                debug!(entity, field = field.name(), reason, "field is not persisted");
                continue;
            }

            let name = match field.annotations().column {
                Some(name) if annotations => name,
                _ => field.name()
            };
            let index = if annotations {
                field.annotations().index
            } else {
                None
            };

            let converter = self.converters.lookup(&field.value_type()).ok_or_else(|| {
                MappingError::UnsupportedFieldType {
                    entity:     entity.to_string(),
                    field:      field.name().to_string(),
                    value_type: field.value_type().name().to_string()
                }
            })?;
            let Some(column_type) = converter.column_type() else {
                debug!(entity, field = field.name(), reason = "no column type", "field is not persisted");
                continue;
            };

            let is_identity = name == ID_COLUMN;
            if is_identity {
                check_identity(entity, name, field)?;
            }
            if columns.iter().any(|column| column.name == name) {
                return Err(MappingError::DuplicateColumn {
                    entity: entity.to_string(),
                    column: name.to_string()
                });
            }

            columns.push(Column {
                name,
                field: field.clone(),
                index,
                column_type,
                converter,
                cursor_index: columns.len(),
                is_identity,
                parameter: None
            });
        }

        Ok(columns)
    }
}

fn skip_reason<T>(field: &FieldDescriptor<T>, annotations: bool) -> Option<&'static str> {
    let modifiers = field.modifiers();
    if modifiers.is_static {
        Some("static")
    } else if modifiers.is_transient {
        Some("transient")
    } else if annotations && field.annotations().ignore {
        Some("ignored")
    } else {
        None
    }
}

fn check_identity<T>(entity: &str, column: &str, field: &FieldDescriptor<T>) -> Result<(), MappingError> {
    let reason = if field.is_immutable() {
        IdentityViolation::Immutable
    } else if !field.is_nullable() {
        IdentityViolation::NotNullable
    } else if !field.value_type().is::<i64>() {
        IdentityViolation::NotInteger
    } else {
        return Ok(());
    };
    Err(MappingError::InvalidIdentityColumn {
        entity: entity.to_string(),
        column: column.to_string(),
        reason
    })
}
