// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row to object marshaling.
//!
//! An [`EntityConverter`] is built once per entity type. Building validates
//! the type and fixes its columns and construction path; after that the
//! converter is immutable and shared.
//!
//! # Construction Paths
//!
//! | Type | Path |
//! |------|------|
//! | has immutable columns | primary constructor with bound arguments |
//! | declares a default constructor | default constructor, then setters |
//! | primary constructor with defaults only | constructor without arguments, then setters |
//!
//! # Reading
//!
//! ```text
//! cursor ──▶ bound columns ──▶ ConstructorArgs ──▶ constructor ──▶ entity
//!                                                                   │
//!        ──▶ mutable columns ──────────────── setters ◀─────────────┘
//! ```
//!
//! Columns whose cursor index lies beyond the row width are skipped, so rows
//! written before a column was added still read back.

use std::{fmt, sync::Arc};

use tracing::{debug, trace};

use crate::{
    binding::{ConstructionBinding, resolve_binding},
    column::{Column, ColumnResolver},
    converter::ConverterRegistry,
    descriptor::{ConstructorArgs, ConstructorDescriptor, Entity, EntityDescriptor},
    error::{ConvertError, MappingError},
    registry::MappingOptions,
    row::{Cursor, RowValues},
    types::{FieldValue, downcast_ref}
};

enum Construction<T> {
    Bound(ConstructionBinding<T>),
    Default(fn() -> T),
    Nullary(ConstructorDescriptor<T>)
}

impl<T> Construction<T> {
    const fn mode(&self) -> &'static str {
        match self {
            Self::Bound(_) => "constructor",
            Self::Default(_) => "default",
            Self::Nullary(_) => "nullary constructor"
        }
    }
}

/// Converter between rows and instances of `T`.
///
/// # Example
///
/// ```rust
/// use rowmap_core::{
///     ConverterRegistry, EntityConverter, EntityDescriptor, FieldDescriptor, MappingOptions,
///     Row, Value
/// };
///
/// #[derive(Default)]
/// struct Tag {
///     label: String,
///     _id:   Option<i64>
/// }
///
/// let descriptor = EntityDescriptor::<Tag>::new("Tag")
///     .field(FieldDescriptor::required_mut::<String>("label", |t| &t.label, |t| &mut t.label))
///     .field(FieldDescriptor::nullable_mut::<i64>("_id", |t| &t._id, |t| &mut t._id))
///     .default_constructor(Tag::default);
///
/// let converters = ConverterRegistry::with_defaults();
/// let converter =
///     EntityConverter::build(descriptor, &converters, MappingOptions::default()).unwrap();
///
/// let tag = converter
///     .from_row(&Row::new(vec![Value::from("rust"), Value::Integer(7)]))
///     .unwrap();
/// assert_eq!(tag.label, "rust");
/// assert_eq!(converter.read_identity(&tag), Some(7));
/// assert_eq!(converter.projection(), vec!["label", "_id"]);
/// ```
pub struct EntityConverter<T> {
    table_name:   &'static str,
    columns:      Vec<Column<T>>,
    identity:     Option<usize>,
    construction: Construction<T>
}

/// Build the converter of `T` from its derived or hand-written descriptor.
///
/// # Errors
///
/// Any [`MappingError`] describing why `T` cannot be mapped.
pub fn build_converter<T: Entity>(
    converters: &ConverterRegistry,
    options: MappingOptions
) -> Result<EntityConverter<T>, MappingError> {
    EntityConverter::build(T::descriptor(), converters, options)
}

impl<T: 'static> EntityConverter<T> {
    /// Validate `descriptor` and build its converter.
    ///
    /// # Errors
    ///
    /// Any [`MappingError`] describing why the type cannot be mapped.
    pub fn build(
        descriptor: EntityDescriptor<T>,
        converters: &ConverterRegistry,
        options: MappingOptions
    ) -> Result<Self, MappingError> {
        let table_name = descriptor.simple_name();
        if table_name.is_empty() {
            return Err(MappingError::MissingTypeName {
                type_name: descriptor.type_name().to_string()
            });
        }

        let mut columns = ColumnResolver::new(converters, options).resolve(&descriptor)?;
        let construction = match resolve_binding(&descriptor, &columns)? {
            Some(binding) => {
                for bound in binding.params() {
                    let Some(position) = bound.column else {
                        continue;
                    };
                    if let Some(column) = columns.get_mut(position) {
                        column.bind(bound.param.name());
                    }
                }
                Construction::Bound(binding)
            }
            None => zero_arg(&descriptor)?
        };
        let identity = columns.iter().position(Column::is_identity);

        debug!(
            table = table_name,
            columns = columns.len(),
            identity = identity.is_some(),
            construction = construction.mode(),
            "entity converter built"
        );

        Ok(Self {
            table_name,
            columns,
            identity,
            construction
        })
    }
}

fn zero_arg<T>(descriptor: &EntityDescriptor<T>) -> Result<Construction<T>, MappingError> {
    if let Some(constructor) = descriptor.zero_arg_constructor() {
        return Ok(Construction::Default(constructor));
    }
    match descriptor.primary_constructor() {
        Some(constructor) if constructor.is_nullary() => Ok(Construction::Nullary(constructor.clone())),
        _ => Err(MappingError::NoDefaultConstructor {
            entity: descriptor.simple_name().to_string()
        })
    }
}

impl<T> EntityConverter<T> {
    /// Table name, the entity's simple name.
    #[must_use]
    pub const fn table_name(&self) -> &'static str {
        self.table_name
    }

    /// Columns in cursor order.
    #[must_use]
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|column| column.name() == name)
    }

    /// The `_id` column, if the entity has one.
    pub fn identity_column(&self) -> Option<&Column<T>> {
        self.identity.and_then(|position| self.columns.get(position))
    }

    /// Constructor binding, `None` for entities built without arguments.
    pub const fn binding(&self) -> Option<&ConstructionBinding<T>> {
        match &self.construction {
            Construction::Bound(binding) => Some(binding),
            Construction::Default(_) | Construction::Nullary(_) => None
        }
    }

    /// Column names in cursor order, the projection to query rows with.
    pub fn projection(&self) -> Vec<&'static str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Read an instance from the current row of `cursor`.
    ///
    /// # Errors
    ///
    /// Converter and constructor failures, passed through unchanged.
    pub fn from_row(&self, cursor: &dyn Cursor) -> Result<T, ConvertError> {
        let width = cursor.column_count();
        trace!(table = self.table_name, width, "reading entity");

        let mut entity = match &self.construction {
            Construction::Bound(binding) => {
                let mut args = ConstructorArgs::new();
                for bound in binding.params() {
                    let Some(column) = bound.column.and_then(|position| self.columns.get(position)) else {
                        continue;
                    };
                    if column.cursor_index() < width {
                        args.insert(bound.param.name(), column.decode(cursor)?);
                    }
                }
                binding.constructor().invoke(args)?
            }
            Construction::Default(constructor) => constructor(),
            Construction::Nullary(constructor) => constructor.invoke(ConstructorArgs::new())?
        };

        for column in &self.columns {
            if column.is_immutable() || column.cursor_index() >= width {
                continue;
            }
            column.write(&mut entity, column.decode(cursor)?)?;
        }

        Ok(entity)
    }

    /// Write the cells of `entity` into `values`.
    ///
    /// Absent values become explicit nulls, except for the identity column
    /// which is left to the store.
    ///
    /// # Errors
    ///
    /// Converter failures, passed through unchanged.
    pub fn to_row(&self, entity: &T, values: &mut RowValues) -> Result<(), ConvertError> {
        trace!(table = self.table_name, "writing entity");
        for column in &self.columns {
            if !column.column_type().is_stored() {
                continue;
            }
            let value = column.read(entity);
            if value.is_none() && !column.is_identity() {
                values.put_null(column.name());
                continue;
            }
            column.encode(value.as_ref(), values)?;
        }
        Ok(())
    }

    /// Cells of `entity` as a fresh [`RowValues`].
    ///
    /// # Errors
    ///
    /// See [`to_row`](Self::to_row).
    pub fn to_values(&self, entity: &T) -> Result<RowValues, ConvertError> {
        let mut values = RowValues::new();
        self.to_row(entity, &mut values)?;
        Ok(values)
    }

    /// Set the identity of `entity`, typically after the store assigned one.
    ///
    /// Does nothing for entities without identity column.
    ///
    /// # Errors
    ///
    /// Setter failures, passed through unchanged.
    pub fn assign_identity(&self, id: Option<i64>, entity: &mut T) -> Result<(), ConvertError> {
        match self.identity_column() {
            Some(column) => column.write(entity, id.map(|id| Box::new(id) as FieldValue)),
            None => Ok(())
        }
    }

    /// Identity of `entity`. `None` when absent or without identity column.
    pub fn read_identity(&self, entity: &T) -> Option<i64> {
        let value = self.identity_column()?.read(entity)?;
        downcast_ref::<i64>(&value).copied()
    }
}

impl<T> fmt::Debug for EntityConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityConverter")
            .field("table_name", &self.table_name)
            .field("columns", &self.columns)
            .field("construction", &self.construction.mode())
            .finish()
    }
}

/// Shared handle to a built converter.
pub type SharedConverter<T> = Arc<EntityConverter<T>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        descriptor::{FieldDescriptor, ParamDescriptor},
        row::Row,
        value::Value
    };

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Task {
        title:    String,
        priority: i32,
        done:     bool,
        note:     Option<String>,
        _id:      Option<i64>
    }

    fn mutable_task() -> EntityDescriptor<Task> {
        EntityDescriptor::<Task>::new("Task")
            .field(FieldDescriptor::required_mut::<String>("title", |t| &t.title, |t| &mut t.title))
            .field(FieldDescriptor::required_mut::<i32>("priority", |t| &t.priority, |t| &mut t.priority))
            .field(FieldDescriptor::required_mut::<bool>("done", |t| &t.done, |t| &mut t.done))
            .field(FieldDescriptor::nullable_mut::<String>("note", |t| &t.note, |t| &mut t.note))
            .field(FieldDescriptor::nullable_mut::<i64>("_id", |t| &t._id, |t| &mut t._id))
            .default_constructor(Task::default)
    }

    fn compact_task() -> EntityDescriptor<Task> {
        EntityDescriptor::<Task>::new("Task")
            .compact()
            .field(FieldDescriptor::required::<String>("title", |t| &t.title))
            .field(FieldDescriptor::required::<i32>("priority", |t| &t.priority))
            .field(FieldDescriptor::required_mut::<bool>("done", |t| &t.done, |t| &mut t.done))
            .field(FieldDescriptor::nullable::<String>("note", |t| &t.note))
            .field(FieldDescriptor::nullable_mut::<i64>("_id", |t| &t._id, |t| &mut t._id))
            .constructor(ConstructorDescriptor::new(
                vec![
                    ParamDescriptor::required::<String>("title"),
                    ParamDescriptor::required::<i32>("priority").with_default(),
                    ParamDescriptor::nullable::<String>("note").with_default(),
                ],
                |mut args| {
                    Ok(Task {
                        title:    args.take_required("title")?,
                        priority: args.take_required_or_else("priority", || 5)?,
                        done:     false,
                        note:     args.take_nullable_or_else("note", || Some("none".to_string()))?,
                        _id:      None
                    })
                }
            ))
    }

    fn build(descriptor: EntityDescriptor<Task>) -> EntityConverter<Task> {
        EntityConverter::build(descriptor, &ConverterRegistry::with_defaults(), MappingOptions::default())
            .expect("build")
    }

    fn sample() -> Task {
        Task {
            title:    "write".to_string(),
            priority: 2,
            done:     true,
            note:     Some("soon".to_string()),
            _id:      Some(11)
        }
    }

    fn row_of(values: &RowValues, projection: &[&str]) -> Row {
        Row::new(
            projection
                .iter()
                .map(|name| values.get(name).cloned().unwrap_or_default())
                .collect()
        )
    }

    #[test]
    fn mutable_entity_round_trips() {
        let converter = build(mutable_task());
        assert!(converter.binding().is_none());

        let task = sample();
        let values = converter.to_values(&task).expect("to_values");
        let read = converter
            .from_row(&row_of(&values, &converter.projection()))
            .expect("from_row");
        assert_eq!(read, task);
    }

    #[test]
    fn compact_entity_round_trips() {
        let converter = build(compact_task());
        let binding = converter.binding().expect("binding");
        assert_eq!(binding.params().len(), 3);
        assert_eq!(converter.column("title").and_then(Column::parameter), Some("title"));
        assert_eq!(converter.column("done").and_then(Column::parameter), None);

        let task = sample();
        let values = converter.to_values(&task).expect("to_values");
        let read = converter
            .from_row(&row_of(&values, &converter.projection()))
            .expect("from_row");
        assert_eq!(read, task);
    }

    #[test]
    fn absent_identity_is_not_written() {
        let converter = build(mutable_task());
        let task = Task {
            note: None,
            _id: None,
            ..sample()
        };
        let values = converter.to_values(&task).expect("to_values");

        assert!(!values.contains("_id"));
        assert_eq!(values.get("note"), Some(&Value::Null));
        assert_eq!(values.get("done"), Some(&Value::Integer(1)));
    }

    #[test]
    fn null_cells_clear_nullable_and_keep_required() {
        let converter = build(mutable_task());
        let row = Row::new(vec![
            Value::Null,
            Value::Integer(4),
            Value::Integer(0),
            Value::Null,
            Value::Null,
        ]);
        let task = converter.from_row(&row).expect("from_row");
        assert_eq!(task, Task {
            priority: 4,
            ..Task::default()
        });
    }

    #[test]
    fn short_rows_fall_back_to_defaults() {
        let converter = build(compact_task());
        let row = Row::new(vec![Value::from("old")]);
        let task = converter.from_row(&row).expect("from_row");

        assert_eq!(task.title, "old");
        assert_eq!(task.priority, 5);
        assert_eq!(task.note.as_deref(), Some("none"));
        assert_eq!(task._id, None);
    }

    #[test]
    fn identity_assignment() {
        let converter = build(mutable_task());
        let mut task = Task::default();
        assert_eq!(converter.read_identity(&task), None);

        converter.assign_identity(Some(3), &mut task).expect("assign");
        assert_eq!(converter.read_identity(&task), Some(3));
        assert_eq!(converter.identity_column().map(Column::name), Some("_id"));

        converter.assign_identity(None, &mut task).expect("clear");
        assert_eq!(task._id, None);
    }

    #[test]
    fn entity_without_identity_ignores_assignment() {
        let descriptor = EntityDescriptor::<Task>::new("Task")
            .field(FieldDescriptor::required_mut::<String>("title", |t| &t.title, |t| &mut t.title))
            .default_constructor(Task::default);
        let converter = build(descriptor);
        let mut task = Task::default();

        converter.assign_identity(Some(1), &mut task).expect("assign");
        assert_eq!(task._id, None);
        assert!(converter.identity_column().is_none());
        assert_eq!(converter.read_identity(&task), None);
    }

    #[test]
    fn nullary_constructor_is_used_without_default() {
        let descriptor = EntityDescriptor::<Task>::new("Task")
            .field(FieldDescriptor::required_mut::<bool>("done", |t| &t.done, |t| &mut t.done))
            .constructor(ConstructorDescriptor::new(
                vec![ParamDescriptor::required::<String>("title").with_default()],
                |mut args| {
                    Ok(Task {
                        title: args.take_required_or_else("title", || "untitled".to_string())?,
                        ..Task::default()
                    })
                }
            ));
        let converter = build(descriptor);
        let task = converter
            .from_row(&Row::new(vec![Value::Integer(1)]))
            .expect("from_row");
        assert_eq!(task.title, "untitled");
        assert!(task.done);
    }

    #[test]
    fn no_zero_arg_path_is_rejected() {
        let descriptor = EntityDescriptor::<Task>::new("Task")
            .field(FieldDescriptor::required_mut::<bool>("done", |t| &t.done, |t| &mut t.done));
        let err = EntityConverter::build(
            descriptor,
            &ConverterRegistry::with_defaults(),
            MappingOptions::default()
        )
        .unwrap_err();
        assert_eq!(
            err,
            MappingError::NoDefaultConstructor {
                entity: "Task".to_string()
            }
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let descriptor = EntityDescriptor::<Task>::new("").default_constructor(Task::default);
        let err = EntityConverter::build(
            descriptor,
            &ConverterRegistry::with_defaults(),
            MappingOptions::default()
        )
        .unwrap_err();
        assert!(matches!(err, MappingError::MissingTypeName { .. }));
    }

    #[test]
    fn converter_failures_pass_through() {
        let converter = build(mutable_task());
        let row = Row::new(vec![Value::Integer(1)]);
        assert!(matches!(
            converter.from_row(&row),
            Err(ConvertError::UnexpectedValue {
                index:    0,
                expected: "TEXT",
                ..
            })
        ));
    }
}
