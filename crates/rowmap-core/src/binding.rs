// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Constructor binding.
//!
//! Immutable fields can only be populated through the primary constructor.
//! This module pairs constructor parameters with the columns that feed them.
//!
//! A parameter binds to the column with the same name, the same value type
//! and the same nullability. Parameters that do not bind must have a
//! default; immutable columns that stay unbound are an error.

use std::fmt;

use crate::{
    column::Column,
    descriptor::{ConstructorDescriptor, EntityDescriptor, ParamDescriptor},
    error::MappingError
};

/// Constructor parameter together with the column that supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundParam {
    /// The parameter.
    pub param:  ParamDescriptor,
    /// Position of the bound column in the column list. `None` when the
    /// parameter falls back to its default.
    pub column: Option<usize>
}

/// How instances of an entity with immutable fields are constructed.
pub struct ConstructionBinding<T> {
    constructor: ConstructorDescriptor<T>,
    params:      Vec<BoundParam>
}

impl<T> Clone for ConstructionBinding<T> {
    fn clone(&self) -> Self {
        Self {
            constructor: self.constructor.clone(),
            params:      self.params.clone()
        }
    }
}

impl<T> fmt::Debug for ConstructionBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructionBinding")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<T> ConstructionBinding<T> {
    /// The primary constructor.
    #[must_use]
    pub const fn constructor(&self) -> &ConstructorDescriptor<T> {
        &self.constructor
    }

    /// Parameters in declaration order with their bound columns.
    #[must_use]
    pub fn params(&self) -> &[BoundParam] {
        &self.params
    }

    /// Parameter bound to the column at `column`.
    pub fn parameter_for(&self, column: usize) -> Option<&ParamDescriptor> {
        self.params
            .iter()
            .find(|bound| bound.column == Some(column))
            .map(|bound| &bound.param)
    }
}

/// Bind the primary constructor of `descriptor` to `columns`.
///
/// Returns `None` when no column is immutable; such types are instantiated
/// without arguments and populated field by field.
///
/// # Errors
///
/// - [`MappingError::ImmutableFieldsRequireCompactConstruction`] when the
///   type is not a compact declaration
/// - [`MappingError::NoPrimaryConstructor`] when no constructor is declared
/// - [`MappingError::UnboundConstructorParameter`] when a parameter without
///   default matches no column
/// - [`MappingError::UnmappedImmutableColumn`] when an immutable column
///   matches no parameter
pub fn resolve_binding<T>(
    descriptor: &EntityDescriptor<T>,
    columns: &[Column<T>]
) -> Result<Option<ConstructionBinding<T>>, MappingError> {
    if !columns.iter().any(Column::is_immutable) {
        return Ok(None);
    }

    let entity = descriptor.simple_name();
    if !descriptor.is_compact_declaration() {
        return Err(MappingError::ImmutableFieldsRequireCompactConstruction {
            entity: entity.to_string()
        });
    }
    let constructor = descriptor
        .primary_constructor()
        .ok_or_else(|| MappingError::NoPrimaryConstructor {
            entity: entity.to_string()
        })?;

    let mut params = Vec::with_capacity(constructor.params().len());
    for param in constructor.params() {
        let column = columns.iter().position(|column| binds_to(column, param));
        if column.is_none() && !param.has_default() {
            return Err(MappingError::UnboundConstructorParameter {
                entity:    entity.to_string(),
                parameter: param.name().to_string()
            });
        }
        params.push(BoundParam {
            param: *param,
            column
        });
    }

    for (position, column) in columns.iter().enumerate() {
        let bound = params.iter().any(|bound| bound.column == Some(position));
        if column.is_immutable() && !bound {
            return Err(MappingError::UnmappedImmutableColumn {
                entity: entity.to_string(),
                column: column.name().to_string()
            });
        }
    }

    Ok(Some(ConstructionBinding {
        constructor: constructor.clone(),
        params
    }))
}

fn binds_to<T>(column: &Column<T>, param: &ParamDescriptor) -> bool {
    column.name() == param.name()
        && column.value_type() == param.value_type()
        && column.is_nullable() == param.is_nullable()
}
