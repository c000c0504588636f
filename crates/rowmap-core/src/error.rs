// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error types.
//!
//! Two families are kept apart:
//!
//! - [`MappingError`]: structural problems with an entity type. Raised once,
//!   while its [`EntityConverter`](crate::EntityConverter) is being built.
//! - [`ConvertError`]: failures while converting a single row or instance.
//!   These come from value converters and the row store and are passed
//!   through unmodified.

use std::fmt;

use thiserror::Error;

/// Why a field cannot serve as the identity column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityViolation {
    /// The field has no setter.
    Immutable,

    /// The field cannot hold an absent value.
    NotNullable,

    /// The field value is not an `i64`.
    NotInteger
}

impl fmt::Display for IdentityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immutable => f.write_str("field cannot be immutable"),
            Self::NotNullable => f.write_str("field has to be nullable"),
            Self::NotInteger => f.write_str("field has to hold an i64")
        }
    }
}

/// Failure to build an entity converter.
///
/// Every variant names the entity so that registration logs point straight at
/// the offending type definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The type has no resolvable simple name.
    #[error("cannot map entity type without a name: {type_name}")]
    MissingTypeName {
        /// Full type name as reported by the compiler.
        type_name: String
    },

    /// No converter is registered for a field's value type.
    #[error("do not know how to convert field {field} in entity {entity} of type {value_type}")]
    UnsupportedFieldType {
        /// Entity simple name.
        entity:     String,
        /// Field name.
        field:      String,
        /// Value type the lookup was attempted with.
        value_type: String
    },

    /// The identity column breaks one of its invariants.
    #[error("{entity}.{column} cannot be the identity column: {reason}")]
    InvalidIdentityColumn {
        /// Entity simple name.
        entity: String,
        /// Column name.
        column: String,
        /// Violated invariant.
        reason: IdentityViolation
    },

    /// Immutable fields exist but the type has no compact declaration.
    #[error(
        "{entity} has immutable fields and is not a compact declaration; ignore the immutable \
         fields or declare a primary constructor"
    )]
    ImmutableFieldsRequireCompactConstruction {
        /// Entity simple name.
        entity: String
    },

    /// Immutable fields exist but no primary constructor is declared.
    #[error("{entity} has immutable fields and no primary constructor")]
    NoPrimaryConstructor {
        /// Entity simple name.
        entity: String
    },

    /// A required constructor parameter matches no column.
    #[error("{entity} constructor parameter {parameter} doesn't map to any column")]
    UnboundConstructorParameter {
        /// Entity simple name.
        entity:    String,
        /// Parameter name.
        parameter: String
    },

    /// An immutable column matches no constructor parameter.
    #[error("{entity} immutable field {column} doesn't map to a constructor parameter")]
    UnmappedImmutableColumn {
        /// Entity simple name.
        entity: String,
        /// Column name.
        column: String
    },

    /// Two fields resolve to the same column name.
    #[error("{entity} declares column {column} more than once")]
    DuplicateColumn {
        /// Entity simple name.
        entity: String,
        /// Column name.
        column: String
    },

    /// The type offers no way to create an instance without arguments.
    #[error(
        "{entity} has no zero-argument construction path; declare a default constructor or \
         default every constructor parameter"
    )]
    NoDefaultConstructor {
        /// Entity simple name.
        entity: String
    }
}

impl MappingError {
    /// Name of the entity the error refers to, if known.
    #[must_use]
    pub fn entity(&self) -> Option<&str> {
        match self {
            Self::MissingTypeName {
                ..
            } => None,
            Self::UnsupportedFieldType {
                entity, ..
            }
            | Self::InvalidIdentityColumn {
                entity, ..
            }
            | Self::ImmutableFieldsRequireCompactConstruction {
                entity
            }
            | Self::NoPrimaryConstructor {
                entity
            }
            | Self::UnboundConstructorParameter {
                entity, ..
            }
            | Self::UnmappedImmutableColumn {
                entity, ..
            }
            | Self::DuplicateColumn {
                entity, ..
            }
            | Self::NoDefaultConstructor {
                entity
            } => Some(entity)
        }
    }
}

/// Failure while converting a single row or instance.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The requested cell lies outside the row.
    #[error("column {index} is out of range for a row of {width} columns")]
    ColumnOutOfRange {
        /// Requested cell index.
        index: usize,
        /// Number of cells in the row.
        width: usize
    },

    /// The cell holds a value of another storage class.
    #[error("expected {expected} in column {index}, found {found}")]
    UnexpectedValue {
        /// Cell index.
        index:    usize,
        /// Expected storage class.
        expected: &'static str,
        /// Storage class found.
        found:    &'static str
    },

    /// An integer does not fit the field type.
    #[error("value {value} does not fit into {target}")]
    Overflow {
        /// Stored value.
        value:  i64,
        /// Target Rust type.
        target: &'static str
    },

    /// A type-erased value is not of the expected Rust type.
    #[error("value for {name} is not a {expected}")]
    TypeMismatch {
        /// Field, parameter or column name.
        name:     String,
        /// Expected Rust type.
        expected: &'static str
    },

    /// A constructor argument without default was not supplied.
    #[error("constructor argument {0} is missing")]
    MissingArgument(String),

    /// A non-nullable constructor argument was supplied as null.
    #[error("constructor argument {0} is null")]
    NullArgument(String),

    /// A write was attempted on a field without setter.
    #[error("field {0} is immutable")]
    ImmutableField(String),

    /// JSON encoding or decoding failed.
    #[error("json conversion failed: {0}")]
    Json(#[from] serde_json::Error),

    /// A custom converter rejected the stored data.
    #[error("failed to decode column {index}: {message}")]
    Decode {
        /// Cell index.
        index:   usize,
        /// Converter-specific description.
        message: String
    }
}
