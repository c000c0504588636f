// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime engine for rowmap.
//!
//! Maps entity types, including types whose fields can only be set through a
//! constructor, onto rows of a relational store. The store itself is reached
//! through the narrow [`Cursor`] and [`RowValues`] interfaces.
//!
//! # Overview
//!
//! - [`EntityDescriptor`]: per-type accessor table, usually generated by
//!   `#[derive(Entity)]`
//! - [`ConverterRegistry`]: value converters keyed by value type, with
//!   [`ConverterFactory`] fallbacks
//! - [`EntityConverter`]: validated, immutable row/object converter of one
//!   entity type
//! - [`Registry`]: one converter per entity type, built eagerly or lazily
//! - [`prelude`]: convenient re-exports
//!
//! # Pipeline
//!
//! ```text
//! EntityDescriptor ─▶ enumerate_fields ─▶ ColumnResolver ─▶ resolve_binding
//!                                              │                  │
//!                                              ▼                  ▼
//!                                         Vec<Column>  ConstructionBinding
//!                                              └────────┬─────────┘
//!                                                       ▼
//!                                               EntityConverter
//! ```
//!
//! # Identity
//!
//! A column named [`ID_COLUMN`] is the row identity. It must be backed by a
//! mutable `Option<i64>` field. An absent identity is never written, so the
//! store assigns one; [`EntityConverter::assign_identity`] writes it back.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod binding;
mod column;
mod converter;
mod descriptor;
mod entity;
mod enumerate;
mod error;
mod registry;
mod row;
mod types;
mod value;

pub mod prelude;

pub use binding::{BoundParam, ConstructionBinding, resolve_binding};
pub use column::{Column, ColumnResolver};
#[cfg(feature = "chrono")]
pub use converter::DateTimeConverter;
#[cfg(feature = "uuid")]
pub use converter::UuidConverter;
pub use converter::{
    BlobConverter, BooleanConverter, ConverterFactory, ConverterRegistry, FieldConverter,
    IntegerConverter, JsonConverter, RealConverter, TextConverter, ValueConverter, erase
};
pub use descriptor::{
    AncestorDescriptor, ConstructorArgs, ConstructorDescriptor, Entity, EntityDescriptor,
    FieldAnnotations, FieldDescriptor, FieldModifiers, IndexDef, ParamDescriptor
};
pub use entity::{EntityConverter, SharedConverter, build_converter};
pub use enumerate::enumerate_fields;
pub use error::{ConvertError, IdentityViolation, MappingError};
pub use registry::{EntitySet, MappingOptions, Registry, RegistryBuilder};
pub use row::{Cursor, Row, RowValues};
pub use types::{FieldValue, TypeKey, downcast, downcast_ref, simple_name};
pub use value::{ColumnType, Value};

/// Name of the identity column.
pub const ID_COLUMN: &str = "_id";
