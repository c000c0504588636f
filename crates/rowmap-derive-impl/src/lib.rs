// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Procedural macro implementation for rowmap.
//!
//! Use the `rowmap` crate instead of depending on this one directly.

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

mod entity;

use proc_macro::TokenStream;

/// Derive the accessor table of an entity.
///
/// Generates an implementation of `rowmap::Entity` whose descriptor lists the
/// struct's fields with getters and setters, its constructor and its base
/// entity.
///
/// # Entity Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[entity(constructor)]` | The struct literal is the primary constructor. Every field except the base becomes a parameter. |
/// | `#[entity(default)]` | Build instances without arguments through `Default`. |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[entity(immutable)]` | No setter; the value is passed to the constructor. |
/// | `#[entity(transient)]` | Never stored. |
/// | `#[entity(default)]` | The constructor parameter defaults to `Default::default()`. |
/// | `#[entity(default = "expr")]` | The constructor parameter defaults to `expr`. |
/// | `#[entity(base)]` | Embedded base entity; its fields follow the struct's own. |
/// | `#[column(name = "...")]` | Column name override. |
/// | `#[column(index)]`, `#[column(index = "name")]` | Index on the column. |
/// | `#[column(unique)]` | Unique index on the column. |
/// | `#[column(ignore)]` | Not stored. |
///
/// `#[column(...)]` is only honoured by registries built with annotations
/// enabled. `Option<T>` fields are nullable columns of type `T`.
///
/// # Example
///
/// ```rust,ignore
/// use rowmap::Entity;
///
/// #[derive(Entity)]
/// #[entity(constructor)]
/// pub struct Note {
///     #[entity(immutable)]
///     pub title: String,
///
///     #[entity(immutable, default = "3")]
///     pub priority: i32,
///
///     #[entity(default)]
///     pub _id: Option<i64>
/// }
/// ```
#[proc_macro_derive(Entity, attributes(entity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive(input)
}
