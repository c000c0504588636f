// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Attribute parsing for the Entity derive macro.
//!
//! Struct-level `#[entity(...)]` attributes are parsed with [`darling`].
//! Field-level `#[entity(...)]` and `#[column(...)]` attributes use manual
//! nested-meta parsing since they are mostly markers.
//!
//! # Architecture
//!
//! ```text
//! parse.rs (coordinator)
//! ├── entity.rs         EntityDef, struct-level attributes
//! └── field.rs          FieldDef
//!     ├── column.rs     #[column(...)]
//!     └── storage.rs    #[entity(...)] on fields
//! ```
//!
//! # Data Structures
//!
//! ```text
//! EntityDef
//! ├── ident: Ident            (struct name, also the table name)
//! ├── generics: Generics
//! ├── constructor: bool       (struct literal is the primary constructor)
//! ├── use_default: bool       (zero-argument construction via Default)
//! ├── base: Option<FieldDef>  (embedded ancestor)
//! └── fields: Vec<FieldDef>
//!     └── FieldDef
//!         ├── ident: Ident
//!         ├── ty: Type
//!         ├── storage: StorageConfig
//!         └── column: ColumnConfig
//! ```

mod entity;
mod field;

pub use entity::EntityDef;
pub use field::{ColumnConfig, FieldDef, ParamDefault};
