// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # rowmap
//!
//! One crate, all features. Re-exports:
//! - [`Entity`] derive macro from `rowmap-derive-impl`
//! - All types from `rowmap-core` ([`Registry`], [`EntityConverter`],
//!   [`ConverterRegistry`], [`Cursor`], [`RowValues`])
//!
//! Generated code refers to `rowmap_core`, so depend on both crates.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rowmap::{Entity, Registry, Row, Value};
//!
//! #[derive(Entity)]
//! #[entity(constructor)]
//! pub struct Note {
//!     #[entity(immutable)]
//!     pub title: String,
//!
//!     #[entity(default)]
//!     pub _id: Option<i64>
//! }
//!
//! let registry = Registry::new();
//! let converter = registry.register::<Note>()?;
//!
//! let row = Row::new(vec![Value::from("groceries"), Value::Integer(1)]);
//! let note = converter.from_row(&row)?;
//! ```

pub use rowmap_core::*;
pub use rowmap_derive_impl::Entity;
