// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Column metadata, from `#[column(...)]`.
//!
//! # Supported Attributes
//!
//! | Attribute | Example | Effect |
//! |-----------|---------|--------|
//! | `name` | `#[column(name = "heading")]` | Custom column name |
//! | `index` | `#[column(index)]` | Unnamed index |
//! | `index` | `#[column(index = "idx_title")]` | Named index |
//! | `unique` | `#[column(unique)]` | Unique index |
//! | `ignore` | `#[column(ignore)]` | Not stored |

use syn::{Attribute, LitStr, Meta};

/// Column metadata of a field.
#[derive(Debug, Clone, Default)]
pub struct ColumnConfig {
    /// Custom column name. Defaults to field name.
    pub name: Option<String>,

    /// Column is indexed.
    pub index: bool,

    /// Explicit index name.
    pub index_name: Option<String>,

    /// Index is unique. Implies `index`.
    pub unique: bool,

    /// Field is not stored.
    pub ignore: bool
}

impl ColumnConfig {
    /// Parse column config from `#[column(...)]` attribute.
    ///
    /// # Errors
    ///
    /// Unknown keys and non-string values.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        let mut config = Self::default();

        if let Meta::List(meta_list) = &attr.meta {
            meta_list.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    config.name = Some(value.value());
                } else if meta.path.is_ident("index") {
                    config.index = true;
                    if meta.input.peek(syn::Token![=]) {
                        let value: LitStr = meta.value()?.parse()?;
                        config.index_name = Some(value.value());
                    }
                } else if meta.path.is_ident("unique") {
                    config.unique = true;
                } else if meta.path.is_ident("ignore") {
                    config.ignore = true;
                } else {
                    return Err(meta.error("unknown column attribute"));
                }
                Ok(())
            })?;
        }

        Ok(config)
    }

    /// Check if this column should be indexed.
    #[must_use]
    pub fn has_index(&self) -> bool {
        self.index || self.unique
    }
}
