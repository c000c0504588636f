// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Mapping behaviour of a field, from `#[entity(...)]`.
//!
//! | Attribute | Effect |
//! |-----------|--------|
//! | `immutable` | no setter, value supplied to the constructor |
//! | `transient` | never stored |
//! | `default` | constructor parameter defaults to `Default::default()` |
//! | `default = "expr"` | constructor parameter defaults to `expr` |
//! | `base` | field embeds the base entity |

use syn::{Attribute, Expr, LitStr, Meta};

/// Default value of a constructor parameter.
#[derive(Debug, Clone)]
pub enum ParamDefault {
    /// `Default::default()`.
    Trait,

    /// Custom expression.
    Expr(Expr)
}

/// Mapping configuration of a field.
#[derive(Debug, Default, Clone)]
pub struct StorageConfig {
    /// Field has no setter.
    pub immutable: bool,

    /// Field is never stored.
    pub transient: bool,

    /// Default value of the constructor parameter.
    pub default: Option<ParamDefault>,

    /// Field embeds the base entity.
    pub base: bool
}

impl StorageConfig {
    /// Parse storage config from a field-level `#[entity(...)]` attribute.
    ///
    /// # Errors
    ///
    /// Unknown keys and `default` values that are not string literals holding
    /// an expression.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        let mut config = Self::default();

        if let Meta::List(meta_list) = &attr.meta {
            meta_list.parse_nested_meta(|meta| {
                if meta.path.is_ident("immutable") {
                    config.immutable = true;
                } else if meta.path.is_ident("transient") {
                    config.transient = true;
                } else if meta.path.is_ident("base") {
                    config.base = true;
                } else if meta.path.is_ident("default") {
                    if meta.input.peek(syn::Token![=]) {
                        let value: LitStr = meta.value()?.parse()?;
                        config.default = Some(ParamDefault::Expr(value.parse()?));
                    } else {
                        config.default = Some(ParamDefault::Trait);
                    }
                } else {
                    return Err(meta.error("unknown entity field attribute"));
                }
                Ok(())
            })?;
        }

        Ok(config)
    }

    /// Check if the constructor parameter has a default.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}
