// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! - [`storage`]: mapping behaviour from `#[entity(...)]`
//! - [`column`]: column metadata from `#[column(...)]`

mod column;
mod storage;

pub use column::ColumnConfig;
pub use storage::{ParamDefault, StorageConfig};
use syn::{Field, GenericArgument, Ident, PathArguments, Type};

/// Field definition with all parsed attributes.
///
/// # Example
///
/// ```rust,ignore
/// #[entity(immutable, default = "3")]  // StorageConfig
/// #[column(name = "prio", index)]      // ColumnConfig
/// pub priority: i32,
/// ```
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident: Ident,

    /// Declared field type.
    pub ty: Type,

    /// Mapping behaviour.
    pub storage: StorageConfig,

    /// Column metadata.
    pub column: ColumnConfig
}

impl FieldDef {
    /// Parse field definition from syn's `Field`.
    ///
    /// # Errors
    ///
    /// Returns error for unnamed fields and malformed attributes.
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Entity fields must be named").with_span(field)
        })?;

        let mut storage = StorageConfig::default();
        let mut column = ColumnConfig::default();
        for attr in &field.attrs {
            if attr.path().is_ident("entity") {
                storage = StorageConfig::from_attr(attr)?;
            } else if attr.path().is_ident("column") {
                column = ColumnConfig::from_attr(attr)?;
            }
        }

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            storage,
            column
        })
    }

    /// Get the field name as a string.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }

    /// Check if the field type is `Option<T>`.
    #[must_use]
    pub fn is_option(&self) -> bool {
        option_inner(&self.ty).is_some()
    }

    /// Value type: `T` for `Option<T>`, the declared type otherwise.
    #[must_use]
    pub fn value_ty(&self) -> &Type {
        option_inner(&self.ty).unwrap_or(&self.ty)
    }

    /// Check if the field embeds the base entity.
    #[must_use]
    pub fn is_base(&self) -> bool {
        self.storage.base
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None
    }
}
