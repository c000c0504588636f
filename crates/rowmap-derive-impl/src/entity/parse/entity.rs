// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-level parsing.
//!
//! # Supported Attributes
//!
//! | Attribute | Default | Description |
//! |-----------|---------|-------------|
//! | `constructor` | `false` | Struct literal is the primary constructor |
//! | `default` | `false` | Zero-argument construction via `Default` |

use darling::FromDeriveInput;
use syn::{DeriveInput, Generics, Ident};

use super::field::FieldDef;

/// Entity-level attributes parsed from `#[entity(...)]`.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entity), supports(struct_named))]
struct EntityAttrs {
    ident: Ident,

    generics: Generics,

    #[darling(default)]
    constructor: bool,

    #[darling(default, rename = "default")]
    use_default: bool
}

/// Complete parsed entity definition.
#[derive(Debug)]
pub struct EntityDef {
    /// Struct identifier, also used as table name.
    pub ident: Ident,

    /// Struct generics, forwarded to the generated impl.
    pub generics: Generics,

    /// The struct literal acts as primary constructor.
    pub constructor: bool,

    /// Instances can be created through `Default`.
    pub use_default: bool,

    /// Field embedding the base entity.
    pub base: Option<FieldDef>,

    /// Own fields in declaration order, base excluded.
    pub fields: Vec<FieldDef>
}

impl EntityDef {
    /// Parse entity definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to enum, union, tuple or unit struct
    /// - Unknown or malformed attributes
    /// - More than one `#[entity(base)]` field
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = EntityAttrs::from_derive_input(input)?;

        let parsed: Vec<FieldDef> = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => named
                    .named
                    .iter()
                    .map(FieldDef::from_field)
                    .collect::<darling::Result<Vec<_>>>()?,
                _ => {
                    return Err(darling::Error::custom("Entity requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(
                    darling::Error::custom("Entity can only be derived for structs")
                        .with_span(&input.ident)
                );
            }
        };

        let mut base = None;
        let mut fields = Vec::with_capacity(parsed.len());
        for field in parsed {
            if !field.is_base() {
                fields.push(field);
            } else if base.is_some() {
                return Err(darling::Error::custom("Entity can have at most one base field")
                    .with_span(&field.ident));
            } else {
                base = Some(field);
            }
        }

        Ok(Self {
            ident: attrs.ident,
            generics: attrs.generics,
            constructor: attrs.constructor,
            use_default: attrs.use_default,
            base,
            fields
        })
    }

    /// Struct name as string.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: DeriveInput) -> darling::Result<EntityDef> {
        EntityDef::from_derive_input(&input)
    }

    #[test]
    fn plain_struct_has_no_flags() {
        let entity = parse(syn::parse_quote! {
            struct Note {
                title: String,
            }
        })
        .unwrap();
        assert_eq!(entity.name_str(), "Note");
        assert!(!entity.constructor);
        assert!(!entity.use_default);
        assert!(entity.base.is_none());
        assert_eq!(entity.fields.len(), 1);
    }

    #[test]
    fn struct_flags_are_parsed() {
        let entity = parse(syn::parse_quote! {
            #[entity(constructor, default)]
            struct Note {
                title: String,
            }
        })
        .unwrap();
        assert!(entity.constructor);
        assert!(entity.use_default);
    }

    #[test]
    fn base_field_is_split_off() {
        let entity = parse(syn::parse_quote! {
            struct Note {
                title: String,
                #[entity(base)]
                audit: Audit,
                body: String,
            }
        })
        .unwrap();
        let names: Vec<String> = entity.fields.iter().map(FieldDef::name_str).collect();
        assert_eq!(names, vec!["title", "body"]);
        assert_eq!(entity.base.map(|base| base.name_str()).as_deref(), Some("audit"));
    }

    #[test]
    fn second_base_field_is_rejected() {
        let result = parse(syn::parse_quote! {
            struct Note {
                #[entity(base)]
                first: Audit,
                #[entity(base)]
                second: Audit,
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn enums_and_tuple_structs_are_rejected() {
        assert!(parse(syn::parse_quote! { enum Note { A } }).is_err());
        assert!(parse(syn::parse_quote! { struct Note(String); }).is_err());
    }

    #[test]
    fn unknown_struct_attribute_is_rejected() {
        let result = parse(syn::parse_quote! {
            #[entity(table = "notes")]
            struct Note {
                title: String,
            }
        });
        assert!(result.is_err());
    }

    #[test]
    fn malformed_field_attribute_is_rejected() {
        let result = parse(syn::parse_quote! {
            struct Note {
                #[entity(default = 5)]
                title: String,
            }
        });
        assert!(result.is_err());
    }
}
