// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `impl Entity` generation.
//!
//! # Generated Code
//!
//! ```rust,ignore
//! impl ::rowmap_core::Entity for Note {
//!     fn descriptor() -> ::rowmap_core::EntityDescriptor<Self> {
//!         ::rowmap_core::EntityDescriptor::<Self>::new("Note")
//!             .compact()
//!             .field(::rowmap_core::FieldDescriptor::<Self>::required::<String>(
//!                 "title", |entity| &entity.title))
//!             .field(::rowmap_core::FieldDescriptor::<Self>::nullable_mut::<i64>(
//!                 "_id", |entity| &entity._id, |entity| &mut entity._id))
//!             .constructor(::rowmap_core::ConstructorDescriptor::new(
//!                 vec![/* ParamDescriptor per field */],
//!                 |mut args| Ok(Self { title: args.take_required::<String>("title")?, .. })))
//!     }
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{ColumnConfig, EntityDef, FieldDef, ParamDefault};

/// Generate the `Entity` implementation.
pub fn generate(entity: &EntityDef) -> TokenStream {
    let ident = &entity.ident;
    let name = entity.name_str();
    let (impl_generics, ty_generics, where_clause) = entity.generics.split_for_impl();

    let compact = entity.constructor.then(|| quote! { .compact() });
    let fields = entity.fields.iter().map(generate_field);
    let base = entity.base.as_ref().map(generate_base);
    let constructor = entity.constructor.then(|| generate_constructor(entity));
    let default_constructor = entity
        .use_default
        .then(|| quote! { .default_constructor(<Self as ::core::default::Default>::default) });

    quote! {
        impl #impl_generics ::rowmap_core::Entity for #ident #ty_generics #where_clause {
            fn descriptor() -> ::rowmap_core::EntityDescriptor<Self> {
                ::rowmap_core::EntityDescriptor::<Self>::new(#name)
                    #compact
                    #(#fields)*
                    #base
                    #constructor
                    #default_constructor
            }
        }
    }
}

fn generate_field(field: &FieldDef) -> TokenStream {
    let ident = &field.ident;
    let name = field.name_str();
    let value_ty = field.value_ty();

    let accessor = match (field.is_option(), field.storage.immutable) {
        (false, true) => quote! {
            required::<#value_ty>(#name, |entity| &entity.#ident)
        },
        (false, false) => quote! {
            required_mut::<#value_ty>(#name, |entity| &entity.#ident, |entity| &mut entity.#ident)
        },
        (true, true) => quote! {
            nullable::<#value_ty>(#name, |entity| &entity.#ident)
        },
        (true, false) => quote! {
            nullable_mut::<#value_ty>(#name, |entity| &entity.#ident, |entity| &mut entity.#ident)
        }
    };
    let transient = field.storage.transient.then(|| quote! { .transient() });
    let column = generate_column(&field.column);

    quote! {
        .field(::rowmap_core::FieldDescriptor::<Self>::#accessor #transient #column)
    }
}

fn generate_column(column: &ColumnConfig) -> TokenStream {
    let name = column.name.as_ref().map(|name| quote! { .column(#name) });
    let index = column.has_index().then(|| {
        let named = column.index_name.as_ref().map(|name| quote! { .named(#name) });
        let unique = column.unique.then(|| quote! { .unique() });
        quote! { .index(::rowmap_core::IndexDef::new() #named #unique) }
    });
    let ignore = column.ignore.then(|| quote! { .ignored() });

    quote! { #name #index #ignore }
}

fn generate_base(base: &FieldDef) -> TokenStream {
    let ident = &base.ident;
    let ty = &base.ty;

    quote! {
        .base(
            <#ty as ::rowmap_core::Entity>::descriptor(),
            |entity| &entity.#ident,
            |entity| &mut entity.#ident
        )
    }
}

fn generate_constructor(entity: &EntityDef) -> TokenStream {
    let params = entity.fields.iter().map(generate_param);
    let inits = entity.fields.iter().map(generate_init);
    let base = entity.base.as_ref().map(|base| {
        let ident = &base.ident;
        quote! { #ident: ::core::default::Default::default(), }
    });

    quote! {
        .constructor(::rowmap_core::ConstructorDescriptor::new(
            ::std::vec![#(#params),*],
            |mut args: ::rowmap_core::ConstructorArgs| {
                ::core::result::Result::Ok(Self {
                    #(#inits)*
                    #base
                })
            }
        ))
    }
}

fn generate_param(field: &FieldDef) -> TokenStream {
    let name = field.name_str();
    let value_ty = field.value_ty();
    let kind = if field.is_option() {
        quote! { nullable }
    } else {
        quote! { required }
    };
    let default = field.storage.has_default().then(|| quote! { .with_default() });

    quote! {
        ::rowmap_core::ParamDescriptor::#kind::<#value_ty>(#name) #default
    }
}

fn generate_init(field: &FieldDef) -> TokenStream {
    let ident = &field.ident;
    let name = field.name_str();
    let value_ty = field.value_ty();
    let option = field.is_option();

    let take = match (&field.storage.default, option) {
        (None, false) => quote! { args.take_required::<#value_ty>(#name) },
        (None, true) => quote! { args.take_nullable::<#value_ty>(#name) },
        (Some(default), false) => {
            let default = default_fn(default);
            quote! { args.take_required_or_else::<#value_ty>(#name, #default) }
        }
        (Some(default), true) => {
            let default = default_fn(default);
            quote! { args.take_nullable_or_else::<#value_ty>(#name, #default) }
        }
    };

    quote! { #ident: #take?, }
}

fn default_fn(default: &ParamDefault) -> TokenStream {
    match default {
        ParamDefault::Trait => quote! { ::core::default::Default::default },
        ParamDefault::Expr(expr) => quote! { || #expr }
    }
}
