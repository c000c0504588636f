// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field enumeration over the ancestor chain.

use crate::descriptor::{EntityDescriptor, FieldDescriptor};

/// All fields of an entity, most-derived type first.
///
/// Each type contributes its fields in declaration order. Fields sharing a
/// name across the chain are all returned; rejecting them is left to column
/// resolution.
///
/// ```text
/// Note { title }  ──base──▶  Audited { created }  ──base──▶  Record { _id }
///
/// => [title, created, _id]
/// ```
pub fn enumerate_fields<T>(descriptor: &EntityDescriptor<T>) -> Vec<&FieldDescriptor<T>> {
    let mut fields: Vec<&FieldDescriptor<T>> = descriptor.fields().iter().collect();
    let mut ancestor = descriptor.ancestor();
    while let Some(current) = ancestor {
        fields.extend(current.fields());
        ancestor = current.ancestor();
    }
    fields
}
