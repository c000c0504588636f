// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Type identity and type-erased field values.

use std::{
    any::{Any, TypeId, type_name},
    fmt,
    hash::{Hash, Hasher}
};

use crate::error::ConvertError;

/// In-memory field value with its type erased.
///
/// Produced by field getters and value converters, consumed by field setters
/// and constructors which downcast it back to the declared type.
pub type FieldValue = Box<dyn Any + Send>;

/// Key used to look up value converters.
///
/// Generic parameterizations are distinct keys: `Vec<String>` and
/// `Vec<i64>` resolve to different converters.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id:   TypeId,
    name: &'static str
}

impl TypeKey {
    /// Key of `V`.
    pub fn of<V: Any>() -> Self {
        Self {
            id:   TypeId::of::<V>(),
            name: type_name::<V>()
        }
    }

    /// Compiler-reported type name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying type id.
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Check if the key belongs to `V`.
    pub fn is<V: Any>(&self) -> bool {
        self.id == TypeId::of::<V>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Simple (unqualified, non-generic) name of `T`.
///
/// `my_app::model::Note` yields `Note`, `wrapper::Page<Note>` yields `Page`.
pub fn simple_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Borrow an erased value as `V`.
pub fn downcast_ref<V: Any>(value: &FieldValue) -> Option<&V> {
    let value: &(dyn Any + Send) = &**value;
    value.downcast_ref::<V>()
}

/// Take an erased value as `V`.
///
/// `name` identifies the field or parameter in the error.
pub fn downcast<V: Any>(value: FieldValue, name: &str) -> Result<V, ConvertError> {
    value
        .downcast::<V>()
        .map(|boxed| *boxed)
        .map_err(|_| ConvertError::TypeMismatch {
            name:     name.to_string(),
            expected: type_name::<V>()
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    mod nested {
        pub struct Note;
        pub struct Page<T>(pub T);
    }

    #[test]
    fn keys_compare_by_type() {
        assert_eq!(TypeKey::of::<i64>(), TypeKey::of::<i64>());
        assert_ne!(TypeKey::of::<Vec<String>>(), TypeKey::of::<Vec<i64>>());
        assert!(TypeKey::of::<String>().is::<String>());

        let keys: HashSet<TypeKey> = [TypeKey::of::<i64>(), TypeKey::of::<i64>()]
            .into_iter()
            .collect();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn key_display_uses_type_name() {
        assert_eq!(TypeKey::of::<i32>().to_string(), "i32");
    }

    #[test]
    fn simple_name_strips_path_and_generics() {
        assert_eq!(simple_name::<nested::Note>(), "Note");
        assert_eq!(simple_name::<nested::Page<nested::Note>>(), "Page");
        assert_eq!(simple_name::<i64>(), "i64");
    }

    #[test]
    fn downcast_roundtrip_and_mismatch() {
        let value: FieldValue = Box::new(5_i64);
        assert_eq!(downcast_ref::<i64>(&value), Some(&5));
        assert!(downcast_ref::<i32>(&value).is_none());

        assert_eq!(downcast::<i64>(value, "count").ok(), Some(5));

        let err = downcast::<String>(Box::new(1_u8), "name").unwrap_err();
        assert!(matches!(err, ConvertError::TypeMismatch { name, .. } if name == "name"));
    }
}
