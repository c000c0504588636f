// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Per-type accessor tables.
//!
//! An [`EntityDescriptor`] is everything the mapping engine knows about a
//! type: its declared fields with getters and setters, the ancestor whose
//! fields it reuses, its primary constructor and its zero-argument
//! constructor. Descriptors are produced by `#[derive(Entity)]` or written by
//! hand and consumed once, when the type's converter is built.
//!
//! # Structure
//!
//! ```text
//! EntityDescriptor<T>
//! ├── simple_name          table name
//! ├── compact              compact declaration flag
//! ├── fields[]             FieldDescriptor<T>, declaration order
//! ├── ancestor             AncestorDescriptor<T> (fields projected onto T)
//! │   └── ancestor ...
//! ├── constructor          ConstructorDescriptor<T>
//! │   └── params[]         ParamDescriptor
//! └── default_constructor  fn() -> T
//! ```
//!
//! # Example
//!
//! ```rust
//! use rowmap_core::{
//!     ConstructorDescriptor, EntityDescriptor, FieldDescriptor, ParamDescriptor
//! };
//!
//! struct Note {
//!     title: String,
//!     _id:   Option<i64>
//! }
//!
//! let descriptor = EntityDescriptor::<Note>::new("Note")
//!     .compact()
//!     .field(FieldDescriptor::required::<String>("title", |n| &n.title))
//!     .field(FieldDescriptor::nullable_mut::<i64>("_id", |n| &n._id, |n| &mut n._id))
//!     .constructor(ConstructorDescriptor::new(
//!         vec![
//!             ParamDescriptor::required::<String>("title"),
//!             ParamDescriptor::nullable::<i64>("_id").with_default(),
//!         ],
//!         |mut args| {
//!             Ok(Note {
//!                 title: args.take_required("title")?,
//!                 _id:   args.take_nullable_or_else("_id", || None)?
//!             })
//!         }
//!     ));
//!
//! assert!(descriptor.is_compact_declaration());
//! assert_eq!(descriptor.fields().len(), 2);
//! ```

use std::{any::Any, collections::HashMap, fmt, sync::Arc};

use crate::{
    error::ConvertError,
    types::{FieldValue, TypeKey, downcast, downcast_ref, simple_name}
};

type Getter<T> = Arc<dyn Fn(&T) -> Option<FieldValue> + Send + Sync>;
type Setter<T> = Arc<dyn Fn(&mut T, Option<FieldValue>) -> Result<(), ConvertError> + Send + Sync>;
type Call<T> = Arc<dyn Fn(ConstructorArgs) -> Result<T, ConvertError> + Send + Sync>;

/// Declaration modifiers that exclude a field from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldModifiers {
    /// Static storage, shared by all instances.
    pub is_static: bool,

    /// Transient field, never persisted.
    pub is_transient: bool
}

/// Index declared on a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexDef {
    /// Explicit index name. `None` lets the store derive one.
    pub name: Option<&'static str>,

    /// UNIQUE index.
    pub unique: bool
}

impl IndexDef {
    /// Plain unnamed index.
    pub const fn new() -> Self {
        Self {
            name:   None,
            unique: false
        }
    }

    /// Set the index name.
    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Make the index unique.
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Declaration metadata. Only honoured when annotation-driven configuration
/// is enabled, see [`MappingOptions`](crate::MappingOptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldAnnotations {
    /// Column name override.
    pub column: Option<&'static str>,

    /// Index on the column.
    pub index: Option<IndexDef>,

    /// Exclude the field from storage.
    pub ignore: bool
}

/// One declared field of an entity type.
///
/// The four constructors mirror the possible declarations:
///
/// | Constructor | Field type | Setter |
/// |-------------|------------|--------|
/// | [`required`](Self::required) | `V` | none (immutable) |
/// | [`required_mut`](Self::required_mut) | `V` | yes |
/// | [`nullable`](Self::nullable) | `Option<V>` | none (immutable) |
/// | [`nullable_mut`](Self::nullable_mut) | `Option<V>` | yes |
///
/// The value type used for converter lookup is always `V`.
pub struct FieldDescriptor<T> {
    name:        &'static str,
    value_type:  TypeKey,
    nullable:    bool,
    modifiers:   FieldModifiers,
    annotations: FieldAnnotations,
    getter:      Getter<T>,
    setter:      Option<Setter<T>>
}

impl<T: 'static> FieldDescriptor<T> {
    /// Immutable field of type `V`.
    pub fn required<V>(name: &'static str, get: fn(&T) -> &V) -> Self
    where
        V: Any + Send + Clone
    {
        Self::with_accessors(
            name,
            TypeKey::of::<V>(),
            false,
            Arc::new(move |entity: &T| Some(Box::new(get(entity).clone()) as FieldValue)),
            None
        )
    }

    /// Mutable field of type `V`.
    ///
    /// Writing an absent value leaves the field untouched.
    pub fn required_mut<V>(
        name: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V
    ) -> Self
    where
        V: Any + Send + Clone
    {
        let setter: Setter<T> = Arc::new(move |entity: &mut T, value: Option<FieldValue>| {
            if let Some(value) = value {
                *get_mut(entity) = downcast::<V>(value, name)?;
            }
            Ok(())
        });
        let mut field = Self::required(name, get);
        field.setter = Some(setter);
        field
    }

    /// Immutable field of type `Option<V>`.
    pub fn nullable<V>(name: &'static str, get: fn(&T) -> &Option<V>) -> Self
    where
        V: Any + Send + Clone
    {
        Self::with_accessors(
            name,
            TypeKey::of::<V>(),
            true,
            Arc::new(move |entity: &T| {
                get(entity)
                    .as_ref()
                    .map(|value| Box::new(value.clone()) as FieldValue)
            }),
            None
        )
    }

    /// Mutable field of type `Option<V>`.
    pub fn nullable_mut<V>(
        name: &'static str,
        get: fn(&T) -> &Option<V>,
        get_mut: fn(&mut T) -> &mut Option<V>
    ) -> Self
    where
        V: Any + Send + Clone
    {
        let setter: Setter<T> = Arc::new(move |entity: &mut T, value: Option<FieldValue>| {
            *get_mut(entity) = value.map(|value| downcast::<V>(value, name)).transpose()?;
            Ok(())
        });
        let mut field = Self::nullable(name, get);
        field.setter = Some(setter);
        field
    }

    fn with_accessors(
        name: &'static str,
        value_type: TypeKey,
        nullable: bool,
        getter: Getter<T>,
        setter: Option<Setter<T>>
    ) -> Self {
        Self {
            name,
            value_type,
            nullable,
            modifiers: FieldModifiers::default(),
            annotations: FieldAnnotations::default(),
            getter,
            setter
        }
    }

    /// Re-target this field onto an outer type that embeds `T`.
    ///
    /// Used to append an ancestor's fields to a derived type.
    pub fn project<P: 'static>(
        self,
        outer: fn(&P) -> &T,
        outer_mut: fn(&mut P) -> &mut T
    ) -> FieldDescriptor<P> {
        let getter = self.getter;
        let setter = self.setter.map(|setter| -> Setter<P> {
            Arc::new(move |entity: &mut P, value: Option<FieldValue>| {
                setter(outer_mut(entity), value)
            })
        });
        FieldDescriptor {
            name:        self.name,
            value_type:  self.value_type,
            nullable:    self.nullable,
            modifiers:   self.modifiers,
            annotations: self.annotations,
            getter:      Arc::new(move |entity: &P| getter(outer(entity))),
            setter
        }
    }
}

impl<T> FieldDescriptor<T> {
    /// Override the column name.
    #[must_use]
    pub const fn column(mut self, name: &'static str) -> Self {
        self.annotations.column = Some(name);
        self
    }

    /// Declare an index on the column.
    #[must_use]
    pub const fn index(mut self, index: IndexDef) -> Self {
        self.annotations.index = Some(index);
        self
    }

    /// Exclude the field from storage (annotation).
    #[must_use]
    pub const fn ignored(mut self) -> Self {
        self.annotations.ignore = true;
        self
    }

    /// Mark the field transient.
    #[must_use]
    pub const fn transient(mut self) -> Self {
        self.modifiers.is_transient = true;
        self
    }

    /// Mark the field as static storage.
    #[must_use]
    pub const fn static_storage(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// Declared field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Value type, with `Option` stripped.
    pub const fn value_type(&self) -> TypeKey {
        self.value_type
    }

    /// Check if the field can hold an absent value.
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Check if the field has no setter.
    pub const fn is_immutable(&self) -> bool {
        self.setter.is_none()
    }

    /// Declaration modifiers.
    pub const fn modifiers(&self) -> FieldModifiers {
        self.modifiers
    }

    /// Declaration metadata.
    pub const fn annotations(&self) -> &FieldAnnotations {
        &self.annotations
    }

    /// Current value of the field. `None` when absent.
    pub fn read(&self, entity: &T) -> Option<FieldValue> {
        (self.getter)(entity)
    }

    /// Assign the field.
    ///
    /// # Errors
    ///
    /// [`ConvertError::ImmutableField`] for immutable fields,
    /// [`ConvertError::TypeMismatch`] when `value` is not of the value type.
    pub fn write(&self, entity: &mut T, value: Option<FieldValue>) -> Result<(), ConvertError> {
        match &self.setter {
            Some(setter) => setter(entity, value),
            None => Err(ConvertError::ImmutableField(self.name.to_string()))
        }
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name:        self.name,
            value_type:  self.value_type,
            nullable:    self.nullable,
            modifiers:   self.modifiers,
            annotations: self.annotations,
            getter:      Arc::clone(&self.getter),
            setter:      self.setter.clone()
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("nullable", &self.nullable)
            .field("immutable", &self.is_immutable())
            .field("modifiers", &self.modifiers)
            .field("annotations", &self.annotations)
            .finish()
    }
}

/// One parameter of a primary constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    name:        &'static str,
    value_type:  TypeKey,
    nullable:    bool,
    has_default: bool
}

impl ParamDescriptor {
    /// Parameter of type `V`.
    pub fn required<V: Any>(name: &'static str) -> Self {
        Self {
            name,
            value_type: TypeKey::of::<V>(),
            nullable: false,
            has_default: false
        }
    }

    /// Parameter of type `Option<V>`.
    pub fn nullable<V: Any>(name: &'static str) -> Self {
        Self {
            nullable: true,
            ..Self::required::<V>(name)
        }
    }

    /// Declare a default value for the parameter.
    #[must_use]
    pub const fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Parameter name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Value type, with `Option` stripped.
    pub const fn value_type(&self) -> TypeKey {
        self.value_type
    }

    /// Check if the parameter accepts an absent value.
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Check if the parameter may be omitted.
    pub const fn has_default(&self) -> bool {
        self.has_default
    }
}

/// Named arguments for a constructor call.
///
/// An entry holding `None` is an explicit null; a missing entry lets the
/// parameter's default apply.
#[derive(Default)]
pub struct ConstructorArgs {
    values: HashMap<&'static str, Option<FieldValue>>
}

impl ConstructorArgs {
    /// Empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply an argument.
    pub fn insert(&mut self, name: &'static str, value: Option<FieldValue>) {
        self.values.insert(name, value);
    }

    /// Check if an argument was supplied, null or not.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing was supplied.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take a non-null argument without default.
    pub fn take_required<V: Any>(&mut self, name: &str) -> Result<V, ConvertError> {
        match self.values.remove(name) {
            None => Err(ConvertError::MissingArgument(name.to_string())),
            Some(value) => Self::non_null(name, value)
        }
    }

    /// Take a non-null argument, falling back to `default` when omitted.
    pub fn take_required_or_else<V: Any>(
        &mut self,
        name: &str,
        default: impl FnOnce() -> V
    ) -> Result<V, ConvertError> {
        match self.values.remove(name) {
            None => Ok(default()),
            Some(value) => Self::non_null(name, value)
        }
    }

    /// Take a nullable argument without default.
    pub fn take_nullable<V: Any>(&mut self, name: &str) -> Result<Option<V>, ConvertError> {
        match self.values.remove(name) {
            None => Err(ConvertError::MissingArgument(name.to_string())),
            Some(value) => value.map(|value| downcast::<V>(value, name)).transpose()
        }
    }

    /// Take a nullable argument, falling back to `default` when omitted.
    pub fn take_nullable_or_else<V: Any>(
        &mut self,
        name: &str,
        default: impl FnOnce() -> Option<V>
    ) -> Result<Option<V>, ConvertError> {
        match self.values.remove(name) {
            None => Ok(default()),
            Some(value) => value.map(|value| downcast::<V>(value, name)).transpose()
        }
    }

    /// Peek at a supplied non-null argument.
    pub fn get<V: Any>(&self, name: &str) -> Option<&V> {
        self.values
            .get(name)
            .and_then(Option::as_ref)
            .and_then(downcast_ref::<V>)
    }

    fn non_null<V: Any>(name: &str, value: Option<FieldValue>) -> Result<V, ConvertError> {
        let value = value.ok_or_else(|| ConvertError::NullArgument(name.to_string()))?;
        downcast::<V>(value, name)
    }
}

impl fmt::Debug for ConstructorArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<(&str, bool)> = self
            .values
            .iter()
            .map(|(name, value)| (*name, value.is_some()))
            .collect();
        names.sort_unstable();
        f.debug_struct("ConstructorArgs")
            .field("supplied", &names)
            .finish()
    }
}

/// Primary constructor of an entity type.
pub struct ConstructorDescriptor<T> {
    params: Vec<ParamDescriptor>,
    call:   Call<T>
}

impl<T> ConstructorDescriptor<T> {
    /// Describe a constructor by its parameters and a call taking named
    /// arguments.
    pub fn new<F>(params: Vec<ParamDescriptor>, call: F) -> Self
    where
        F: Fn(ConstructorArgs) -> Result<T, ConvertError> + Send + Sync + 'static
    {
        Self {
            params,
            call: Arc::new(call)
        }
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> &[ParamDescriptor] {
        &self.params
    }

    /// Check if every parameter has a default, so the constructor can be
    /// called without arguments.
    pub fn is_nullary(&self) -> bool {
        self.params.iter().all(ParamDescriptor::has_default)
    }

    /// Call the constructor.
    pub fn invoke(&self, args: ConstructorArgs) -> Result<T, ConvertError> {
        (self.call)(args)
    }
}

impl<T> Clone for ConstructorDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            call:   Arc::clone(&self.call)
        }
    }
}

impl<T> fmt::Debug for ConstructorDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Fields reused from an ancestor type, already projected onto the derived
/// type.
pub struct AncestorDescriptor<T> {
    simple_name: &'static str,
    fields:      Vec<FieldDescriptor<T>>,
    ancestor:    Option<Box<AncestorDescriptor<T>>>
}

impl<T> Clone for AncestorDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            simple_name: self.simple_name,
            fields:      self.fields.clone(),
            ancestor:    self.ancestor.clone()
        }
    }
}

impl<T> fmt::Debug for AncestorDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AncestorDescriptor")
            .field("simple_name", &self.simple_name)
            .field("fields", &self.fields)
            .field("ancestor", &self.ancestor)
            .finish()
    }
}

impl<T: 'static> AncestorDescriptor<T> {
    fn project<P: 'static>(
        self,
        outer: fn(&P) -> &T,
        outer_mut: fn(&mut P) -> &mut T
    ) -> AncestorDescriptor<P> {
        AncestorDescriptor {
            simple_name: self.simple_name,
            fields:      self
                .fields
                .into_iter()
                .map(|field| field.project(outer, outer_mut))
                .collect(),
            ancestor:    self
                .ancestor
                .map(|ancestor| Box::new(ancestor.project(outer, outer_mut)))
        }
    }
}

impl<T> AncestorDescriptor<T> {
    /// Ancestor type name.
    pub const fn simple_name(&self) -> &'static str {
        self.simple_name
    }

    /// Fields declared by the ancestor itself.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Next ancestor in the chain.
    pub fn ancestor(&self) -> Option<&AncestorDescriptor<T>> {
        self.ancestor.as_deref()
    }
}

/// Accessor table of an entity type.
pub struct EntityDescriptor<T> {
    simple_name:         &'static str,
    type_name:           &'static str,
    compact:             bool,
    fields:              Vec<FieldDescriptor<T>>,
    ancestor:            Option<Box<AncestorDescriptor<T>>>,
    constructor:         Option<ConstructorDescriptor<T>>,
    default_constructor: Option<fn() -> T>
}

impl<T: 'static> EntityDescriptor<T> {
    /// Empty descriptor with an explicit simple name.
    pub fn new(simple_name: &'static str) -> Self {
        Self {
            simple_name,
            type_name: std::any::type_name::<T>(),
            compact: false,
            fields: Vec::new(),
            ancestor: None,
            constructor: None,
            default_constructor: None
        }
    }

    /// Empty descriptor named after `T`.
    pub fn for_type() -> Self {
        Self::new(simple_name::<T>())
    }

    /// Append a declared field.
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Reuse the fields of `base`, which `T` embeds.
    ///
    /// The base's own ancestor chain is carried over behind it.
    #[must_use]
    pub fn base<B: 'static>(
        mut self,
        base: EntityDescriptor<B>,
        project: fn(&T) -> &B,
        project_mut: fn(&mut T) -> &mut B
    ) -> Self {
        let ancestor = AncestorDescriptor {
            simple_name: base.simple_name,
            fields:      base.fields,
            ancestor:    base.ancestor
        };
        self.ancestor = Some(Box::new(ancestor.project(project, project_mut)));
        self
    }

    /// Mark the type as a compact declaration, allowing constructor-based
    /// instantiation for immutable fields.
    #[must_use]
    pub const fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    /// Declare the primary constructor.
    #[must_use]
    pub fn constructor(mut self, constructor: ConstructorDescriptor<T>) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Declare the zero-argument constructor.
    #[must_use]
    pub const fn default_constructor(mut self, constructor: fn() -> T) -> Self {
        self.default_constructor = Some(constructor);
        self
    }
}

impl<T> EntityDescriptor<T> {
    /// Simple name, used as table name.
    pub const fn simple_name(&self) -> &'static str {
        self.simple_name
    }

    /// Full type name of `T`.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check if the type carries the compact-declaration capability.
    pub const fn is_compact_declaration(&self) -> bool {
        self.compact
    }

    /// Fields declared by the type itself.
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// First ancestor in the chain.
    pub fn ancestor(&self) -> Option<&AncestorDescriptor<T>> {
        self.ancestor.as_deref()
    }

    /// Primary constructor.
    pub const fn primary_constructor(&self) -> Option<&ConstructorDescriptor<T>> {
        self.constructor.as_ref()
    }

    /// Zero-argument constructor.
    pub const fn zero_arg_constructor(&self) -> Option<fn() -> T> {
        self.default_constructor
    }
}

impl<T> fmt::Debug for EntityDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("simple_name", &self.simple_name)
            .field("compact", &self.compact)
            .field("fields", &self.fields)
            .field("ancestor", &self.ancestor)
            .field("constructor", &self.constructor)
            .field("default_constructor", &self.default_constructor.is_some())
            .finish()
    }
}

/// Type with an accessor table.
///
/// Implemented by `#[derive(Entity)]`; can be implemented by hand.
pub trait Entity: Sized + 'static {
    /// Build the accessor table. Called once per converter build.
    fn descriptor() -> EntityDescriptor<Self>;
}
