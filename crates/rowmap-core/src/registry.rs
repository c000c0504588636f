// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Process-wide entity registry.
//!
//! The registry owns the converter registry and one [`EntityConverter`] per
//! entity type. Types can be registered eagerly during initialization, which
//! surfaces mapping errors at startup, or are built lazily on first use.
//!
//! # Example
//!
//! ```rust
//! use rowmap_core::{
//!     Entity, EntityDescriptor, FieldDescriptor, Registry
//! };
//!
//! #[derive(Default)]
//! struct Counter {
//!     hits: i64
//! }
//!
//! impl Entity for Counter {
//!     fn descriptor() -> EntityDescriptor<Self> {
//!         EntityDescriptor::<Self>::for_type()
//!             .field(FieldDescriptor::required_mut::<i64>("hits", |c| &c.hits, |c| &mut c.hits))
//!             .default_constructor(Counter::default)
//!     }
//! }
//!
//! let registry = Registry::builder().use_annotations().build();
//! let converter = registry.register::<Counter>().unwrap();
//!
//! assert_eq!(converter.table_name(), "Counter");
//! assert!(registry.is_registered::<Counter>());
//! ```

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock, PoisonError, RwLock}
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    converter::{ConverterFactory, ConverterRegistry, FieldConverter},
    descriptor::Entity,
    entity::{EntityConverter, SharedConverter, build_converter},
    error::MappingError
};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Mapping configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingOptions {
    /// Honour column annotations: name overrides, indexes and `ignore`.
    pub use_annotations: bool
}

/// Builder for [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    converters: ConverterRegistry,
    options:    MappingOptions
}

impl RegistryBuilder {
    /// Enable annotation-driven configuration.
    #[must_use]
    pub const fn use_annotations(mut self) -> Self {
        self.options.use_annotations = true;
        self
    }

    /// Register a value converter for `V`.
    #[must_use]
    pub fn converter<V, C>(mut self, converter: C) -> Self
    where
        V: Any + Send,
        C: FieldConverter<V> + 'static
    {
        self.converters.register::<V, C>(converter);
        self
    }

    /// Store `V` as JSON text.
    #[must_use]
    pub fn json<V>(mut self) -> Self
    where
        V: Serialize + DeserializeOwned + Any + Send
    {
        self.converters.register_json::<V>();
        self
    }

    /// Add a converter factory, consulted after the registered converters.
    #[must_use]
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: ConverterFactory + 'static
    {
        self.converters.register_factory(factory);
        self
    }

    /// Replace the converter registry altogether.
    #[must_use]
    pub fn converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = converters;
        self
    }

    /// Finish the registry.
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            converters: self.converters,
            options:    self.options,
            entities:   RwLock::new(HashMap::new())
        }
    }
}

/// Entity converters keyed by entity type.
pub struct Registry {
    converters: ConverterRegistry,
    options:    MappingOptions,
    entities:   RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>
}

impl Registry {
    /// Start configuring a registry with the default converters.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with default converters and options.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Mapping configuration.
    #[must_use]
    pub const fn options(&self) -> MappingOptions {
        self.options
    }

    /// Value converters used for every entity.
    #[must_use]
    pub const fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Build and cache the converter of `T`.
    ///
    /// Registering an already registered type returns the cached converter.
    ///
    /// # Errors
    ///
    /// The [`MappingError`] describing why `T` cannot be mapped. Nothing is
    /// cached in that case and other types are unaffected.
    pub fn register<T: Entity>(&self) -> Result<SharedConverter<T>, MappingError> {
        self.converter::<T>()
    }

    /// Register every entity type of the tuple `S`, in order.
    ///
    /// ```rust,ignore
    /// registry.register_all::<(Note, Account, Tag)>()?;
    /// ```
    ///
    /// # Errors
    ///
    /// The first [`MappingError`]. Types before the failing one stay
    /// registered, later ones are not attempted.
    pub fn register_all<S: EntitySet>(&self) -> Result<(), MappingError> {
        S::register_into(self)
    }

    /// Converter of `T`, built on first use.
    ///
    /// Concurrent first uses may each build a converter; only one is kept and
    /// every caller receives that one.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn converter<T: Entity>(&self) -> Result<SharedConverter<T>, MappingError> {
        if let Some(converter) = self.get::<T>() {
            return Ok(converter);
        }

        let built = build_converter::<T>(&self.converters, self.options).map_err(|err| {
            warn!(entity = std::any::type_name::<T>(), error = %err, "entity registration failed");
            err
        })?;
        let built = Arc::new(built);

        let mut entities = self.entities.write().unwrap_or_else(PoisonError::into_inner);
        let existing = entities
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<EntityConverter<T>>().ok());
        if let Some(existing) = existing {
            return Ok(existing);
        }
        entities.insert(TypeId::of::<T>(), Arc::clone(&built) as Arc<dyn Any + Send + Sync>);
        debug!(entity = std::any::type_name::<T>(), "entity registered");
        Ok(built)
    }

    /// Cached converter of `T`, without building it.
    pub fn get<T: Entity>(&self) -> Option<SharedConverter<T>> {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);
        entities
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<EntityConverter<T>>().ok())
    }

    /// Check if the converter of `T` has been built.
    pub fn is_registered<T: Entity>(&self) -> bool {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);
        entities.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered entity types.
    pub fn len(&self) -> usize {
        self.entities.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if no entity type is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Install this registry as the process-wide one.
    ///
    /// # Errors
    ///
    /// Returns the registry back when one was installed already.
    pub fn install(self) -> Result<(), Self> {
        GLOBAL.set(self)
    }

    /// The process-wide registry, if installed.
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }
}

/// Tuple of entity types registered together, see
/// [`Registry::register_all`].
pub trait EntitySet {
    /// Register every type of the set with `registry`.
    ///
    /// # Errors
    ///
    /// The first registration failure.
    fn register_into(registry: &Registry) -> Result<(), MappingError>;
}

macro_rules! entity_set {
    ($($ty:ident),+) => {
        impl<$($ty: Entity),+> EntitySet for ($($ty,)+) {
            fn register_into(registry: &Registry) -> Result<(), MappingError> {
                $(registry.register::<$ty>()?;)+
                Ok(())
            }
        }
    };
}

entity_set!(A);
entity_set!(A, B);
entity_set!(A, B, C);
entity_set!(A, B, C, D);
entity_set!(A, B, C, D, E);
entity_set!(A, B, C, D, E, F);
entity_set!(A, B, C, D, E, F, G);
entity_set!(A, B, C, D, E, F, G, H);

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("converters", &self.converters)
            .field("options", &self.options)
            .field("entities", &self.len())
            .finish()
    }
}
