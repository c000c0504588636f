// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Value converters and the type-keyed converter registry.
//!
//! # Overview
//!
//! - [`FieldConverter`]: typed contract implemented by converters
//! - [`ValueConverter`]: type-erased contract used by entity conversion
//! - [`ConverterFactory`]: produces converters for whole families of types
//! - [`ConverterRegistry`]: converters keyed by value type, shared by every
//!   column of that type across all entities
//!
//! # Built-in Converters
//!
//! | Rust type | Converter | Column |
//! |-----------|-----------|--------|
//! | `i64`, `i32`, `i16`, `i8`, `u8`, `u16`, `u32` | [`IntegerConverter`] | `INTEGER` |
//! | `f64`, `f32` | [`RealConverter`] | `REAL` |
//! | `bool` | [`BooleanConverter`] | `INTEGER` (0/1) |
//! | `String` | [`TextConverter`] | `TEXT` |
//! | `Vec<u8>` | [`BlobConverter`] | `BLOB` |
//! | any `Serialize + DeserializeOwned` | [`JsonConverter`] (opt-in) | `TEXT` |
//! | `uuid::Uuid` (feature `uuid`) | `UuidConverter` | `TEXT` |
//! | `chrono::DateTime<Utc>` (feature `chrono`) | `DateTimeConverter` | `INTEGER` (ms) |

use std::{any::Any, collections::HashMap, fmt, marker::PhantomData, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::ConvertError,
    row::{Cursor, RowValues},
    types::{FieldValue, TypeKey, downcast_ref},
    value::{ColumnType, Value}
};

/// Typed conversion between a field value and a row cell.
///
/// # Example
///
/// ```rust
/// use rowmap_core::{ColumnType, ConvertError, Cursor, FieldConverter, Value};
///
/// struct Cents;
///
/// impl FieldConverter<u64> for Cents {
///     fn column_type(&self) -> Option<ColumnType> {
///         Some(ColumnType::Integer)
///     }
///
///     fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<u64, ConvertError> {
///         let raw = cursor.get_i64(index)?;
///         u64::try_from(raw).map_err(|_| ConvertError::Overflow {
///             value:  raw,
///             target: "u64"
///         })
///     }
///
///     fn to_value(&self, value: &u64) -> Result<Value, ConvertError> {
///         i64::try_from(*value)
///             .map(Value::Integer)
///             .map_err(|_| ConvertError::Overflow {
///                 value:  i64::MAX,
///                 target: "INTEGER"
///             })
///     }
/// }
/// ```
pub trait FieldConverter<V>: Send + Sync {
    /// Storable column type. `None` means values of this type are not stored
    /// in the entity's table and the field gets no column.
    fn column_type(&self) -> Option<ColumnType>;

    /// Read a non-null cell.
    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<V, ConvertError>;

    /// Produce the cell for a present value.
    fn to_value(&self, value: &V) -> Result<Value, ConvertError>;
}

/// Type-erased value converter.
///
/// Obtained from [`ConverterRegistry::lookup`]. Every [`FieldConverter`]
/// registered in a registry is exposed through this trait.
pub trait ValueConverter: Send + Sync {
    /// Value type the converter handles.
    fn value_type(&self) -> TypeKey;

    /// Storable column type, see [`FieldConverter::column_type`].
    fn column_type(&self) -> Option<ColumnType>;

    /// Read a non-null cell into an erased value.
    fn decode(&self, cursor: &dyn Cursor, index: usize) -> Result<FieldValue, ConvertError>;

    /// Write `value` as the cell for `column`.
    ///
    /// An absent value writes nothing, leaving the cell to the store.
    fn encode(
        &self,
        value: Option<&FieldValue>,
        column: &str,
        values: &mut RowValues
    ) -> Result<(), ConvertError>;
}

/// Produces converters on demand.
///
/// Consulted by [`ConverterRegistry::lookup`] when no converter is registered
/// for the exact value type. Closures of the form
/// `Fn(&TypeKey) -> Option<Arc<dyn ValueConverter>>` are factories too.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use rowmap_core::{
///     ConverterFactory, ConverterRegistry, JsonConverter, TypeKey, ValueConverter, erase
/// };
///
/// struct Collections;
///
/// impl ConverterFactory for Collections {
///     fn create(&self, value_type: &TypeKey) -> Option<Arc<dyn ValueConverter>> {
///         if value_type.is::<Vec<String>>() {
///             Some(erase::<Vec<String>, _>(JsonConverter::<Vec<String>>::new()))
///         } else if value_type.is::<Vec<i64>>() {
///             Some(erase::<Vec<i64>, _>(JsonConverter::<Vec<i64>>::new()))
///         } else {
///             None
///         }
///     }
/// }
///
/// let mut converters = ConverterRegistry::with_defaults();
/// converters.register_factory(Collections);
///
/// assert!(converters.lookup(&TypeKey::of::<Vec<i64>>()).is_some());
/// assert!(converters.lookup(&TypeKey::of::<Vec<u64>>()).is_none());
/// ```
pub trait ConverterFactory: Send + Sync {
    /// Converter for `value_type`, or `None` when the type is not handled.
    fn create(&self, value_type: &TypeKey) -> Option<Arc<dyn ValueConverter>>;
}

impl<F> ConverterFactory for F
where
    F: Fn(&TypeKey) -> Option<Arc<dyn ValueConverter>> + Send + Sync
{
    fn create(&self, value_type: &TypeKey) -> Option<Arc<dyn ValueConverter>> {
        self(value_type)
    }
}

/// Erase a typed converter, for use in a [`ConverterFactory`].
pub fn erase<V, C>(converter: C) -> Arc<dyn ValueConverter>
where
    V: Any + Send,
    C: FieldConverter<V> + 'static
{
    Arc::new(Erased {
        converter,
        marker: PhantomData
    })
}

struct Erased<V, C> {
    converter: C,
    marker:    PhantomData<fn() -> V>
}

impl<V, C> ValueConverter for Erased<V, C>
where
    V: Any + Send,
    C: FieldConverter<V>
{
    fn value_type(&self) -> TypeKey {
        TypeKey::of::<V>()
    }

    fn column_type(&self) -> Option<ColumnType> {
        self.converter.column_type()
    }

    fn decode(&self, cursor: &dyn Cursor, index: usize) -> Result<FieldValue, ConvertError> {
        let value = self.converter.from_cursor(cursor, index)?;
        Ok(Box::new(value))
    }

    fn encode(
        &self,
        value: Option<&FieldValue>,
        column: &str,
        values: &mut RowValues
    ) -> Result<(), ConvertError> {
        let Some(value) = value else {
            return Ok(());
        };
        let value = downcast_ref::<V>(value).ok_or_else(|| ConvertError::TypeMismatch {
            name:     column.to_string(),
            expected: std::any::type_name::<V>()
        })?;
        values.put(column, self.converter.to_value(value)?);
        Ok(())
    }
}

/// Integer types stored in an `INTEGER` column. Out-of-range values fail
/// with [`ConvertError::Overflow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

macro_rules! integer_converter {
    ($($ty:ty),*) => {
        $(
            impl FieldConverter<$ty> for IntegerConverter {
                fn column_type(&self) -> Option<ColumnType> {
                    Some(ColumnType::Integer)
                }

                fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<$ty, ConvertError> {
                    let raw = cursor.get_i64(index)?;
                    <$ty>::try_from(raw).map_err(|_| ConvertError::Overflow {
                        value:  raw,
                        target: stringify!($ty)
                    })
                }

                fn to_value(&self, value: &$ty) -> Result<Value, ConvertError> {
                    Ok(Value::Integer(i64::from(*value)))
                }
            }
        )*
    };
}

integer_converter!(i64, i32, i16, i8, u8, u16, u32);

/// Floating point types stored in a `REAL` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealConverter;

impl FieldConverter<f64> for RealConverter {
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Real)
    }

    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<f64, ConvertError> {
        cursor.get_f64(index)
    }

    fn to_value(&self, value: &f64) -> Result<Value, ConvertError> {
        Ok(Value::Real(*value))
    }
}

impl FieldConverter<f32> for RealConverter {
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Real)
    }

    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<f32, ConvertError> {
        Ok(cursor.get_f64(index)? as f32)
    }

    fn to_value(&self, value: &f32) -> Result<Value, ConvertError> {
        Ok(Value::Real(f64::from(*value)))
    }
}

/// `bool` stored as `0`/`1` in an `INTEGER` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanConverter;

impl FieldConverter<bool> for BooleanConverter {
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Integer)
    }

    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<bool, ConvertError> {
        Ok(cursor.get_i64(index)? != 0)
    }

    fn to_value(&self, value: &bool) -> Result<Value, ConvertError> {
        Ok(Value::from(*value))
    }
}

/// `String` stored in a `TEXT` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConverter;

impl FieldConverter<String> for TextConverter {
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Text)
    }

    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<String, ConvertError> {
        cursor.get_str(index).map(str::to_string)
    }

    fn to_value(&self, value: &String) -> Result<Value, ConvertError> {
        Ok(Value::Text(value.clone()))
    }
}

/// `Vec<u8>` stored in a `BLOB` column.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobConverter;

impl FieldConverter<Vec<u8>> for BlobConverter {
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Blob)
    }

    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<Vec<u8>, ConvertError> {
        cursor.get_blob(index).map(<[u8]>::to_vec)
    }

    fn to_value(&self, value: &Vec<u8>) -> Result<Value, ConvertError> {
        Ok(Value::Blob(value.clone()))
    }
}

/// Any serde type stored as JSON text.
///
/// Not registered by default; opt in per type with
/// [`ConverterRegistry::register_json`]. Typical for collections such as
/// `Vec<String>`.
pub struct JsonConverter<V> {
    marker: PhantomData<fn() -> V>
}

impl<V> JsonConverter<V> {
    /// Create a converter for `V`.
    pub const fn new() -> Self {
        Self {
            marker: PhantomData
        }
    }
}

impl<V> Default for JsonConverter<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FieldConverter<V> for JsonConverter<V>
where
    V: Serialize + DeserializeOwned
{
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Text)
    }

    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<V, ConvertError> {
        Ok(serde_json::from_str(cursor.get_str(index)?)?)
    }

    fn to_value(&self, value: &V) -> Result<Value, ConvertError> {
        Ok(Value::Text(serde_json::to_string(value)?))
    }
}

/// `uuid::Uuid` stored as hyphenated text.
#[cfg(feature = "uuid")]
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidConverter;

#[cfg(feature = "uuid")]
impl FieldConverter<uuid::Uuid> for UuidConverter {
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Text)
    }

    fn from_cursor(&self, cursor: &dyn Cursor, index: usize) -> Result<uuid::Uuid, ConvertError> {
        uuid::Uuid::parse_str(cursor.get_str(index)?).map_err(|err| ConvertError::Decode {
            index,
            message: err.to_string()
        })
    }

    fn to_value(&self, value: &uuid::Uuid) -> Result<Value, ConvertError> {
        Ok(Value::Text(value.hyphenated().to_string()))
    }
}

/// `chrono::DateTime<Utc>` stored as milliseconds since the epoch.
#[cfg(feature = "chrono")]
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeConverter;

#[cfg(feature = "chrono")]
impl FieldConverter<chrono::DateTime<chrono::Utc>> for DateTimeConverter {
    fn column_type(&self) -> Option<ColumnType> {
        Some(ColumnType::Integer)
    }

    fn from_cursor(
        &self,
        cursor: &dyn Cursor,
        index: usize
    ) -> Result<chrono::DateTime<chrono::Utc>, ConvertError> {
        let millis = cursor.get_i64(index)?;
        chrono::DateTime::from_timestamp_millis(millis).ok_or_else(|| ConvertError::Decode {
            index,
            message: format!("timestamp {millis} is out of range")
        })
    }

    fn to_value(&self, value: &chrono::DateTime<chrono::Utc>) -> Result<Value, ConvertError> {
        Ok(Value::Integer(value.timestamp_millis()))
    }
}

/// Converters keyed by value type.
///
/// Registered converters match by exact type: registering `i64` does not
/// cover `u64`, and `Vec<String>` needs its own entry. Types without an entry
/// are offered to the registered [`ConverterFactory`]s in registration order.
///
/// # Example
///
/// ```rust
/// use rowmap_core::{ConverterRegistry, TypeKey};
///
/// let mut converters = ConverterRegistry::with_defaults();
/// converters.register_json::<Vec<String>>();
///
/// assert!(converters.lookup(&TypeKey::of::<Vec<String>>()).is_some());
/// assert!(converters.lookup(&TypeKey::of::<Vec<u64>>()).is_none());
/// ```
#[derive(Clone)]
pub struct ConverterRegistry {
    converters: HashMap<TypeKey, Arc<dyn ValueConverter>>,
    factories:  Vec<Arc<dyn ConverterFactory>>
}

impl ConverterRegistry {
    /// Registry without any converter.
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
            factories:  Vec::new()
        }
    }

    /// Registry with the built-in converters, plus feature-gated ones.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry
            .register::<i64, _>(IntegerConverter)
            .register::<i32, _>(IntegerConverter)
            .register::<i16, _>(IntegerConverter)
            .register::<i8, _>(IntegerConverter)
            .register::<u8, _>(IntegerConverter)
            .register::<u16, _>(IntegerConverter)
            .register::<u32, _>(IntegerConverter)
            .register::<f64, _>(RealConverter)
            .register::<f32, _>(RealConverter)
            .register::<bool, _>(BooleanConverter)
            .register::<String, _>(TextConverter)
            .register::<Vec<u8>, _>(BlobConverter);

        #[cfg(feature = "uuid")]
        registry.register::<uuid::Uuid, _>(UuidConverter);

        #[cfg(feature = "chrono")]
        registry.register::<chrono::DateTime<chrono::Utc>, _>(DateTimeConverter);

        registry
    }

    /// Register `converter` for values of type `V`, replacing any previous
    /// converter for `V`.
    pub fn register<V, C>(&mut self, converter: C) -> &mut Self
    where
        V: Any + Send,
        C: FieldConverter<V> + 'static
    {
        self.converters
            .insert(TypeKey::of::<V>(), erase::<V, C>(converter));
        self
    }

    /// Register JSON text storage for `V`.
    pub fn register_json<V>(&mut self) -> &mut Self
    where
        V: Serialize + DeserializeOwned + Any + Send
    {
        self.register::<V, _>(JsonConverter::<V>::new())
    }

    /// Register an already erased converter under its own value type.
    pub fn register_erased(&mut self, converter: Arc<dyn ValueConverter>) -> &mut Self {
        self.converters.insert(converter.value_type(), converter);
        self
    }

    /// Append a factory consulted for types without a registered converter.
    pub fn register_factory<F>(&mut self, factory: F) -> &mut Self
    where
        F: ConverterFactory + 'static
    {
        self.factories.push(Arc::new(factory));
        self
    }

    /// Converter for `value_type`.
    ///
    /// The registered converter wins; otherwise the first factory producing a
    /// converter for exactly `value_type` does. Factory results are not
    /// cached.
    pub fn lookup(&self, value_type: &TypeKey) -> Option<Arc<dyn ValueConverter>> {
        if let Some(converter) = self.converters.get(value_type) {
            return Some(Arc::clone(converter));
        }
        self.factories
            .iter()
            .filter_map(|factory| factory.create(value_type))
            .find(|converter| converter.value_type() == *value_type)
    }

    /// Check if a converter for `V` is registered.
    pub fn contains<V: Any>(&self) -> bool {
        self.converters.contains_key(&TypeKey::of::<V>())
    }

    /// Number of registered converters, factories excluded.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Number of registered factories.
    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }

    /// Check if neither a converter nor a factory is registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty() && self.factories.is_empty()
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.converters.keys().map(TypeKey::name).collect();
        names.sort_unstable();
        f.debug_struct("ConverterRegistry")
            .field("types", &names)
            .field("factories", &self.factories.len())
            .finish()
    }
}
