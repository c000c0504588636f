// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Convenient re-exports for common usage.
//!
//! # Usage
//!
//! ```rust
//! use rowmap_core::prelude::*;
//! ```

pub use crate::{
    ColumnType, ConvertError, Cursor, Entity, EntityConverter, EntityDescriptor, FieldConverter,
    FieldDescriptor, MappingError, MappingOptions, Registry, Row, RowValues, Value
};
