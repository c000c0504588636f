// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use rowmap::{Entity, Registry};

#[derive(Entity, Debug, Default)]
#[entity(default)]
pub struct Setting<V>
where
    V: Clone + Default + Send + 'static
{
    pub key: String,
    pub value: V,
    pub _id: Option<i64>,
}

fn main() {
    let registry = Registry::new();
    let converter = registry.register::<Setting<i32>>().unwrap();
    assert_eq!(converter.table_name(), "Setting");
    assert_eq!(converter.projection(), vec!["key", "value", "_id"]);
}
