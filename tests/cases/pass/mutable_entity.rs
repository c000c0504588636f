// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use rowmap::{Entity, Registry, Row, Value};

#[derive(Entity, Debug, Default)]
#[entity(default)]
pub struct Counter {
    pub label: String,
    pub hits: i64,
    pub ratio: Option<f64>,
    pub _id: Option<i64>,
}

fn main() {
    let registry = Registry::new();
    let converter = registry.register::<Counter>().unwrap();
    assert_eq!(converter.table_name(), "Counter");
    assert_eq!(converter.projection(), vec!["label", "hits", "ratio", "_id"]);

    let row = Row::new(vec![
        Value::from("home"),
        Value::Integer(12),
        Value::Null,
        Value::Integer(1),
    ]);
    let counter = converter.from_row(&row).unwrap();
    assert_eq!(counter.label, "home");
    assert_eq!(counter.hits, 12);
    assert_eq!(counter.ratio, None);
    assert_eq!(counter._id, Some(1));
}
