// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use rowmap::{Entity, Registry};

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity(constructor)]
pub struct Event {
    #[entity(immutable)]
    pub name: String,

    #[entity(immutable, default = "None")]
    pub location: Option<String>,

    #[entity(immutable, default)]
    pub attendees: u32,

    #[entity(default)]
    pub _id: Option<i64>,
}

fn main() {
    let registry = Registry::new();
    let converter = registry.register::<Event>().unwrap();
    let binding = converter.binding().unwrap();
    assert_eq!(binding.params().len(), 4);

    let event = Event {
        name: "launch".to_string(),
        location: Some("hall".to_string()),
        attendees: 40,
        _id: None,
    };
    let values = converter.to_values(&event).unwrap();
    assert!(!values.contains("_id"));
    assert_eq!(values.len(), 3);
}
