// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use rowmap::{Entity, Registry, enumerate_fields};

#[derive(Entity, Debug, Default)]
#[entity(default)]
pub struct Record {
    pub _id: Option<i64>,
}

#[derive(Entity, Debug, Default)]
#[entity(default)]
pub struct Audited {
    pub created: i64,

    #[entity(base)]
    pub record: Record,
}

#[derive(Entity, Debug)]
#[entity(constructor)]
pub struct Comment {
    #[entity(immutable)]
    pub text: String,

    #[entity(base)]
    pub audited: Audited,
}

fn main() {
    let descriptor = <Comment as rowmap::Entity>::descriptor();
    let names: Vec<&str> = enumerate_fields(&descriptor)
        .into_iter()
        .map(|field| field.name())
        .collect();
    assert_eq!(names, vec!["text", "created", "_id"]);

    let registry = Registry::new();
    let converter = registry.register::<Comment>().unwrap();
    let mut comment = Comment {
        text: "hi".to_string(),
        audited: Audited::default(),
    };
    converter.assign_identity(Some(9), &mut comment).unwrap();
    assert_eq!(comment.audited.record._id, Some(9));
    assert_eq!(converter.read_identity(&comment), Some(9));
}
