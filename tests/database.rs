// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Store and read derived entities through the in-memory row store.

mod common;

use common::MemoryStore;
use rowmap::{Entity, ID_COLUMN, Registry, Row, Value};

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity(constructor)]
pub struct Sample {
    #[entity(immutable)]
    pub field1: String,

    #[entity(immutable)]
    pub field2: i32,

    #[entity(immutable)]
    pub field3: bool,

    #[entity(default)]
    pub _id: Option<i64>
}

impl Sample {
    fn new(field1: &str, field2: i32, field3: bool) -> Self {
        Self {
            field1: field1.to_string(),
            field2,
            field3,
            _id: None
        }
    }
}

#[derive(Entity, Debug, Clone, Default, PartialEq)]
#[entity(default)]
pub struct Account {
    pub name:     String,
    pub balance:  f64,
    pub active:   bool,
    pub avatar:   Vec<u8>,
    pub nickname: Option<String>,
    pub _id:      Option<i64>
}

#[derive(Entity, Debug)]
#[entity(constructor)]
pub struct Labelled {
    #[entity(immutable)]
    pub label: String,

    #[entity(immutable, transient, default = "String::from(\"unset\")")]
    pub origin: String,

    #[entity(default)]
    pub _id: Option<i64>
}

#[derive(Entity, Debug, Clone, Default, PartialEq)]
#[entity(default)]
pub struct Record {
    pub _id:     Option<i64>,
    pub created: i64
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[entity(constructor)]
pub struct Note {
    #[entity(immutable)]
    pub title: String,

    #[entity(immutable, default = "1")]
    pub priority: i32,

    #[entity(default)]
    pub body: Option<String>,

    #[entity(base)]
    pub record: Record
}

#[derive(Entity, Debug, Default)]
#[entity(default)]
pub struct Article {
    #[column(name = "heading", index = "idx_heading", unique)]
    pub title: String,

    #[column(ignore)]
    pub draft: String,

    #[entity(transient)]
    pub views: i64,

    pub tags: Vec<String>,

    pub _id: Option<i64>
}

#[test]
fn immutable_entities_get_increasing_identities() {
    let registry = Registry::new();
    let converter = registry.register::<Sample>().expect("register");
    let mut store = MemoryStore::new();

    let mut samples = vec![
        Sample::new("first", 1, true),
        Sample::new("second", 2, false),
        Sample::new("third", 3, true),
    ];
    for sample in &mut samples {
        store.insert(&converter, sample).expect("insert");
    }

    let loaded = store.all(&converter).expect("read");
    assert_eq!(loaded, samples);

    let ids: Vec<i64> = loaded.iter().map(|sample| sample._id.expect("id")).collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn absent_identity_is_left_to_the_store() {
    let registry = Registry::new();
    let converter = registry.register::<Sample>().expect("register");

    let values = converter
        .to_values(&Sample::new("draft", 0, false))
        .expect("to_values");
    assert!(!values.contains(ID_COLUMN));
    assert_eq!(values.get("field1"), Some(&Value::Text("draft".to_string())));
    assert_eq!(values.get("field3"), Some(&Value::Integer(0)));
}

#[test]
fn mutable_entity_round_trips_every_field() {
    let registry = Registry::new();
    let converter = registry.register::<Account>().expect("register");
    assert!(converter.binding().is_none());

    let mut store = MemoryStore::new();
    let mut account = Account {
        name:     "ada".to_string(),
        balance:  12.5,
        active:   true,
        avatar:   vec![1, 2, 3],
        nickname: Some("countess".to_string()),
        _id:      None
    };
    let id = store.insert(&converter, &mut account).expect("insert");
    assert_eq!(account._id, Some(id));

    let loaded = store.all(&converter).expect("read");
    assert_eq!(loaded, vec![account]);
}

#[test]
fn absent_nullable_field_is_written_as_null() {
    let registry = Registry::new();
    let converter = registry.register::<Account>().expect("register");

    let values = converter.to_values(&Account::default()).expect("to_values");
    assert_eq!(values.get("nickname"), Some(&Value::Null));
    assert!(!values.contains(ID_COLUMN));
}

#[test]
fn null_cell_clears_nullable_field() {
    let registry = Registry::new();
    let converter = registry.register::<Account>().expect("register");

    let row = Row::new(vec![
        Value::from("bob"),
        Value::Real(0.0),
        Value::Integer(0),
        Value::Blob(Vec::new()),
        Value::Null,
        Value::Integer(4),
    ]);
    let account = converter.from_row(&row).expect("from_row");
    assert_eq!(account.nickname, None);
    assert_eq!(account._id, Some(4));
}

#[test]
fn defaulted_parameter_without_column_yields_default() {
    let registry = Registry::new();
    let converter = registry.register::<Labelled>().expect("register");
    assert_eq!(converter.projection(), vec!["label", ID_COLUMN]);

    let mut store = MemoryStore::new();
    let mut labelled = Labelled {
        label:  "box".to_string(),
        origin: "warehouse".to_string(),
        _id:    None
    };
    store.insert(&converter, &mut labelled).expect("insert");

    let loaded = store.all(&converter).expect("read");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].label, "box");
    assert_eq!(loaded[0].origin, "unset");
    assert_eq!(loaded[0]._id, labelled._id);
}

#[test]
fn base_fields_follow_own_fields() {
    let registry = Registry::new();
    let converter = registry.register::<Note>().expect("register");
    assert_eq!(
        converter.projection(),
        vec!["title", "priority", "body", ID_COLUMN, "created"]
    );
    assert_eq!(converter.identity_column().map(|column| column.cursor_index()), Some(3));

    let mut store = MemoryStore::new();
    let mut note = Note {
        title:    "groceries".to_string(),
        priority: 3,
        body:     Some("milk".to_string()),
        record:   Record {
            _id:     None,
            created: 1_700_000_000
        }
    };
    let id = store.insert(&converter, &mut note).expect("insert");
    assert_eq!(note.record._id, Some(id));

    let loaded = store.all(&converter).expect("read");
    assert_eq!(loaded, vec![note]);
}

#[test]
fn short_row_falls_back_to_defaults() {
    let registry = Registry::new();
    let converter = registry.register::<Note>().expect("register");

    let row = Row::new(vec![Value::from("todo")]);
    let note = converter.from_row(&row).expect("from_row");
    assert_eq!(note.title, "todo");
    assert_eq!(note.priority, 1);
    assert_eq!(note.body, None);
    assert_eq!(note.record, Record::default());
}

#[test]
fn annotations_rename_index_and_ignore() {
    let registry = Registry::builder()
        .use_annotations()
        .json::<Vec<String>>()
        .build();
    let converter = registry.register::<Article>().expect("register");
    assert_eq!(converter.projection(), vec!["heading", "tags", ID_COLUMN]);

    let heading = converter.column("heading").expect("heading");
    assert_eq!(heading.field_name(), "title");
    let index = heading.index().expect("index");
    assert_eq!(index.name, Some("idx_heading"));
    assert!(index.unique);

    let mut store = MemoryStore::new();
    let mut article = Article {
        title: "rowmap".to_string(),
        draft: "unpublished".to_string(),
        views: 10,
        tags:  vec!["rust".to_string(), "orm".to_string()],
        _id:   None
    };
    store.insert(&converter, &mut article).expect("insert");

    let loaded = store.all(&converter).expect("read");
    assert_eq!(loaded[0].title, "rowmap");
    assert_eq!(loaded[0].tags, article.tags);
    assert!(loaded[0].draft.is_empty());
    assert_eq!(loaded[0].views, 0);
}

#[test]
fn annotations_are_ignored_unless_enabled() {
    let registry = Registry::builder().json::<Vec<String>>().build();
    let converter = registry.register::<Article>().expect("register");
    assert_eq!(converter.projection(), vec!["title", "draft", "tags", ID_COLUMN]);
    assert!(converter.columns().iter().all(|column| column.index().is_none()));
}

#[test]
fn tables_are_kept_apart() {
    let registry = Registry::new();
    let samples = registry.register::<Sample>().expect("samples");
    let accounts = registry.register::<Account>().expect("accounts");

    let mut store = MemoryStore::new();
    store
        .insert(&samples, &mut Sample::new("one", 1, true))
        .expect("sample");
    let id = store
        .insert(&accounts, &mut Account::default())
        .expect("account");

    assert_eq!(id, 1);
    assert_eq!(store.len("Sample"), 1);
    assert_eq!(store.len("Account"), 1);
    assert_eq!(registry.len(), 2);
}
