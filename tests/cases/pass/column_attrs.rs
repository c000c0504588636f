// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use rowmap::{Entity, Registry};

#[derive(Entity, Debug, Default)]
#[entity(default)]
pub struct Product {
    #[column(name = "sku_code", unique)]
    pub sku: String,

    #[column(index)]
    pub category: String,

    #[column(index = "idx_price")]
    pub price: f64,

    #[column(ignore)]
    pub preview: Vec<u8>,

    #[entity(transient)]
    pub cart_count: u32,

    pub _id: Option<i64>,
}

fn main() {
    let registry = Registry::builder().use_annotations().build();
    let converter = registry.register::<Product>().unwrap();
    assert_eq!(
        converter.projection(),
        vec!["sku_code", "category", "price", "_id"]
    );

    let price = converter.column("price").unwrap();
    assert_eq!(price.index().unwrap().name, Some("idx_price"));
    assert!(converter.column("sku_code").unwrap().index().unwrap().unique);
}
