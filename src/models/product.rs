use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,

    pub name: String,

    pub description: String,

    /// Serialized as a decimal string on the wire ("129.99").
    pub price: Decimal,

    /// Image URL.
    pub image: String,

    pub category: String,

    pub stock: i32,
}

/// Validated creation payload (id is assigned by the store).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub stock: i32,
}

/// Partial update: only the fields present are merged into the stored record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i32>,
}
