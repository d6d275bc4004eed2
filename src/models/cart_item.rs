use serde::{Deserialize, Serialize};

/// One row per add-to-cart. Duplicate adds of the same product are kept as
/// separate rows; removal is always an explicit delete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i32,

    pub user_id: i32,

    pub product_id: i32,

    pub quantity: i32,
}

/// Creation payload. The owning user comes from the session, never the body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: i32,
    pub quantity: i32,
}

/// Quantity is the only mutable field on a cart item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemUpdate {
    pub quantity: i32,
}
