use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An order stores the total the client computed at checkout. There is no
/// line-item linkage back to the cart rows it was built from, and the server
/// does not recompute or verify the total against cart contents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,

    pub user_id: i32,

    pub status: String,

    pub total: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub status: String,
    pub total: Decimal,
}
