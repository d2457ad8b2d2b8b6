use serde::{Deserialize, Serialize};
use shop_payment_engine::db_types::CartItem;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: String,
    pub cart_items: Vec<CartItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub transaction_uuid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub user_id: String,
}

/// Query parameters for the status-check relay. Parameter names follow the gateway's own
/// snake_case convention so a frontend can forward them untouched. `product_code` may be omitted;
/// the configured merchant code is used in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusQuery {
    pub transaction_uuid: String,
    pub product_code: Option<String>,
    pub total_amount: i64,
}
