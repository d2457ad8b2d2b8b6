use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

pub use sps_common::Rupees;

//--------------------------------------   PaymentStatus     ---------------------------------------------------------
/// The lifecycle of a payment record. The only legal forward transitions are
/// `Pending → Success`, `Pending → Failed` and `Success → Refunded`; backends enforce them with
/// status-guarded conditional updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Success => write!(f, "success"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status: {0}")]
pub struct ConversionError(String);

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// Order lifecycle as seen by the storefront. Settlement always creates orders in `Created`;
/// sellers move them forward, and users may cancel them while still `Created`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    #[sqlx(rename = "created")]
    #[serde(rename = "created")]
    Created,
    #[sqlx(rename = "paid and processing")]
    #[serde(rename = "paid and processing")]
    PaidAndProcessing,
    #[sqlx(rename = "shipping")]
    #[serde(rename = "shipping")]
    Shipping,
    #[sqlx(rename = "delivered")]
    #[serde(rename = "delivered")]
    Delivered,
    #[sqlx(rename = "cancelled")]
    #[serde(rename = "cancelled")]
    Cancelled,
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Created => write!(f, "created"),
            OrderStatusType::PaidAndProcessing => write!(f, "paid and processing"),
            OrderStatusType::Shipping => write!(f, "shipping"),
            OrderStatusType::Delivered => write!(f, "delivered"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "paid and processing" => Ok(Self::PaidAndProcessing),
            "shipping" => Ok(Self::Shipping),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------       OrderId       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      CartItem       ---------------------------------------------------------
/// A client-supplied cart entry. Ephemeral — carts are never persisted by the engine, and the
/// client-sent `price` is advisory only: checkout re-prices every line from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub seller_id: String,
    pub quantity: i64,
    pub price: Rupees,
    pub name: String,
}

//--------------------------------------      LineItem       ---------------------------------------------------------
/// One product line within a payment record or an order. On orders, `seller_id` and `price` are
/// snapshots taken at order-creation time; later catalog changes must not rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    pub seller_id: String,
    pub quantity: i64,
    pub price: Rupees,
}

//--------------------------------------      Product        ---------------------------------------------------------
/// The slice of the catalog's product record the engine cares about. The engine only ever writes
/// `stock`; everything else belongs to the catalog service.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub seller_id: String,
    pub name: String,
    pub price: Rupees,
    pub stock: i64,
}

//--------------------------------------   NewPaymentRecord  ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub user_id: String,
    /// The server-side recomputed total for the cart.
    pub amount: Rupees,
    /// The gateway-facing transaction id; the idempotency key for settlement.
    pub transaction_uuid: String,
    pub items: Vec<LineItem>,
}

impl NewPaymentRecord {
    pub fn new(
        user_id: impl Into<String>,
        amount: Rupees,
        transaction_uuid: impl Into<String>,
        items: Vec<LineItem>,
    ) -> Self {
        Self { user_id: user_id.into(), amount, transaction_uuid: transaction_uuid.into(), items }
    }
}

//--------------------------------------    PaymentRecord    ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,
    pub amount: Rupees,
    pub user_id: String,
    pub transaction_uuid: String,
    #[sqlx(skip)]
    pub items: Vec<LineItem>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// The referenced product ids, in cart order.
    pub fn product_ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.product_id.as_str()).collect()
    }
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: String,
    pub amount: Rupees,
    /// Foreign key to `PaymentRecord::transaction_uuid`. Unique — the database-level backstop
    /// against duplicate settlement.
    pub transaction_id: String,
    pub items: Vec<LineItem>,
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: String,
    pub amount: Rupees,
    #[sqlx(skip)]
    #[serde(rename = "products")]
    pub items: Vec<LineItem>,
    pub transaction_id: String,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
