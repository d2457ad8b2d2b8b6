use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId, OrderStatusType};

/// Storage for orders. `transaction_id` carries a UNIQUE constraint so that a settlement race can
/// never materialize two orders for one payment.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Inserts the order and its line items atomically, in `created` status.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;

    /// Fetches the order that settled the given transaction, if any.
    async fn fetch_order_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Order>, OrderStoreError>;

    /// Fetches an order, scoped to its owning user.
    async fn fetch_order_for_user(&self, user_id: &str, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Status-guarded transition. Returns `true` iff the order was in `from` status and is now in
    /// `to` status; concurrent callers cannot both win.
    async fn transition_order_status(
        &self,
        order_id: &OrderId,
        from: OrderStatusType,
        to: OrderStatusType,
    ) -> Result<bool, OrderStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Cannot insert order, since transaction {0} has already been settled")]
    OrderAlreadyExists(String),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}
