use log::debug;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db_types::{LineItem, NewOrder, Order, OrderId, OrderStatusType},
    traits::OrderStoreError,
};

/// Inserts a new order and its line items using the given connection. This is not atomic. You
/// can embed this call inside a transaction if you need to ensure atomicity, and pass `&mut *tx`
/// as the connection argument.
///
/// The `transaction_id` column is unique, so at most one order can ever exist per settled
/// payment. A second insert for the same transaction fails with
/// [`OrderStoreError::OrderAlreadyExists`].
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let id = Uuid::new_v4().to_string();
    let result = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (id, user_id, amount, transaction_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(&order.user_id)
    .bind(order.amount.value())
    .bind(&order.transaction_id)
    .fetch_one(&mut *conn)
    .await;
    let mut record = match result {
        Ok(record) => record,
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => {
            return Err(OrderStoreError::OrderAlreadyExists(order.transaction_id));
        },
        Err(e) => return Err(e.into()),
    };
    for (ordinal, item) in order.items.iter().enumerate() {
        sqlx::query(
            r#"
                INSERT INTO order_items (order_id, product_id, seller_id, quantity, price, ordinal)
                VALUES ($1, $2, $3, $4, $5, $6);
            "#,
        )
        .bind(record.id.as_str())
        .bind(&item.product_id)
        .bind(&item.seller_id)
        .bind(item.quantity)
        .bind(item.price.value())
        .bind(ordinal as i64)
        .execute(&mut *conn)
        .await?;
    }
    record.items = order.items;
    debug!("🗃️📦️ Order {} inserted for transaction [{}]", record.id, record.transaction_id);
    Ok(record)
}

pub async fn fetch_order_by_transaction_id(
    transaction_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE transaction_id = $1")
        .bind(transaction_id)
        .fetch_optional(&mut *conn)
        .await?;
    attach_items(order, conn).await
}

/// Fetches an order by id, scoped to its owner. A caller asking about someone else's order gets
/// `None`, indistinguishable from a missing order.
pub async fn fetch_order_for_user(
    user_id: &str,
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(order_id.as_str())
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
    attach_items(order, conn).await
}

async fn attach_items(order: Option<Order>, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = match order {
        Some(mut order) => {
            order.items = fetch_order_items(&order.id, conn).await?;
            Some(order)
        },
        None => None,
    };
    Ok(order)
}

async fn fetch_order_items(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Vec<LineItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT product_id, seller_id, quantity, price FROM order_items WHERE order_id = $1 ORDER BY ordinal",
    )
    .bind(order_id.as_str())
    .fetch_all(conn)
    .await
}

/// Moves an order from one status to another as a single conditional update. Returns `true` iff
/// a row changed, i.e. iff this caller performed the transition.
pub async fn transition_order_status(
    order_id: &OrderId,
    from: OrderStatusType,
    to: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND status = $3;
        "#,
    )
    .bind(to)
    .bind(order_id.as_str())
    .bind(from)
    .execute(conn)
    .await?;
    let changed = result.rows_affected() > 0;
    if changed {
        debug!("🗃️📦️ Order {order_id} moved from {from} to {to}");
    }
    Ok(changed)
}
