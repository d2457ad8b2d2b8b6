use log::debug;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db_types::{LineItem, NewPaymentRecord, PaymentRecord, PaymentStatus},
    traits::PaymentStoreError,
};

/// Inserts a new payment record and its line items using the given connection. This is not
/// atomic. You can embed this call inside a transaction if you need to ensure atomicity, and
/// pass `&mut *tx` as the connection argument.
///
/// The `transaction_uuid` column is unique; inserting a second record for the same transaction
/// fails with [`PaymentStoreError::PaymentAlreadyExists`].
pub async fn insert_payment(
    payment: NewPaymentRecord,
    conn: &mut SqliteConnection,
) -> Result<PaymentRecord, PaymentStoreError> {
    let id = Uuid::new_v4().to_string();
    let result = sqlx::query_as::<_, PaymentRecord>(
        r#"
            INSERT INTO payments (id, amount, user_id, transaction_uuid)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(payment.amount.value())
    .bind(&payment.user_id)
    .bind(&payment.transaction_uuid)
    .fetch_one(&mut *conn)
    .await;
    let mut record = match result {
        Ok(record) => record,
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => {
            return Err(PaymentStoreError::PaymentAlreadyExists(payment.transaction_uuid));
        },
        Err(e) => return Err(e.into()),
    };
    for (ordinal, item) in payment.items.iter().enumerate() {
        sqlx::query(
            r#"
                INSERT INTO payment_items (payment_id, product_id, seller_id, quantity, price, ordinal)
                VALUES ($1, $2, $3, $4, $5, $6);
            "#,
        )
        .bind(&record.id)
        .bind(&item.product_id)
        .bind(&item.seller_id)
        .bind(item.quantity)
        .bind(item.price.value())
        .bind(ordinal as i64)
        .execute(&mut *conn)
        .await?;
    }
    record.items = payment.items;
    debug!("🗃️💰️ Payment record [{}] inserted with id {}", record.transaction_uuid, record.id);
    Ok(record)
}

pub async fn fetch_payment_by_transaction_uuid(
    transaction_uuid: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let payment = sqlx::query_as::<_, PaymentRecord>("SELECT * FROM payments WHERE transaction_uuid = $1")
        .bind(transaction_uuid)
        .fetch_optional(&mut *conn)
        .await?;
    let payment = match payment {
        Some(mut payment) => {
            payment.items = fetch_payment_items(&payment.id, conn).await?;
            Some(payment)
        },
        None => None,
    };
    Ok(payment)
}

async fn fetch_payment_items(payment_id: &str, conn: &mut SqliteConnection) -> Result<Vec<LineItem>, sqlx::Error> {
    sqlx::query_as(
        "SELECT product_id, seller_id, quantity, price FROM payment_items WHERE payment_id = $1 ORDER BY ordinal",
    )
    .bind(payment_id)
    .fetch_all(conn)
    .await
}

/// Moves a payment from one status to another as a single conditional update. Returns `true` iff
/// a row changed, i.e. iff this caller performed the transition.
pub async fn transition_payment_status(
    transaction_uuid: &str,
    from: PaymentStatus,
    to: PaymentStatus,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
            UPDATE payments SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE transaction_uuid = $2 AND status = $3;
        "#,
    )
    .bind(to)
    .bind(transaction_uuid)
    .bind(from)
    .execute(conn)
    .await?;
    let changed = result.rows_affected() > 0;
    if changed {
        debug!("🗃️💰️ Payment [{transaction_uuid}] moved from {from} to {to}");
    }
    Ok(changed)
}
