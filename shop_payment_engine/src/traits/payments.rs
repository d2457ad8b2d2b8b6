use thiserror::Error;

use crate::db_types::{NewPaymentRecord, PaymentRecord};

/// Storage for payment attempts. `transaction_uuid` is the idempotency key for settlement: every
/// status transition is a conditional update that can only succeed once, no matter how many times
/// the gateway reports the same outcome.
#[allow(async_fn_in_trait)]
pub trait PaymentStore {
    /// Persists a new payment attempt in `pending` state, together with its line items.
    /// Fails with [`PaymentStoreError::PaymentAlreadyExists`] if the transaction uuid is taken.
    async fn create_payment(&self, payment: NewPaymentRecord) -> Result<PaymentRecord, PaymentStoreError>;

    /// Fetches the payment record (including line items) for the given transaction uuid.
    async fn fetch_payment_by_transaction_uuid(
        &self,
        transaction_uuid: &str,
    ) -> Result<Option<PaymentRecord>, PaymentStoreError>;

    /// Attempts the `pending → success` transition. Returns `true` iff this call performed the
    /// transition; `false` means the payment was not in `pending` state (or does not exist).
    async fn settle_payment(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError>;

    /// Attempts the `pending → failed` transition, with the same once-only semantics.
    async fn mark_payment_failed(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError>;

    /// Attempts the `success → refunded` transition, with the same once-only semantics.
    async fn mark_payment_refunded(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum PaymentStoreError {
    #[error("Cannot insert payment, since it already exists with transaction uuid {0}")]
    PaymentAlreadyExists(String),
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for PaymentStoreError {
    fn from(e: sqlx::Error) -> Self {
        PaymentStoreError::DatabaseError(e.to_string())
    }
}
