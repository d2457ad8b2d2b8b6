use thiserror::Error;

/// Housekeeping access to user shopping carts. Settlement clears the buyer's cart once an order
/// is committed; a failure here never fails the settlement itself.
#[allow(async_fn_in_trait)]
pub trait CartStore {
    /// Removes every item from the given user's cart.
    async fn clear_cart(&self, user_id: &str) -> Result<(), CartStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum CartStoreError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CartStoreError {
    fn from(e: sqlx::Error) -> Self {
        CartStoreError::DatabaseError(e.to_string())
    }
}
