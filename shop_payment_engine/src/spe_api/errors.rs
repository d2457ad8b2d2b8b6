use thiserror::Error;

use crate::traits::{CartStoreError, CatalogError, OrderStoreError, PaymentStoreError};

#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    #[error("Invalid checkout request: {0}")]
    InvalidInput(String),
    #[error("No payment record exists for transaction {0}")]
    PaymentNotFound(String),
    #[error("The operation is not valid in the current state: {0}")]
    InvalidState(String),
    #[error("Order {0} could not be found")]
    OrderNotFound(String),
    #[error(transparent)]
    CatalogError(#[from] CatalogError),
    #[error(transparent)]
    PaymentStoreError(#[from] PaymentStoreError),
    #[error(transparent)]
    OrderStoreError(#[from] OrderStoreError),
    #[error(transparent)]
    CartStoreError(#[from] CartStoreError),
}
