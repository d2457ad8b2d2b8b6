use std::fmt::Debug;

use log::*;
use sps_common::Rupees;

use crate::{
    db_types::{CartItem, LineItem, NewOrder, NewPaymentRecord, Order, OrderId, PaymentRecord, PaymentStatus, Product},
    spe_api::SettlementError,
    traits::{CartStore, CatalogError, OrderStore, OrderStoreError, PaymentStore, ProductCatalog},
};
use crate::db_types::OrderStatusType::{Cancelled, Created};

/// `SettlementApi` is the primary API for the checkout and settlement flow. It carries a cart
/// through availability checks, server-side pricing, payment record creation, and finally order
/// creation once the gateway reports a completed payment.
pub struct SettlementApi<B> {
    db: B,
}

impl<B> Debug for SettlementApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettlementApi")
    }
}

impl<B> SettlementApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> SettlementApi<B>
where B: PaymentStore + OrderStore + ProductCatalog + CartStore
{
    /// Checks that every item in the cart refers to an existing product with sufficient stock.
    ///
    /// An unknown product id is an error rather than a silent skip. The returned products carry
    /// the catalog's current prices, which is what checkout charges regardless of any prices the
    /// client submitted.
    pub async fn check_availability(&self, items: &[CartItem]) -> Result<Vec<Product>, SettlementError> {
        if items.is_empty() {
            return Err(SettlementError::InvalidInput("The cart is empty".to_string()));
        }
        for item in items {
            if item.quantity <= 0 {
                return Err(SettlementError::InvalidInput(format!(
                    "Invalid quantity {} for product {}",
                    item.quantity, item.id
                )));
            }
        }
        let ids = items.iter().map(|i| i.id.clone()).collect::<Vec<String>>();
        let products = self.db.fetch_products(&ids).await?;
        for item in items {
            let product = products
                .iter()
                .find(|p| p.id == item.id)
                .ok_or_else(|| CatalogError::ProductNotFound(item.id.clone()))?;
            if product.stock < item.quantity {
                return Err(CatalogError::InsufficientStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                    requested: item.quantity,
                }
                .into());
            }
        }
        debug!("🔄️🛒️ Availability check passed for {} cart item(s)", items.len());
        Ok(products)
    }

    /// Creates a pending payment record for the given cart, under the given transaction id.
    ///
    /// The amount is recomputed from the catalog's current prices. Client-supplied prices are
    /// ignored. The persisted line items snapshot the seller and unit price at checkout time so
    /// that settlement does not depend on the catalog again.
    pub async fn create_checkout(
        &self,
        user_id: &str,
        transaction_uuid: &str,
        items: &[CartItem],
    ) -> Result<PaymentRecord, SettlementError> {
        let products = self.check_availability(items).await?;
        let mut line_items = Vec::with_capacity(items.len());
        let mut amount = Rupees::from(0);
        for item in items {
            // check_availability guarantees the product exists
            let product = products
                .iter()
                .find(|p| p.id == item.id)
                .ok_or_else(|| CatalogError::ProductNotFound(item.id.clone()))?;
            amount += product.price * item.quantity;
            line_items.push(LineItem {
                product_id: product.id.clone(),
                seller_id: product.seller_id.clone(),
                quantity: item.quantity,
                price: product.price,
            });
        }
        let payment = NewPaymentRecord::new(user_id, amount, transaction_uuid, line_items);
        let record = self.db.create_payment(payment).await?;
        info!(
            "🔄️💰️ Checkout [{}] created for user {user_id}. {} item(s), total {amount}",
            record.transaction_uuid,
            record.items.len()
        );
        Ok(record)
    }

    /// Settles a payment after the gateway has confirmed it: marks the payment record
    /// successful, creates the order, and then performs best-effort housekeeping (stock
    /// decrements and cart clearing).
    ///
    /// Settlement is idempotent. A compare-and-set on the payment status decides a single winner
    /// among concurrent calls; losers (and repeat calls for an already-settled payment) receive
    /// the existing order. Settling a failed or refunded payment is an [`SettlementError::InvalidState`] error.
    pub async fn settle(&self, transaction_uuid: &str) -> Result<Order, SettlementError> {
        let payment = self
            .db
            .fetch_payment_by_transaction_uuid(transaction_uuid)
            .await?
            .ok_or_else(|| SettlementError::PaymentNotFound(transaction_uuid.to_string()))?;
        match payment.status {
            PaymentStatus::Pending => {
                if self.db.settle_payment(transaction_uuid).await? {
                    return self.create_order_for_payment(&payment).await;
                }
                // A concurrent settle won the race. Re-read the record to find out how it ended.
                let payment = self
                    .db
                    .fetch_payment_by_transaction_uuid(transaction_uuid)
                    .await?
                    .ok_or_else(|| SettlementError::PaymentNotFound(transaction_uuid.to_string()))?;
                match payment.status {
                    PaymentStatus::Success => self.fetch_settled_order(transaction_uuid).await,
                    other => Err(SettlementError::InvalidState(format!(
                        "Payment {transaction_uuid} is {other}, not pending"
                    ))),
                }
            },
            PaymentStatus::Success => {
                debug!("🔄️💰️ Payment [{transaction_uuid}] is already settled. Returning the existing order");
                self.fetch_settled_order(transaction_uuid).await
            },
            other => Err(SettlementError::InvalidState(format!(
                "Payment {transaction_uuid} is {other} and cannot be settled"
            ))),
        }
    }

    async fn fetch_settled_order(&self, transaction_uuid: &str) -> Result<Order, SettlementError> {
        match self.db.fetch_order_by_transaction_id(transaction_uuid).await? {
            Some(order) => Ok(order),
            // The settlement winner has flipped the payment status but has not committed the
            // order yet. Report a conflict so the gateway callback retries rather than treating
            // the order as missing.
            None => Err(SettlementError::InvalidState(format!(
                "Payment {transaction_uuid} is settled but its order is not available yet"
            ))),
        }
    }

    async fn create_order_for_payment(&self, payment: &PaymentRecord) -> Result<Order, SettlementError> {
        let new_order = NewOrder {
            user_id: payment.user_id.clone(),
            amount: payment.amount,
            transaction_id: payment.transaction_uuid.clone(),
            items: payment.items.clone(),
        };
        let order = match self.db.insert_order(new_order).await {
            Ok(order) => order,
            // The unique constraint on the transaction id backstops the status CAS
            Err(OrderStoreError::OrderAlreadyExists(txid)) => {
                debug!("🔄️📦️ An order for transaction [{txid}] already exists");
                return self.fetch_settled_order(&txid).await;
            },
            Err(e) => return Err(e.into()),
        };
        info!(
            "🔄️📦️ Order {} created for payment [{}]. Total: {}",
            order.id, payment.transaction_uuid, order.amount
        );
        for item in &order.items {
            if let Err(e) = self.db.decrement_stock(&item.product_id, item.quantity).await {
                warn!(
                    "🔄️📦️ Could not adjust stock for product {} after order {}: {e}",
                    item.product_id, order.id
                );
            }
        }
        if let Err(e) = self.db.clear_cart(&payment.user_id).await {
            warn!("🔄️🛒️ Could not clear the cart for user {} after order {}: {e}", payment.user_id, order.id);
        }
        Ok(order)
    }

    /// Marks a payment as failed after the gateway reports an unsuccessful outcome. Only pending
    /// payments can fail; anything else is reported but not treated as an error by callers.
    pub async fn mark_payment_failed(&self, transaction_uuid: &str) -> Result<bool, SettlementError> {
        let changed = self.db.mark_payment_failed(transaction_uuid).await?;
        if changed {
            info!("🔄️💰️ Payment [{transaction_uuid}] marked as failed");
        }
        Ok(changed)
    }

    /// Fetches a single order belonging to the given user.
    pub async fn fetch_order(&self, user_id: &str, order_id: &OrderId) -> Result<Order, SettlementError> {
        self.db
            .fetch_order_for_user(user_id, order_id)
            .await?
            .ok_or_else(|| SettlementError::OrderNotFound(order_id.to_string()))
    }

    /// Cancels an order that has not progressed past the `Created` status.
    ///
    /// The status transition is guarded at the storage layer so that two concurrent cancels
    /// cannot both succeed. Stock restoration is best-effort; a failure there is logged but does
    /// not undo the cancellation.
    pub async fn cancel_order(&self, user_id: &str, order_id: &OrderId) -> Result<Order, SettlementError> {
        let order = self.fetch_order(user_id, order_id).await?;
        if order.status != Created {
            return Err(SettlementError::InvalidState(format!(
                "Order {order_id} is {} and can no longer be cancelled",
                order.status
            )));
        }
        if !self.db.transition_order_status(order_id, Created, Cancelled).await? {
            return Err(SettlementError::InvalidState(format!(
                "Order {order_id} changed status while the cancellation was being processed"
            )));
        }
        info!("🔄️📦️ Order {order_id} cancelled by user {user_id}");
        for item in &order.items {
            if let Err(e) = self.db.restore_stock(&item.product_id, item.quantity).await {
                warn!("🔄️📦️ Could not restore stock for product {} of order {order_id}: {e}", item.product_id);
            }
        }
        self.fetch_order(user_id, order_id).await
    }
}
