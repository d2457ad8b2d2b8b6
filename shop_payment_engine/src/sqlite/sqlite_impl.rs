//! `SqliteDatabase` is a concrete implementation of a shop payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{carts, create_schema, db_url, new_pool, orders, payments, products};
use crate::{
    db_types::{NewOrder, NewPaymentRecord, Order, OrderId, OrderStatusType, PaymentRecord, PaymentStatus, Product},
    traits::{
        CartStore,
        CartStoreError,
        CatalogError,
        OrderStore,
        OrderStoreError,
        PaymentStore,
        PaymentStoreError,
        ProductCatalog,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let mut conn = pool.acquire().await?;
        create_schema(&mut conn).await?;
        drop(conn);
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl PaymentStore for SqliteDatabase {
    async fn create_payment(&self, payment: NewPaymentRecord) -> Result<PaymentRecord, PaymentStoreError> {
        let mut tx = self.pool.begin().await?;
        let record = payments::insert_payment(payment, &mut *tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn fetch_payment_by_transaction_uuid(
        &self,
        transaction_uuid: &str,
    ) -> Result<Option<PaymentRecord>, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::fetch_payment_by_transaction_uuid(transaction_uuid, &mut conn).await?;
        Ok(payment)
    }

    async fn settle_payment(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let changed = payments::transition_payment_status(
            transaction_uuid,
            PaymentStatus::Pending,
            PaymentStatus::Success,
            &mut conn,
        )
        .await?;
        Ok(changed)
    }

    async fn mark_payment_failed(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let changed = payments::transition_payment_status(
            transaction_uuid,
            PaymentStatus::Pending,
            PaymentStatus::Failed,
            &mut conn,
        )
        .await?;
        Ok(changed)
    }

    async fn mark_payment_refunded(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError> {
        let mut conn = self.pool.acquire().await?;
        let changed = payments::transition_payment_status(
            transaction_uuid,
            PaymentStatus::Success,
            PaymentStatus::Refunded,
            &mut conn,
        )
        .await?;
        Ok(changed)
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let record = orders::insert_order(order, &mut *tx).await?;
        tx.commit().await?;
        Ok(record)
    }

    async fn fetch_order_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_transaction_id(transaction_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_for_user(&self, user_id: &str, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_for_user(user_id, order_id, &mut conn).await?;
        Ok(order)
    }

    async fn transition_order_status(
        &self,
        order_id: &OrderId,
        from: OrderStatusType,
        to: OrderStatusType,
    ) -> Result<bool, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let changed = orders::transition_order_status(order_id, from, to, &mut conn).await?;
        Ok(changed)
    }
}

impl ProductCatalog for SqliteDatabase {
    async fn fetch_products(&self, product_ids: &[String]) -> Result<Vec<Product>, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_products_by_ids(product_ids, &mut conn).await?;
        Ok(products)
    }

    async fn fetch_product(&self, product_id: &str) -> Result<Product, CatalogError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product_by_id(product_id, &mut conn)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;
        Ok(product)
    }

    async fn decrement_stock(&self, product_id: &str, quantity: i64) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        products::decrement_stock(product_id, quantity, &mut conn).await
    }

    async fn restore_stock(&self, product_id: &str, quantity: i64) -> Result<(), CatalogError> {
        let mut conn = self.pool.acquire().await?;
        products::restore_stock(product_id, quantity, &mut conn).await
    }
}

impl CartStore for SqliteDatabase {
    async fn clear_cart(&self, user_id: &str) -> Result<(), CartStoreError> {
        let mut conn = self.pool.acquire().await?;
        carts::clear_cart(user_id, &mut conn).await?;
        Ok(())
    }
}
