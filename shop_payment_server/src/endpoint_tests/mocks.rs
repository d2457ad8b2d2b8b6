use mockall::mock;
use shop_payment_engine::{
    db_types::{NewOrder, NewPaymentRecord, Order, OrderId, OrderStatusType, PaymentRecord, Product},
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

mock! {
    pub Backend {}
    impl PaymentStore for Backend {
        async fn create_payment(&self, payment: NewPaymentRecord) -> Result<PaymentRecord, PaymentStoreError>;
        async fn fetch_payment_by_transaction_uuid(&self, transaction_uuid: &str) -> Result<Option<PaymentRecord>, PaymentStoreError>;
        async fn settle_payment(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError>;
        async fn mark_payment_failed(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError>;
        async fn mark_payment_refunded(&self, transaction_uuid: &str) -> Result<bool, PaymentStoreError>;
    }
    impl OrderStore for Backend {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;
        async fn fetch_order_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_order_for_user(&self, user_id: &str, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn transition_order_status(&self, order_id: &OrderId, from: OrderStatusType, to: OrderStatusType) -> Result<bool, OrderStoreError>;
    }
    impl ProductCatalog for Backend {
        async fn fetch_products(&self, product_ids: &[String]) -> Result<Vec<Product>, CatalogError>;
        async fn fetch_product(&self, product_id: &str) -> Result<Product, CatalogError>;
        async fn decrement_stock(&self, product_id: &str, quantity: i64) -> Result<(), CatalogError>;
        async fn restore_stock(&self, product_id: &str, quantity: i64) -> Result<(), CatalogError>;
    }
    impl CartStore for Backend {
        async fn clear_cart(&self, user_id: &str) -> Result<(), CartStoreError>;
    }
}
