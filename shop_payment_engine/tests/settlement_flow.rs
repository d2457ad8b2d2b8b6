//! End-to-end settlement flow tests against an in-memory SQLite database.
use shop_payment_engine::{
    db_types::*,
    sqlite::db::{carts, products},
    traits::{CatalogError, OrderStore, PaymentStore, PaymentStoreError},
    SettlementApi,
    SettlementError,
    SqliteDatabase,
};
use sps_common::Rupees;

// An in-memory database exists per connection, so the pool must be capped at one.
async fn new_db() -> SqliteDatabase {
    let _ = env_logger::try_init();
    SqliteDatabase::new_with_url("sqlite::memory:", 1).await.expect("Error creating database")
}

async fn seed_product(db: &SqliteDatabase, id: &str, seller_id: &str, price: i64, stock: i64) {
    let product = Product {
        id: id.to_string(),
        seller_id: seller_id.to_string(),
        name: format!("Product {id}"),
        price: Rupees::from(price),
        stock,
    };
    let mut conn = db.pool().acquire().await.unwrap();
    products::insert_product(&product, &mut conn).await.expect("Error seeding product");
}

async fn stock_of(db: &SqliteDatabase, id: &str) -> i64 {
    let mut conn = db.pool().acquire().await.unwrap();
    products::fetch_product_by_id(id, &mut conn).await.unwrap().expect("product should exist").stock
}

fn cart_item(id: &str, quantity: i64, client_price: i64) -> CartItem {
    CartItem {
        id: id.to_string(),
        seller_id: "ignored".to_string(),
        quantity,
        price: Rupees::from(client_price),
        name: "ignored".to_string(),
    }
}

#[tokio::test]
async fn checkout_and_settle_creates_an_order() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 500, 5).await;
    {
        let mut conn = db.pool().acquire().await.unwrap();
        carts::upsert_cart_item("alice", "p1", 2, &mut conn).await.unwrap();
    }
    let api = SettlementApi::new(db.clone());

    // The client-submitted price of 1 rupee must be ignored in favour of the catalog price.
    let cart = vec![cart_item("p1", 2, 1)];
    let payment = api.create_checkout("alice", "260830-101500-AB12C", &cart).await.unwrap();
    assert_eq!(payment.amount, Rupees::from(1000));
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.items.len(), 1);
    assert_eq!(payment.items[0].price, Rupees::from(500));
    assert_eq!(payment.items[0].seller_id, "seller-1");
    // Stock is not reserved at checkout time
    assert_eq!(stock_of(&db, "p1").await, 5);

    let order = api.settle("260830-101500-AB12C").await.unwrap();
    assert_eq!(order.user_id, "alice");
    assert_eq!(order.amount, Rupees::from(1000));
    assert_eq!(order.status, OrderStatusType::Created);
    assert_eq!(order.transaction_id, "260830-101500-AB12C");
    assert_eq!(order.items, vec![LineItem {
        product_id: "p1".to_string(),
        seller_id: "seller-1".to_string(),
        quantity: 2,
        price: Rupees::from(500),
    }]);
    assert_eq!(stock_of(&db, "p1").await, 3);
    let mut conn = db.pool().acquire().await.unwrap();
    assert_eq!(carts::cart_item_count("alice", &mut conn).await.unwrap(), 0);
}

#[tokio::test]
async fn settling_twice_returns_the_same_order() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 250, 4).await;
    let api = SettlementApi::new(db.clone());
    api.create_checkout("bob", "tx-settle-twice", &[cart_item("p1", 1, 250)]).await.unwrap();

    let first = api.settle("tx-settle-twice").await.unwrap();
    let second = api.settle("tx-settle-twice").await.unwrap();
    assert_eq!(first.id, second.id);
    // The stock adjustment must only have happened once
    assert_eq!(stock_of(&db, "p1").await, 3);
}

#[tokio::test]
async fn settling_an_unknown_transaction_fails() {
    let db = new_db().await;
    let api = SettlementApi::new(db);
    let err = api.settle("no-such-transaction").await.unwrap_err();
    assert!(matches!(err, SettlementError::PaymentNotFound(_)), "Unexpected error: {err}");
}

#[tokio::test]
async fn settling_a_failed_payment_is_rejected() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 100, 10).await;
    let api = SettlementApi::new(db.clone());
    api.create_checkout("carol", "tx-failed", &[cart_item("p1", 1, 100)]).await.unwrap();
    assert!(api.mark_payment_failed("tx-failed").await.unwrap());

    let err = api.settle("tx-failed").await.unwrap_err();
    assert!(matches!(err, SettlementError::InvalidState(_)), "Unexpected error: {err}");
    assert_eq!(stock_of(&db, "p1").await, 10);
}

#[tokio::test]
async fn settling_while_the_order_is_still_being_written_is_a_conflict() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 100, 10).await;
    let api = SettlementApi::new(db.clone());
    api.create_checkout("carol", "tx-race", &[cart_item("p1", 1, 100)]).await.unwrap();
    // A concurrent settlement has won the status race but not committed its order yet
    assert!(db.settle_payment("tx-race").await.unwrap());

    let err = api.settle("tx-race").await.unwrap_err();
    assert!(
        matches!(&err, SettlementError::InvalidState(m) if m.contains("not available yet")),
        "Unexpected error: {err}"
    );
}

#[tokio::test]
async fn settling_a_refunded_payment_is_rejected() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 100, 10).await;
    let api = SettlementApi::new(db.clone());
    api.create_checkout("carol", "tx-refund", &[cart_item("p1", 1, 100)]).await.unwrap();
    api.settle("tx-refund").await.unwrap();
    assert!(db.mark_payment_refunded("tx-refund").await.unwrap());
    // Refunding again is a no-op
    assert!(!db.mark_payment_refunded("tx-refund").await.unwrap());

    let err = api.settle("tx-refund").await.unwrap_err();
    assert!(matches!(err, SettlementError::InvalidState(_)), "Unexpected error: {err}");
}

#[tokio::test]
async fn cancelling_a_created_order_restores_stock_once() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 300, 5).await;
    let api = SettlementApi::new(db.clone());
    api.create_checkout("dave", "tx-cancel", &[cart_item("p1", 2, 300)]).await.unwrap();
    let order = api.settle("tx-cancel").await.unwrap();
    assert_eq!(stock_of(&db, "p1").await, 3);

    let cancelled = api.cancel_order("dave", &order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatusType::Cancelled);
    assert_eq!(stock_of(&db, "p1").await, 5);

    let err = api.cancel_order("dave", &order.id).await.unwrap_err();
    assert!(matches!(err, SettlementError::InvalidState(_)), "Unexpected error: {err}");
    assert_eq!(stock_of(&db, "p1").await, 5);
}

#[tokio::test]
async fn orders_past_created_cannot_be_cancelled() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 300, 5).await;
    let api = SettlementApi::new(db.clone());
    api.create_checkout("erin", "tx-shipping", &[cart_item("p1", 1, 300)]).await.unwrap();
    let order = api.settle("tx-shipping").await.unwrap();
    let moved = db
        .transition_order_status(&order.id, OrderStatusType::Created, OrderStatusType::Shipping)
        .await
        .unwrap();
    assert!(moved);

    let err = api.cancel_order("erin", &order.id).await.unwrap_err();
    assert!(matches!(err, SettlementError::InvalidState(_)), "Unexpected error: {err}");
    assert_eq!(stock_of(&db, "p1").await, 4);
}

#[tokio::test]
async fn another_users_order_cannot_be_cancelled() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 300, 5).await;
    let api = SettlementApi::new(db.clone());
    api.create_checkout("frank", "tx-owner", &[cart_item("p1", 1, 300)]).await.unwrap();
    let order = api.settle("tx-owner").await.unwrap();

    let err = api.cancel_order("mallory", &order.id).await.unwrap_err();
    assert!(matches!(err, SettlementError::OrderNotFound(_)), "Unexpected error: {err}");
}

#[tokio::test]
async fn unknown_products_abort_checkout_before_any_record_is_written() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 100, 10).await;
    let api = SettlementApi::new(db.clone());

    let cart = vec![cart_item("p1", 1, 100), cart_item("ghost", 1, 100)];
    let err = api.create_checkout("grace", "tx-ghost", &cart).await.unwrap_err();
    assert!(
        matches!(err, SettlementError::CatalogError(CatalogError::ProductNotFound(ref id)) if id == "ghost"),
        "Unexpected error: {err}"
    );
    let err = api.settle("tx-ghost").await.unwrap_err();
    assert!(matches!(err, SettlementError::PaymentNotFound(_)), "Unexpected error: {err}");
}

#[tokio::test]
async fn empty_carts_are_rejected() {
    let db = new_db().await;
    let api = SettlementApi::new(db);
    let err = api.create_checkout("heidi", "tx-empty", &[]).await.unwrap_err();
    assert!(matches!(err, SettlementError::InvalidInput(_)), "Unexpected error: {err}");
}

#[tokio::test]
async fn non_positive_quantities_are_rejected() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 100, 10).await;
    let api = SettlementApi::new(db);
    let err = api.create_checkout("ivan", "tx-zero", &[cart_item("p1", 0, 100)]).await.unwrap_err();
    assert!(matches!(err, SettlementError::InvalidInput(_)), "Unexpected error: {err}");
}

#[tokio::test]
async fn insufficient_stock_is_reported_at_checkout() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 100, 1).await;
    let api = SettlementApi::new(db);
    let err = api.create_checkout("judy", "tx-greedy", &[cart_item("p1", 3, 100)]).await.unwrap_err();
    assert!(
        matches!(err, SettlementError::CatalogError(CatalogError::InsufficientStock {
            available: 1,
            requested: 3,
            ..
        })),
        "Unexpected error: {err}"
    );
}

#[tokio::test]
async fn transaction_uuids_cannot_be_reused() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 100, 10).await;
    let api = SettlementApi::new(db);
    api.create_checkout("kate", "tx-reused", &[cart_item("p1", 1, 100)]).await.unwrap();
    let err = api.create_checkout("kate", "tx-reused", &[cart_item("p1", 1, 100)]).await.unwrap_err();
    assert!(
        matches!(err, SettlementError::PaymentStoreError(PaymentStoreError::PaymentAlreadyExists(_))),
        "Unexpected error: {err}"
    );
}

#[tokio::test]
async fn multi_line_checkouts_total_all_lines() {
    let db = new_db().await;
    seed_product(&db, "p1", "seller-1", 500, 5).await;
    seed_product(&db, "p2", "seller-2", 120, 8).await;
    let api = SettlementApi::new(db.clone());

    let cart = vec![cart_item("p1", 2, 1), cart_item("p2", 3, 1)];
    let payment = api.create_checkout("leo", "tx-multi", &cart).await.unwrap();
    assert_eq!(payment.amount, Rupees::from(2 * 500 + 3 * 120));

    let order = api.settle("tx-multi").await.unwrap();
    assert_eq!(order.items.len(), 2);
    assert_eq!(stock_of(&db, "p1").await, 3);
    assert_eq!(stock_of(&db, "p2").await, 5);
}
