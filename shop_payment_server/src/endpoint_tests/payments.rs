use actix_web::{http::StatusCode, web, web::ServiceConfig};
use esewa_tools::{EsewaApi, EsewaConfig};
use mockall::Sequence;
use serde_json::json;
use shop_payment_engine::{
    db_types::{OrderStatusType, Product},
    SettlementApi,
};
use sps_common::Rupees;

use super::helpers::{get_request, order_in_status, pending_payment, post_request};
use crate::{
    endpoint_tests::mocks::MockBackend,
    routes::{health, CancelOrderRoute, InitiatePaymentRoute, ProcessSuccessfulPaymentRoute},
};

fn add_gateway(cfg: &mut ServiceConfig) {
    let gateway = EsewaApi::new(EsewaConfig::default()).expect("Could not build gateway client");
    cfg.app_data(web::Data::new(gateway));
}

#[actix_web::test]
async fn health_check() {
    let _ = env_logger::try_init().ok();
    let (status, body) = get_request("/health", |cfg| {
        cfg.service(health);
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn initiate_payment_rejects_an_empty_cart() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "userId": "alice", "cartItems": [] });
    let (status, body) = post_request("/payment-service/initiate-payment", body, |cfg| {
        let backend = MockBackend::new();
        add_gateway(cfg);
        cfg.service(InitiatePaymentRoute::<MockBackend>::new())
            .app_data(web::Data::new(SettlementApi::new(backend)));
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Could not read request body: The cart is empty"}"#);
}

#[actix_web::test]
async fn initiate_payment_reports_insufficient_stock() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "userId": "alice",
        "cartItems": [{ "id": "p-100", "sellerId": "seller-7", "quantity": 3, "price": 500, "name": "Widget" }]
    });
    let (status, body) = post_request("/payment-service/initiate-payment", body, |cfg| {
        let mut backend = MockBackend::new();
        backend.expect_fetch_products().returning(|_| {
            Ok(vec![Product {
                id: "p-100".to_string(),
                seller_id: "seller-7".to_string(),
                name: "Widget".to_string(),
                price: Rupees::from(500),
                stock: 1,
            }])
        });
        add_gateway(cfg);
        cfg.service(InitiatePaymentRoute::<MockBackend>::new())
            .app_data(web::Data::new(SettlementApi::new(backend)));
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        "{\"error\":\"The request conflicts with the current state. Insufficient stock for product p-100. \
         Available: 1, requested: 3\"}"
    );
}

#[actix_web::test]
async fn settling_an_unknown_transaction_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "transactionUuid": "tx-missing" });
    let (status, body) = post_request("/payment-service/process-successful-payment", body, |cfg| {
        let mut backend = MockBackend::new();
        backend.expect_fetch_payment_by_transaction_uuid().returning(|_| Ok(None));
        cfg.service(ProcessSuccessfulPaymentRoute::<MockBackend>::new())
            .app_data(web::Data::new(SettlementApi::new(backend)));
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. No payment exists for transaction tx-missing"}"#);
}

#[actix_web::test]
async fn settling_a_pending_payment_creates_an_order() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "transactionUuid": "tx-1" });
    let (status, body) = post_request("/payment-service/process-successful-payment", body, |cfg| {
        let mut backend = MockBackend::new();
        backend.expect_fetch_payment_by_transaction_uuid().returning(|txid| Ok(Some(pending_payment(txid))));
        backend.expect_settle_payment().returning(|_| Ok(true));
        backend.expect_insert_order().returning(|order| {
            let mut result = order_in_status(&order.transaction_id, OrderStatusType::Created);
            result.items = order.items;
            Ok(result)
        });
        backend.expect_decrement_stock().returning(|_, _| Ok(()));
        backend.expect_clear_cart().returning(|_| Ok(()));
        cfg.service(ProcessSuccessfulPaymentRoute::<MockBackend>::new())
            .app_data(web::Data::new(SettlementApi::new(backend)));
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":true"#), "Unexpected body: {body}");
    assert!(body.contains(r#""transactionId":"tx-1""#), "Unexpected body: {body}");
    assert!(body.contains(r#""status":"created""#), "Unexpected body: {body}");
}

#[actix_web::test]
async fn orders_past_created_cannot_be_cancelled() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "userId": "alice" });
    let (status, body) = post_request("/payment-service/orders/order-1/cancel", body, |cfg| {
        let mut backend = MockBackend::new();
        backend
            .expect_fetch_order_for_user()
            .returning(|_, _| Ok(Some(order_in_status("tx-1", OrderStatusType::Shipping))));
        cfg.service(CancelOrderRoute::<MockBackend>::new()).app_data(web::Data::new(SettlementApi::new(backend)));
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body,
        "{\"error\":\"The request conflicts with the current state. Order #order-1 is shipping and can no \
         longer be cancelled\"}"
    );
}

#[actix_web::test]
async fn cancelling_a_created_order_succeeds() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "userId": "alice" });
    let (status, body) = post_request("/payment-service/orders/order-1/cancel", body, |cfg| {
        let mut backend = MockBackend::new();
        let mut seq = Sequence::new();
        backend
            .expect_fetch_order_for_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some(order_in_status("tx-1", OrderStatusType::Created))));
        backend.expect_transition_order_status().returning(|_, _, _| Ok(true));
        backend.expect_restore_stock().returning(|_, _| Ok(()));
        backend
            .expect_fetch_order_for_user()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some(order_in_status("tx-1", OrderStatusType::Cancelled))));
        cfg.service(CancelOrderRoute::<MockBackend>::new()).app_data(web::Data::new(SettlementApi::new(backend)));
    })
    .await
    .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""success":true"#), "Unexpected body: {body}");
    assert!(body.contains(r#""status":"cancelled""#), "Unexpected body: {body}");
}
