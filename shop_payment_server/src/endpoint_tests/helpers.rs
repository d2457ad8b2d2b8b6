use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::Utc;
use log::debug;
use shop_payment_engine::db_types::{LineItem, Order, OrderId, OrderStatusType, PaymentRecord, PaymentStatus};
use sps_common::Rupees;

pub async fn get_request(path: &str, configure: fn(&mut ServiceConfig)) -> Result<(StatusCode, String), String> {
    let req = TestRequest::get().uri(path).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub async fn post_request(
    path: &str,
    body: serde_json::Value,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

pub fn sample_line_items() -> Vec<LineItem> {
    vec![LineItem {
        product_id: "p-100".to_string(),
        seller_id: "seller-7".to_string(),
        quantity: 2,
        price: Rupees::from(500),
    }]
}

pub fn pending_payment(transaction_uuid: &str) -> PaymentRecord {
    PaymentRecord {
        id: "pay-1".to_string(),
        amount: Rupees::from(1000),
        user_id: "alice".to_string(),
        transaction_uuid: transaction_uuid.to_string(),
        items: sample_line_items(),
        status: PaymentStatus::Pending,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn order_in_status(transaction_uuid: &str, status: OrderStatusType) -> Order {
    Order {
        id: OrderId("order-1".to_string()),
        user_id: "alice".to_string(),
        amount: Rupees::from(1000),
        items: sample_line_items(),
        transaction_id: transaction_uuid.to_string(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
