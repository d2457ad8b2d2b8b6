//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! database operations, etc.) should be expressed as futures or asynchronous functions. Async handlers get executed
//! concurrently by worker threads and thus don't block execution.
use actix_web::{get, web, HttpResponse, Responder};
use esewa_tools::{new_transaction_uuid, EsewaApi, PaymentRequest};
use log::*;
use shop_payment_engine::{
    db_types::OrderId,
    traits::{CartStore, OrderStore, PaymentStore, ProductCatalog},
    SettlementApi,
};

use crate::{
    data_objects::{CancelOrderRequest, CheckoutRequest, SettleRequest, StatusQuery},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//------------------------------------------   InitiatePayment  ------------------------------------------------
route!(initiate_payment => Post "/payment-service/initiate-payment" impl PaymentStore, OrderStore, ProductCatalog, CartStore);
/// Route handler for starting a checkout.
///
/// The cart is re-priced from the catalog, a pending payment record is written under a fresh
/// transaction uuid, and the signed checkout form is submitted to the gateway. The response
/// carries the URL the shopper must be redirected to. If the gateway turns the checkout down,
/// the payment record is marked as failed before the error is returned.
pub async fn initiate_payment<B>(
    body: web::Json<CheckoutRequest>,
    api: web::Data<SettlementApi<B>>,
    gateway: web::Data<EsewaApi>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentStore + OrderStore + ProductCatalog + CartStore,
{
    let CheckoutRequest { user_id, cart_items } = body.into_inner();
    debug!("💻️ Received checkout request from user {user_id} with {} item(s)", cart_items.len());
    let transaction_uuid = new_transaction_uuid();
    let payment = api.create_checkout(&user_id, &transaction_uuid, &cart_items).await?;
    let request = PaymentRequest::new(payment.amount.value(), &transaction_uuid, gateway.config())?;
    let url = match gateway.initiate(&request).await {
        Ok(url) => url,
        Err(e) => {
            warn!("💻️ Gateway turned down checkout [{transaction_uuid}]: {e}");
            if let Err(e2) = api.mark_payment_failed(&transaction_uuid).await {
                warn!("💻️ Could not mark payment [{transaction_uuid}] as failed: {e2}");
            }
            return Err(e.into());
        },
    };
    info!("💻️ Checkout [{transaction_uuid}] initiated for user {user_id}");
    let response = serde_json::json!({
        "success": true,
        "transactionUuid": transaction_uuid,
        "amount": payment.amount,
        "url": url,
    });
    Ok(HttpResponse::Ok().json(response))
}

//--------------------------------------------   CheckStatus  --------------------------------------------------
/// Relays a transaction status query to the gateway. The response is the gateway's own status
/// report; nothing is mutated on this server.
#[get("/payment-service/check-status")]
pub async fn check_status(
    query: web::Query<StatusQuery>,
    gateway: web::Data<EsewaApi>,
) -> Result<HttpResponse, ServerError> {
    let StatusQuery { transaction_uuid, product_code, total_amount } = query.into_inner();
    trace!("💻️ Received status check for transaction {transaction_uuid}");
    let product_code = product_code.unwrap_or_else(|| gateway.config().merchant_code.clone());
    let status = gateway.check_status(&transaction_uuid, &product_code, &total_amount.to_string()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": status })))
}

//---------------------------------------   ProcessSuccessfulPayment  ------------------------------------------
route!(process_successful_payment => Post "/payment-service/process-successful-payment" impl PaymentStore, OrderStore, ProductCatalog, CartStore);
/// Settles a payment the gateway has confirmed: the payment record moves to `success` and the
/// order is created, stock is adjusted and the shopper's cart is cleared.
///
/// Safe to call more than once for the same transaction; repeat calls receive the same order.
pub async fn process_successful_payment<B>(
    body: web::Json<SettleRequest>,
    api: web::Data<SettlementApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentStore + OrderStore + ProductCatalog + CartStore,
{
    let transaction_uuid = body.into_inner().transaction_uuid;
    debug!("💻️ Received settlement request for transaction {transaction_uuid}");
    let order = api.settle(&transaction_uuid).await?;
    info!("💻️ Transaction {transaction_uuid} settled into order {}", order.id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "order": order })))
}

//--------------------------------------------   CancelOrder  --------------------------------------------------
route!(cancel_order => Post "/payment-service/orders/{order_id}/cancel" impl PaymentStore, OrderStore, ProductCatalog, CartStore);
/// Cancels one of the caller's orders, as long as it is still in `created` status. Stock for the
/// order's lines is returned to the catalog.
pub async fn cancel_order<B>(
    path: web::Path<String>,
    body: web::Json<CancelOrderRequest>,
    api: web::Data<SettlementApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentStore + OrderStore + ProductCatalog + CartStore,
{
    let order_id = OrderId(path.into_inner());
    let user_id = body.into_inner().user_id;
    debug!("💻️ Received cancellation request for order {order_id} from user {user_id}");
    let order = api.cancel_order(&user_id, &order_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "order": order })))
}
