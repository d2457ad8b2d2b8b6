//! # Shop payment server
//! This module hosts the HTTP frontend for the checkout and settlement flow. It is responsible
//! for:
//! Accepting checkout requests from the storefront and redirecting shoppers to the eSewa gateway.
//! Relaying transaction status queries to the gateway.
//! Turning confirmed payments into orders, exactly once per transaction.
//! Letting shoppers cancel orders that have not shipped yet.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/payment-service/initiate-payment`: Starts a checkout for a cart.
//! * `/payment-service/check-status`: Relays a transaction status query to the gateway.
//! * `/payment-service/process-successful-payment`: Settles a confirmed payment into an order.
//! * `/payment-service/orders/{order_id}/cancel`: Cancels an order that is still in `created`.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
