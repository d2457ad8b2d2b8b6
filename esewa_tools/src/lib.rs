//! Client tooling for the eSewa payment gateway.
//!
//! eSewa's ePay protocol is a two-request affair: checkout is initiated with a signed, form-encoded
//! POST against the payment endpoint, and the outcome is confirmed out-of-band via a GET against the
//! transaction status endpoint. This crate packages that protocol (the canonical-string HMAC
//! signature, the gateway-compliant transaction id format, and the two HTTP calls) behind
//! [`EsewaApi`], independently of any storage or order-flow concerns.
mod api;
mod config;
mod error;
mod signature;
mod txid;

mod data_objects;

pub use api::EsewaApi;
pub use config::EsewaConfig;
pub use data_objects::{PaymentRequest, StatusResponse, SIGNED_FIELD_NAMES};
pub use error::EsewaApiError;
pub use signature::{sign_payment_fields, verify_payment_signature};
pub use txid::new_transaction_uuid;
