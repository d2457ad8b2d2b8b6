use std::{env, time::Duration};

use log::*;
use sps_common::Secret;

use crate::error::EsewaApiError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SUCCESS_URL_SUFFIX: &str = "/products/checkout/payment/success";
const FAILURE_URL_SUFFIX: &str = "/products/checkout/payment/failure";

/// Configuration for the eSewa gateway. The checkout flow cannot function without a merchant code
/// and signing key, so [`EsewaConfig::try_from_env`] treats missing values as hard errors rather
/// than falling back to defaults.
#[derive(Debug, Clone, Default)]
pub struct EsewaConfig {
    /// The merchant / product code assigned by eSewa, e.g. "EPAYTEST".
    pub merchant_code: String,
    /// The HMAC signing key shared with eSewa.
    pub secret_key: Secret<String>,
    /// The ePay checkout form endpoint.
    pub payment_url: String,
    /// The transaction status-check endpoint.
    pub status_check_url: String,
    /// Where eSewa sends the customer after a successful payment.
    pub success_url: String,
    /// Where eSewa sends the customer after a failed or abandoned payment.
    pub failure_url: String,
    /// Upper bound on each gateway round-trip.
    pub timeout: Duration,
}

impl EsewaConfig {
    pub fn try_from_env() -> Result<Self, EsewaApiError> {
        let merchant_code = require_var("ESEWA_MERCHANT_CODE")?;
        let secret_key = Secret::new(require_var("ESEWA_SECRET_KEY")?);
        let payment_url = require_var("ESEWA_PAYMENT_URL")?;
        let status_check_url = require_var("ESEWA_PAYMENT_STATUS_CHECK_URL")?;
        let frontend_url = require_var("FRONTEND_URL")?;
        let frontend_url = frontend_url.trim_end_matches('/');
        let success_url = format!("{frontend_url}{SUCCESS_URL_SUFFIX}");
        let failure_url = format!("{frontend_url}{FAILURE_URL_SUFFIX}");
        let timeout = env::var("ESEWA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| warn!("🪛️ Invalid value for ESEWA_TIMEOUT_SECS ({s}). {e}"))
                    .ok()
            })
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let timeout = Duration::from_secs(timeout);
        info!("🪛️ eSewa gateway configured for merchant {merchant_code} at {payment_url}");
        Ok(Self { merchant_code, secret_key, payment_url, status_check_url, success_url, failure_url, timeout })
    }
}

fn require_var(name: &str) -> Result<String, EsewaApiError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            error!("🪛️ {name} is not set. The eSewa checkout flow cannot run without it.");
            Err(EsewaApiError::Configuration(format!("{name} is not set")))
        },
    }
}
