use std::sync::Arc;

use log::*;
use reqwest::{redirect, Client};

use crate::{
    config::EsewaConfig,
    data_objects::{PaymentRequest, StatusResponse},
    EsewaApiError,
};

/// A thin client over the two eSewa ePay endpoints: checkout initiation and status check.
#[derive(Clone)]
pub struct EsewaApi {
    config: EsewaConfig,
    client: Arc<Client>,
}

impl EsewaApi {
    pub fn new(config: EsewaConfig) -> Result<Self, EsewaApiError> {
        // Redirects are not followed; the Location header of the gateway response *is* the result
        // of a checkout initiation.
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| EsewaApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &EsewaConfig {
        &self.config
    }

    /// Submits the signed checkout form to the gateway and returns the URL the customer must be
    /// sent to in order to complete payment.
    ///
    /// If the gateway answers 2xx without a redirect, an equivalent URL is assembled from the same
    /// form fields so the frontend can submit the form itself.
    pub async fn initiate(&self, request: &PaymentRequest) -> Result<String, EsewaApiError> {
        let fields = request.form_fields();
        trace!("💳️ Submitting checkout form for transaction {}", request.transaction_uuid);
        let response = self
            .client
            .post(&self.config.payment_url)
            .form(&fields)
            .send()
            .await
            .map_err(|e| EsewaApiError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
                .ok_or_else(|| EsewaApiError::GatewayError {
                    status: status.as_u16(),
                    message: "Redirect response without a Location header".to_string(),
                })?;
            debug!("💳️ Gateway redirected transaction {} to its checkout page", request.transaction_uuid);
            return Ok(location);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("💳️ Gateway rejected transaction {}: {} {message}", request.transaction_uuid, status.as_u16());
            return Err(EsewaApiError::GatewayError { status: status.as_u16(), message });
        }
        debug!("💳️ Gateway accepted transaction {} without a redirect", request.transaction_uuid);
        self.form_submission_url(&fields)
    }

    /// Queries the transaction status endpoint. This call never mutates anything; the caller
    /// decides what to do with the reported status.
    pub async fn check_status(
        &self,
        transaction_uuid: &str,
        product_code: &str,
        total_amount: &str,
    ) -> Result<StatusResponse, EsewaApiError> {
        trace!("💳️ Checking status of transaction {transaction_uuid}");
        let response = self
            .client
            .get(&self.config.status_check_url)
            .query(&[
                ("product_code", product_code),
                ("total_amount", total_amount),
                ("transaction_uuid", transaction_uuid),
            ])
            .send()
            .await
            .map_err(|e| EsewaApiError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EsewaApiError::GatewayError { status: status.as_u16(), message });
        }
        let parsed =
            response.json::<StatusResponse>().await.map_err(|e| EsewaApiError::JsonError(e.to_string()))?;
        debug!("💳️ Transaction {transaction_uuid} reported as {}", parsed.status);
        Ok(parsed)
    }

    fn form_submission_url(&self, fields: &[(&'static str, &str)]) -> Result<String, EsewaApiError> {
        // The signature value is base64 and the callback fields are URLs, so every value must be
        // escaped. A raw `+` would decode as a space and break signature verification.
        let query = serde_urlencoded::to_string(fields).map_err(|e| EsewaApiError::FormEncoding(e.to_string()))?;
        Ok(format!("{}?{query}", self.config.payment_url))
    }
}
