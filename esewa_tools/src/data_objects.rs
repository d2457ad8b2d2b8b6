use serde::{Deserialize, Serialize};

use crate::{config::EsewaConfig, error::EsewaApiError, signature::sign_payment_fields};

/// The declared signed-field list, in the order the gateway expects it.
pub const SIGNED_FIELD_NAMES: &str = "total_amount,transaction_uuid,product_code";

/// The form payload for the ePay checkout endpoint.
///
/// All amounts are carried as strings because that is what is signed; re-deriving them at submit
/// time would risk signing one value and sending another.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub amount: String,
    pub tax_amount: String,
    pub product_service_charge: String,
    pub product_delivery_charge: String,
    pub total_amount: String,
    pub transaction_uuid: String,
    pub product_code: String,
    pub success_url: String,
    pub failure_url: String,
    pub signed_field_names: String,
    pub signature: String,
}

impl PaymentRequest {
    /// Builds and signs a checkout payload for the given amount in whole rupees.
    ///
    /// Tax, service and delivery charges are zero for this storefront. The gateway rejects
    /// totals below one rupee, so the total is clamped to a minimum of 1.
    pub fn new(amount: i64, transaction_uuid: &str, config: &EsewaConfig) -> Result<Self, EsewaApiError> {
        let tax_amount = 0i64;
        let service_charge = 0i64;
        let delivery_charge = 0i64;
        let total_amount = (amount + tax_amount + service_charge + delivery_charge).max(1);
        let total_amount = total_amount.to_string();
        let signature = sign_payment_fields(
            &total_amount,
            transaction_uuid,
            &config.merchant_code,
            config.secret_key.reveal(),
        )?;
        Ok(Self {
            amount: amount.to_string(),
            tax_amount: tax_amount.to_string(),
            product_service_charge: service_charge.to_string(),
            product_delivery_charge: delivery_charge.to_string(),
            total_amount,
            transaction_uuid: transaction_uuid.to_string(),
            product_code: config.merchant_code.clone(),
            success_url: config.success_url.clone(),
            failure_url: config.failure_url.clone(),
            signed_field_names: SIGNED_FIELD_NAMES.to_string(),
            signature,
        })
    }

    /// The form fields in the exact order specified by the ePay protocol.
    pub fn form_fields(&self) -> [(&'static str, &str); 11] {
        [
            ("amount", &self.amount),
            ("tax_amount", &self.tax_amount),
            ("product_service_charge", &self.product_service_charge),
            ("product_delivery_charge", &self.product_delivery_charge),
            ("total_amount", &self.total_amount),
            ("transaction_uuid", &self.transaction_uuid),
            ("product_code", &self.product_code),
            ("success_url", &self.success_url),
            ("failure_url", &self.failure_url),
            ("signed_field_names", &self.signed_field_names),
            ("signature", &self.signature),
        ]
    }
}

/// The JSON body returned by the transaction status-check endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub product_code: String,
    pub transaction_uuid: String,
    pub total_amount: f64,
    pub status: String,
    pub ref_id: Option<String>,
}

impl StatusResponse {
    /// eSewa reports a finalized, successful payment as `COMPLETE`.
    pub fn is_complete(&self) -> bool {
        self.status.eq_ignore_ascii_case("COMPLETE")
    }
}
