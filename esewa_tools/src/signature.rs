//! The eSewa request signature.
//!
//! eSewa signs the checkout form over a canonical string in which both the field order and the
//! exact key names are fixed by the protocol:
//!
//! ```text
//! total_amount=<v>,transaction_uuid=<v>,product_code=<v>
//! ```
//!
//! The signature is HMAC-SHA256 over the UTF-8 bytes of that string, keyed with the merchant's
//! secret key, and base64 (standard alphabet) encoded.
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::EsewaApiError;

type HmacSha256 = Hmac<Sha256>;

/// Computes the eSewa payment signature for the three signed fields.
///
/// An empty secret key is a configuration error, never a valid signature.
pub fn sign_payment_fields(
    total_amount: &str,
    transaction_uuid: &str,
    product_code: &str,
    secret_key: &str,
) -> Result<String, EsewaApiError> {
    if secret_key.is_empty() {
        return Err(EsewaApiError::Configuration("The eSewa secret key is empty".to_string()));
    }
    let message =
        format!("total_amount={total_amount},transaction_uuid={transaction_uuid},product_code={product_code}");
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| EsewaApiError::Configuration(format!("Invalid eSewa secret key. {e}")))?;
    mac.update(message.as_bytes());
    Ok(base64::encode(mac.finalize().into_bytes()))
}

/// Verifies a signature received from the gateway against the signed fields.
pub fn verify_payment_signature(
    total_amount: &str,
    transaction_uuid: &str,
    product_code: &str,
    secret_key: &str,
    signature: &str,
) -> Result<bool, EsewaApiError> {
    let expected = sign_payment_fields(total_amount, transaction_uuid, product_code, secret_key)?;
    Ok(expected == signature)
}

#[cfg(test)]
mod test {
    use super::{sign_payment_fields, verify_payment_signature};

    const KEY: &str = "8gBm/:&EnhH.1/q";

    #[test]
    fn signing_is_deterministic() {
        let a = sign_payment_fields("1000", "240101-120000-AB1CD", "EPAYTEST", KEY).unwrap();
        let b = sign_payment_fields("1000", "240101-120000-AB1CD", "EPAYTEST", KEY).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn signature_depends_on_every_input() {
        let base = sign_payment_fields("1000", "240101-120000-AB1CD", "EPAYTEST", KEY).unwrap();
        let amount = sign_payment_fields("1001", "240101-120000-AB1CD", "EPAYTEST", KEY).unwrap();
        let txid = sign_payment_fields("1000", "240101-120000-AB1CE", "EPAYTEST", KEY).unwrap();
        let code = sign_payment_fields("1000", "240101-120000-AB1CD", "EPAYPROD", KEY).unwrap();
        let key = sign_payment_fields("1000", "240101-120000-AB1CD", "EPAYTEST", "another-key").unwrap();
        assert_ne!(base, amount);
        assert_ne!(base, txid);
        assert_ne!(base, code);
        assert_ne!(base, key);
    }

    #[test]
    fn matches_esewa_test_vector() {
        // The worked example from eSewa's ePay v2 integration documentation.
        let signature = sign_payment_fields("100", "11-201-13", "EPAYTEST", KEY).unwrap();
        assert_eq!(signature, "5DZywcrTKD0gia/rsSMcrRHmJl+4Tbol6S+lWgdJ94E=");
    }

    #[test]
    fn verify_round_trips_and_rejects_tampering() {
        let signature = sign_payment_fields("1000", "240101-120000-AB1CD", "EPAYTEST", KEY).unwrap();
        assert!(verify_payment_signature("1000", "240101-120000-AB1CD", "EPAYTEST", KEY, &signature).unwrap());
        assert!(!verify_payment_signature("9999", "240101-120000-AB1CD", "EPAYTEST", KEY, &signature).unwrap());
    }

    #[test]
    fn empty_key_is_a_configuration_error() {
        assert!(sign_payment_fields("1000", "240101-120000-AB1CD", "EPAYTEST", "").is_err());
    }
}
