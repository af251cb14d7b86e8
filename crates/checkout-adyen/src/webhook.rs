//! # Adyen Webhook Notifications
//!
//! Notification envelope parsing and HMAC-SHA256 signature validation.
//! Adyen signs each notification item over a colon-joined signing string
//! with a hex-encoded key and carries the base64 signature in
//! `additionalData.hmacSignature`.

use checkout_core::{Amount, CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Webhook request envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    #[serde(default)]
    pub live: String,
    pub notification_items: Vec<NotificationItemWrapper>,
}

impl NotificationRequest {
    /// The first notification item of the envelope.
    /// Adyen batches items, but each webhook delivery carries at least one.
    pub fn first_item(&self) -> CheckoutResult<&NotificationRequestItem> {
        self.notification_items
            .first()
            .map(|w| &w.notification_request_item)
            .ok_or_else(|| {
                CheckoutError::NotificationParse("empty notificationItems".to_string())
            })
    }
}

/// Wrapper matching Adyen's odd envelope nesting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationItemWrapper {
    #[serde(rename = "NotificationRequestItem")]
    pub notification_request_item: NotificationRequestItem,
}

/// A single webhook notification item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequestItem {
    pub amount: Amount,

    /// Event type, e.g. "AUTHORISATION"
    pub event_code: String,

    /// "true"/"false" string on the wire
    pub success: String,

    pub psp_reference: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_reference: Option<String>,

    pub merchant_account_code: String,
    pub merchant_reference: String,

    #[serde(default)]
    pub additional_data: HashMap<String, String>,
}

impl NotificationRequestItem {
    /// The base64 HMAC signature carried by the item
    pub fn hmac_signature(&self) -> Option<&str> {
        self.additional_data.get("hmacSignature").map(|s| s.as_str())
    }

    /// The colon-joined string the signature is computed over.
    /// Backslashes and colons inside values are escaped.
    pub fn signing_string(&self) -> String {
        [
            self.psp_reference.as_str(),
            self.original_reference.as_deref().unwrap_or(""),
            self.merchant_account_code.as_str(),
            self.merchant_reference.as_str(),
            &self.amount.value.to_string(),
            self.amount.currency.as_str(),
            self.event_code.as_str(),
            self.success.as_str(),
        ]
        .iter()
        .map(|part| escape_signing_part(part))
        .collect::<Vec<_>>()
        .join(":")
    }

    pub fn is_success(&self) -> bool {
        self.success == "true"
    }
}

fn escape_signing_part(part: &str) -> String {
    part.replace('\\', "\\\\").replace(':', "\\:")
}

/// Compute the expected base64 signature for an item with the given
/// hex-encoded HMAC key.
pub fn compute_signature(item: &NotificationRequestItem, hmac_key: &str) -> CheckoutResult<String> {
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    type HmacSha256 = Hmac<Sha256>;

    let key = hex::decode(hmac_key)
        .map_err(|_| CheckoutError::Configuration("HMAC key is not hex-encoded".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| CheckoutError::Internal(format!("HMAC init failed: {}", e)))?;
    mac.update(item.signing_string().as_bytes());

    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Validate a notification item's HMAC signature.
///
/// Returns `SignatureValidation` on a missing or mismatched signature;
/// the caller answers 401 and moves on without crashing.
pub fn validate_hmac(item: &NotificationRequestItem, hmac_key: &str) -> CheckoutResult<()> {
    let carried = item.hmac_signature().ok_or_else(|| {
        CheckoutError::SignatureValidation("missing hmacSignature".to_string())
    })?;

    let expected = compute_signature(item, hmac_key)?;

    if constant_time_compare(carried, &expected) {
        Ok(())
    } else {
        Err(CheckoutError::SignatureValidation(
            "signature mismatch".to_string(),
        ))
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Notification event handler trait.
///
/// Consumption is intentionally a stub: downstream processing (database,
/// queue, fulfilment) is outside this system. Defaults log and return.
#[allow(unused_variables)]
pub trait NotificationHandler: Send + Sync {
    /// Called for AUTHORISATION events
    fn on_authorisation(&self, item: &NotificationRequestItem) -> CheckoutResult<()> {
        info!(
            "Authorisation: merchantReference={} success={}",
            item.merchant_reference, item.success
        );
        Ok(())
    }

    /// Called for CANCELLATION events
    fn on_cancellation(&self, item: &NotificationRequestItem) -> CheckoutResult<()> {
        info!("Cancellation: merchantReference={}", item.merchant_reference);
        Ok(())
    }

    /// Called for REFUND events
    fn on_refund(&self, item: &NotificationRequestItem) -> CheckoutResult<()> {
        info!("Refund: merchantReference={}", item.merchant_reference);
        Ok(())
    }

    /// Called for unknown/unhandled event codes
    fn on_unknown_event(&self, item: &NotificationRequestItem) -> CheckoutResult<()> {
        debug!("Unhandled notification event: {}", item.event_code);
        Ok(())
    }
}

/// Default no-op handler (just logs events)
pub struct LoggingNotificationHandler;

impl NotificationHandler for LoggingNotificationHandler {}

/// Dispatch a validated notification item to the appropriate handler method
pub fn dispatch_notification(
    handler: &dyn NotificationHandler,
    item: &NotificationRequestItem,
) -> CheckoutResult<()> {
    if !item.is_success() {
        warn!(
            "Notification reports failure: eventCode={} merchantReference={}",
            item.event_code, item.merchant_reference
        );
    }

    match item.event_code.as_str() {
        "AUTHORISATION" => handler.on_authorisation(item),
        "CANCELLATION" => handler.on_cancellation(item),
        "REFUND" => handler.on_refund(item),
        _ => handler.on_unknown_event(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEST_HMAC_KEY: &str = "44782DEF547AAA06C910C43932B1EB0C71FC68D9D0C057550C48EC2ACF6BA056";

    fn test_item() -> NotificationRequestItem {
        NotificationRequestItem {
            amount: Amount::new("EUR", 10_000),
            event_code: "AUTHORISATION".to_string(),
            success: "true".to_string(),
            psp_reference: "7914073381342284".to_string(),
            original_reference: None,
            merchant_account_code: "TestMerchant".to_string(),
            merchant_reference: "TestPayment-1407325143704".to_string(),
            additional_data: HashMap::new(),
        }
    }

    #[test]
    fn test_signing_string_layout() {
        let item = test_item();
        assert_eq!(
            item.signing_string(),
            "7914073381342284::TestMerchant:TestPayment-1407325143704:10000:EUR:AUTHORISATION:true"
        );
    }

    #[test]
    fn test_signing_string_escapes_separators() {
        let mut item = test_item();
        item.merchant_reference = "ref:with\\both".to_string();

        assert!(item.signing_string().contains("ref\\:with\\\\both"));
    }

    #[test]
    fn test_valid_signature_roundtrip() {
        let mut item = test_item();
        let signature = compute_signature(&item, TEST_HMAC_KEY).unwrap();
        item.additional_data
            .insert("hmacSignature".to_string(), signature);

        assert!(validate_hmac(&item, TEST_HMAC_KEY).is_ok());
    }

    #[test]
    fn test_tampered_field_fails_validation() {
        let mut item = test_item();
        let signature = compute_signature(&item, TEST_HMAC_KEY).unwrap();
        item.additional_data
            .insert("hmacSignature".to_string(), signature);

        item.amount.value = 1; // tamper after signing

        let err = validate_hmac(&item, TEST_HMAC_KEY).unwrap_err();
        assert!(matches!(err, CheckoutError::SignatureValidation(_)));
    }

    #[test]
    fn test_wrong_key_fails_validation() {
        let mut item = test_item();
        let signature = compute_signature(&item, TEST_HMAC_KEY).unwrap();
        item.additional_data
            .insert("hmacSignature".to_string(), signature);

        let other_key = "00782DEF547AAA06C910C43932B1EB0C71FC68D9D0C057550C48EC2ACF6BA056";
        assert!(validate_hmac(&item, other_key).is_err());
    }

    #[test]
    fn test_missing_signature_is_rejected() {
        let item = test_item();
        let err = validate_hmac(&item, TEST_HMAC_KEY).unwrap_err();
        assert!(matches!(err, CheckoutError::SignatureValidation(_)));
    }

    #[test]
    fn test_envelope_parse() {
        let request: NotificationRequest = serde_json::from_value(json!({
            "live": "false",
            "notificationItems": [{
                "NotificationRequestItem": {
                    "amount": { "currency": "EUR", "value": 10000 },
                    "eventCode": "AUTHORISATION",
                    "success": "true",
                    "pspReference": "7914073381342284",
                    "merchantAccountCode": "TestMerchant",
                    "merchantReference": "ord-1",
                    "additionalData": { "hmacSignature": "sig" }
                }
            }]
        }))
        .unwrap();

        let item = request.first_item().unwrap();
        assert_eq!(item.event_code, "AUTHORISATION");
        assert_eq!(item.hmac_signature(), Some("sig"));
    }

    #[test]
    fn test_dispatch_notification() {
        struct TestHandler {
            called: std::sync::atomic::AtomicBool,
        }

        impl NotificationHandler for TestHandler {
            fn on_authorisation(&self, _item: &NotificationRequestItem) -> CheckoutResult<()> {
                self.called.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        }

        let handler = TestHandler {
            called: std::sync::atomic::AtomicBool::new(false),
        };

        dispatch_notification(&handler, &test_item()).unwrap();
        assert!(handler.called.load(std::sync::atomic::Ordering::SeqCst));
    }
}
