//! # Payment Sessions
//!
//! Outbound session request and the opaque session descriptor issued by
//! the payment service. A session is created exactly once per fresh
//! checkout attempt and is immutable once issued; expiry is enforced by
//! the remote service, not locally.

use crate::request::ResolvedLocale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display amount in minor units, as the payment service expects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// ISO 4217 currency code
    pub currency: String,
    /// Amount in the currency's smallest unit
    pub value: i64,
}

impl Amount {
    pub fn new(currency: impl Into<String>, value: i64) -> Self {
        Self {
            currency: currency.into(),
            value,
        }
    }
}

/// A line item shown on the hosted payment page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub quantity: u32,
    pub amount_including_tax: i64,
    pub description: String,
}

impl LineItem {
    pub fn new(description: impl Into<String>, amount_including_tax: i64) -> Self {
        Self {
            quantity: 1,
            amount_including_tax,
            description: description.into(),
        }
    }
}

/// Total display amount for the demo cart, in minor units
pub const CART_TOTAL_MINOR_UNITS: i64 = 10_000;

/// The session request sent to the payment service.
///
/// Field names follow the provider's wire format (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub amount: Amount,
    pub country_code: String,
    pub merchant_account: String,

    /// Merchant reference, freshly generated per call and never reused
    pub reference: String,

    /// Where the shopper lands after an external redirect
    pub return_url: String,

    pub store_payment_method_mode: String,
    pub recurring_processing_model: String,
    pub shopper_reference: String,

    pub line_items: Vec<LineItem>,
}

impl SessionRequest {
    /// Build a session request for the fixed demo cart.
    ///
    /// Generates a fresh UUID merchant reference; callers must not reuse
    /// a request value across attempts.
    pub fn build(locale: &ResolvedLocale, merchant_account: &str, base_url: &str) -> Self {
        let reference = Uuid::new_v4().to_string();
        let return_url = format!("{}/checkout?orderRef={}", base_url, reference);

        Self {
            amount: Amount::new(locale.currency.clone(), CART_TOTAL_MINOR_UNITS),
            country_code: locale.country_code.clone(),
            merchant_account: merchant_account.to_string(),
            reference,
            return_url,
            store_payment_method_mode: "askForConsent".to_string(),
            recurring_processing_model: "CardOnFile".to_string(),
            shopper_reference: "1234".to_string(),
            line_items: vec![
                LineItem::new("Sunglasses", 5_000),
                LineItem::new("Headphones", 5_000),
            ],
        }
    }
}

/// Opaque session descriptor issued by the payment service.
///
/// Only the `id` is meaningful to this system; everything else is
/// provider data passed through to the drop-in untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSession {
    /// Provider session identifier
    pub id: String,

    /// Provider-issued session payload consumed by the drop-in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_data: Option<String>,

    /// Session expiry, enforced remotely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Remaining provider fields (amount, reference, returnUrl, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentSession {
    /// Reconstruct a session from a recovered identifier alone.
    ///
    /// Used on the redirect-resume path: the identifier is sufficient for
    /// the remote service to resolve the session, so nothing is re-fetched.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            session_data: None,
            expires_at: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{CheckoutRequest, MethodDefaults};

    fn resolved(payment_type: &str) -> ResolvedLocale {
        MethodDefaults::builtin().resolve(&CheckoutRequest::for_type(payment_type))
    }

    #[test]
    fn test_session_request_shape() {
        let request = SessionRequest::build(&resolved("twint"), "TestMerchant", "http://localhost:8080");

        assert_eq!(request.amount.currency, "CHF");
        assert_eq!(request.amount.value, CART_TOTAL_MINOR_UNITS);
        assert_eq!(request.country_code, "CH");
        assert_eq!(request.merchant_account, "TestMerchant");
        assert_eq!(request.line_items.len(), 2);
        assert_eq!(
            request.line_items.iter().map(|i| i.amount_including_tax).sum::<i64>(),
            CART_TOTAL_MINOR_UNITS
        );
        assert!(request
            .return_url
            .starts_with("http://localhost:8080/checkout?orderRef="));
        assert!(request.return_url.ends_with(&request.reference));
    }

    #[test]
    fn test_merchant_reference_is_unique_per_build() {
        let locale = resolved("card");
        let a = SessionRequest::build(&locale, "TestMerchant", "http://localhost:8080");
        let b = SessionRequest::build(&locale, "TestMerchant", "http://localhost:8080");

        assert_ne!(a.reference, b.reference);
    }

    #[test]
    fn test_session_roundtrip_preserves_opaque_fields() {
        let json = serde_json::json!({
            "id": "CS12345",
            "sessionData": "Ab02b4c0...",
            "reference": "ord-1",
            "merchantAccount": "TestMerchant",
            "amount": { "currency": "EUR", "value": 10000 }
        });

        let session: PaymentSession = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(session.id, "CS12345");
        assert_eq!(session.session_data.as_deref(), Some("Ab02b4c0..."));
        assert_eq!(
            session.extra.get("reference").and_then(|v| v.as_str()),
            Some("ord-1")
        );

        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back.get("merchantAccount"), json.get("merchantAccount"));
    }

    #[test]
    fn test_session_from_id_is_bare() {
        let session = PaymentSession::from_id("CS987");
        assert_eq!(session.id, "CS987");
        assert!(session.session_data.is_none());
        assert!(session.extra.is_empty());
    }
}
