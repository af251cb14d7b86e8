//! # Checkout Requests
//!
//! Shopper-facing checkout request and the payment-method defaulting table.
//! The table is an explicit, injectable value (loadable from
//! `config/methods.toml`) rather than a hardcoded literal, so tests can
//! substitute fixtures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel payment type meaning "no specific method was chosen"
pub const DEFAULT_PAYMENT_TYPE: &str = "default";

/// Sentinel payment type meaning "show all configured methods side by side"
pub const MULTIPLE_PAYMENT_TYPE: &str = "multiple";

fn default_payment_type() -> String {
    DEFAULT_PAYMENT_TYPE.to_string()
}

/// A shopper checkout request as received by the API.
///
/// Country and currency are optional; absent values are resolved through
/// the [`MethodDefaults`] table keyed by `payment_type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Payment method identifier, or a sentinel ("default", "multiple")
    #[serde(rename = "type", default = "default_payment_type")]
    pub payment_type: String,

    /// Explicit country override (wins over the table)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Explicit currency override (wins over the table)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl CheckoutRequest {
    /// Create a request for a specific payment type with no overrides
    pub fn for_type(payment_type: impl Into<String>) -> Self {
        Self {
            payment_type: payment_type.into(),
            country: None,
            currency: None,
        }
    }

    /// Builder: set a country override
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Builder: set a currency override
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// The ordered list of methods this request should render.
    /// "multiple" expands to every configured method; anything else is
    /// a single-method checkout.
    pub fn method_list(&self, defaults: &MethodDefaults) -> Vec<String> {
        if self.payment_type == MULTIPLE_PAYMENT_TYPE {
            defaults.multiple_methods().to_vec()
        } else {
            vec![self.payment_type.clone()]
        }
    }
}

impl Default for CheckoutRequest {
    fn default() -> Self {
        Self::for_type(DEFAULT_PAYMENT_TYPE)
    }
}

/// A country/currency pair from the defaulting table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCurrency {
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    /// ISO 4217 currency code
    pub currency: String,
}

impl CountryCurrency {
    pub fn new(country: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            currency: currency.into(),
        }
    }
}

/// Resolved country and currency for one checkout attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    pub country_code: String,
    pub currency: String,
}

/// Per-method country/currency defaulting table.
///
/// Lookup is keyed by payment type; unrecognized types fall back to an
/// explicit default pair. Caller-supplied overrides always win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDefaults {
    /// Pair used when the payment type is not in the table
    pub fallback: CountryCurrency,

    /// Per-method pairs
    #[serde(default)]
    pub methods: HashMap<String, CountryCurrency>,

    /// Ordered method list rendered for the "multiple" sentinel
    #[serde(default = "MethodDefaults::builtin_multiple")]
    pub multiple: Vec<String>,
}

impl MethodDefaults {
    /// The built-in table used when no config file is present
    pub fn builtin() -> Self {
        let mut methods = HashMap::new();
        methods.insert("card".to_string(), CountryCurrency::new("US", "USD"));
        methods.insert("paypal".to_string(), CountryCurrency::new("US", "USD"));
        methods.insert("twint".to_string(), CountryCurrency::new("CH", "CHF"));

        Self {
            fallback: CountryCurrency::new("NL", "EUR"),
            methods,
            multiple: Self::builtin_multiple(),
        }
    }

    fn builtin_multiple() -> Vec<String> {
        ["card", "paypal", "twint", "riverty"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Parse a table from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Look up the configured pair for a payment type
    pub fn pair_for(&self, payment_type: &str) -> &CountryCurrency {
        self.methods.get(payment_type).unwrap_or(&self.fallback)
    }

    /// Resolve the effective country and currency for a request.
    /// Overrides carried on the request always beat the table.
    pub fn resolve(&self, request: &CheckoutRequest) -> ResolvedLocale {
        let pair = self.pair_for(&request.payment_type);
        ResolvedLocale {
            country_code: request
                .country
                .clone()
                .unwrap_or_else(|| pair.country.clone()),
            currency: request
                .currency
                .clone()
                .unwrap_or_else(|| pair.currency.clone()),
        }
    }

    /// Methods shown for the "multiple" sentinel
    pub fn multiple_methods(&self) -> &[String] {
        &self.multiple
    }
}

impl Default for MethodDefaults {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_pair_wins_without_override() {
        let defaults = MethodDefaults::builtin();
        let resolved = defaults.resolve(&CheckoutRequest::for_type("twint"));

        assert_eq!(resolved.country_code, "CH");
        assert_eq!(resolved.currency, "CHF");
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let defaults = MethodDefaults::builtin();
        let resolved = defaults.resolve(&CheckoutRequest::for_type("unknown-method"));

        assert_eq!(resolved.country_code, "NL");
        assert_eq!(resolved.currency, "EUR");
    }

    #[test]
    fn test_override_beats_table() {
        let defaults = MethodDefaults::builtin();
        let request = CheckoutRequest::for_type("twint")
            .with_country("DE")
            .with_currency("EUR");
        let resolved = defaults.resolve(&request);

        assert_eq!(resolved.country_code, "DE");
        assert_eq!(resolved.currency, "EUR");
    }

    #[test]
    fn test_partial_override() {
        let defaults = MethodDefaults::builtin();
        let request = CheckoutRequest::for_type("card").with_currency("EUR");
        let resolved = defaults.resolve(&request);

        assert_eq!(resolved.country_code, "US");
        assert_eq!(resolved.currency, "EUR");
    }

    #[test]
    fn test_default_type_uses_fallback() {
        let defaults = MethodDefaults::builtin();
        let resolved = defaults.resolve(&CheckoutRequest::default());

        assert_eq!(resolved.country_code, "NL");
        assert_eq!(resolved.currency, "EUR");
    }

    #[test]
    fn test_method_list_expansion() {
        let defaults = MethodDefaults::builtin();

        let single = CheckoutRequest::for_type("card");
        assert_eq!(single.method_list(&defaults), vec!["card"]);

        let multiple = CheckoutRequest::for_type(MULTIPLE_PAYMENT_TYPE);
        assert_eq!(
            multiple.method_list(&defaults),
            vec!["card", "paypal", "twint", "riverty"]
        );
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            fallback = { country = "NL", currency = "EUR" }
            multiple = ["card", "ideal"]

            [methods]
            ideal = { country = "NL", currency = "EUR" }
            card = { country = "GB", currency = "GBP" }
        "#;

        let defaults = MethodDefaults::from_toml(toml_str).unwrap();
        let resolved = defaults.resolve(&CheckoutRequest::for_type("card"));

        assert_eq!(resolved.country_code, "GB");
        assert_eq!(resolved.currency, "GBP");
        assert_eq!(defaults.multiple_methods(), ["card", "ideal"]);
    }
}
