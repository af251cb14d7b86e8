//! # Client Configuration
//!
//! Explicit configuration value for binding a checkout context.
//! Locale, currency, and per-method options are plain data so contexts
//! are constructable and testable in isolation.

use crate::session::{Amount, PaymentSession};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Drop-in environment selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Test,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Live => "live",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Test
    }
}

/// How a form field group is presented to the shopper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldVisibility {
    /// Not shown on the payment form
    Hidden,
    /// Shown but not editable
    ReadOnly,
    /// Shown and editable (provider default)
    Editable,
}

/// Per-field-group visibility rules for open-invoice methods
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_details: Option<FieldVisibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<FieldVisibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<FieldVisibility>,
}

/// Options for one payment method component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodOptions {
    /// Display name override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Display amount shown on the component's pay button
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,

    /// Method-level environment (e.g. paypal requires its own)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_image: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_holder_name: Option<bool>,

    /// Field-group visibility rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRules>,
}

impl MethodOptions {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_show_image(mut self, show: bool) -> Self {
        self.show_image = Some(show);
        self
    }

    pub fn with_holder_name(mut self, has: bool) -> Self {
        self.has_holder_name = Some(has);
        self
    }

    pub fn with_visibility(mut self, rules: VisibilityRules) -> Self {
        self.visibility = Some(rules);
        self
    }
}

/// Configuration for binding a checkout context.
///
/// Binding is pure construction; no network I/O happens here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Public client key for the drop-in
    pub client_key: String,

    /// Shopper locale (e.g. "en_US")
    pub locale: String,

    #[serde(default)]
    pub environment: Environment,

    /// Whether the drop-in renders its own pay button
    pub show_pay_button: bool,

    pub show_brand_icon: bool,

    /// Per-method options, keyed by payment method type
    #[serde(default)]
    pub payment_methods_configuration: HashMap<String, MethodOptions>,
}

impl ClientConfig {
    pub fn new(client_key: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            client_key: client_key.into(),
            locale: locale.into(),
            environment: Environment::Test,
            show_pay_button: true,
            show_brand_icon: false,
            payment_methods_configuration: HashMap::new(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_pay_button(mut self, show: bool) -> Self {
        self.show_pay_button = show;
        self
    }

    pub fn with_method(mut self, method: impl Into<String>, options: MethodOptions) -> Self {
        self.payment_methods_configuration
            .insert(method.into(), options);
        self
    }

    /// The standard per-method configuration for the demo shop, with the
    /// display amount denominated in the shopper's currency.
    pub fn with_default_methods(self, currency: &str) -> Self {
        let amount = Amount::new(currency, crate::session::CART_TOTAL_MINOR_UNITS);
        let environment = self.environment;

        self.with_method(
            "riverty",
            MethodOptions::default().with_visibility(VisibilityRules {
                personal_details: Some(FieldVisibility::Hidden),
                billing_address: Some(FieldVisibility::ReadOnly),
                delivery_address: Some(FieldVisibility::Editable),
            }),
        )
        .with_method(
            "ideal",
            MethodOptions::default()
                .with_show_image(true)
                .with_amount(amount.clone()),
        )
        .with_method(
            "card",
            MethodOptions::default()
                .with_holder_name(false)
                .with_name("Credit or debit card")
                .with_amount(amount.clone()),
        )
        .with_method(
            "paypal",
            MethodOptions::default()
                .with_amount(amount.clone())
                .with_environment(environment),
        )
        .with_method("twint", MethodOptions::default().with_amount(amount.clone()))
        .with_method(
            "klarna",
            MethodOptions::default()
                .with_name("KlarnaCustomName")
                .with_amount(amount),
        )
    }

    /// The full drop-in configuration object with the session embedded,
    /// ready to hand to the embedded SDK.
    pub fn to_dropin_json(&self, session: &PaymentSession) -> serde_json::Value {
        let mut config = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = config.as_object_mut() {
            obj.insert(
                "session".to_string(),
                serde_json::to_value(session).unwrap_or_default(),
            );
        }
        config
    }
}
