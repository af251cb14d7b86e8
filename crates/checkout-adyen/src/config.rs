//! # Adyen Configuration
//!
//! Configuration management for the Adyen Checkout API integration.
//! All secrets are loaded from environment variables.

use checkout_core::CheckoutError;
use std::env;

/// Checkout API base URL for the test environment
pub const TEST_API_BASE_URL: &str = "https://checkout-test.adyen.com/v71";

/// Adyen API configuration
#[derive(Debug, Clone)]
pub struct AdyenConfig {
    /// Checkout API key
    pub api_key: String,

    /// Merchant account the sessions are created against
    pub merchant_account: String,

    /// Public client key handed to the browser drop-in
    /// (test_... or live_...)
    pub client_key: String,

    /// HMAC key for webhook signature validation (hex-encoded)
    pub hmac_key: String,

    /// API base URL (overridable for testing/mocking)
    pub api_base_url: String,
}

impl AdyenConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `ADYEN_API_KEY`
    /// - `ADYEN_MERCHANT_ACCOUNT`
    /// - `ADYEN_CLIENT_KEY`
    /// - `ADYEN_HMAC_KEY`
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_key = env::var("ADYEN_API_KEY")
            .map_err(|_| CheckoutError::Configuration("ADYEN_API_KEY not set".to_string()))?;

        let merchant_account = env::var("ADYEN_MERCHANT_ACCOUNT").map_err(|_| {
            CheckoutError::Configuration("ADYEN_MERCHANT_ACCOUNT not set".to_string())
        })?;

        let client_key = env::var("ADYEN_CLIENT_KEY")
            .map_err(|_| CheckoutError::Configuration("ADYEN_CLIENT_KEY not set".to_string()))?;

        let hmac_key = env::var("ADYEN_HMAC_KEY")
            .map_err(|_| CheckoutError::Configuration("ADYEN_HMAC_KEY not set".to_string()))?;

        // Validate key formats
        if !client_key.starts_with("test_") && !client_key.starts_with("live_") {
            return Err(CheckoutError::Configuration(
                "ADYEN_CLIENT_KEY must start with test_ or live_".to_string(),
            ));
        }

        if hex::decode(&hmac_key).is_err() {
            return Err(CheckoutError::Configuration(
                "ADYEN_HMAC_KEY must be hex-encoded".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            merchant_account,
            client_key,
            hmac_key,
            api_base_url: TEST_API_BASE_URL.to_string(),
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        api_key: impl Into<String>,
        merchant_account: impl Into<String>,
        client_key: impl Into<String>,
        hmac_key: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            merchant_account: merchant_account.into(),
            client_key: client_key.into(),
            hmac_key: hmac_key.into(),
            api_base_url: TEST_API_BASE_URL.to_string(),
        }
    }

    /// Check if using a test client key
    pub fn is_test_mode(&self) -> bool {
        self.client_key.starts_with("test_")
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config() {
        let config = AdyenConfig::new("AQE_key", "TestMerchant", "test_CLIENTKEY", "DEADBEEF");

        assert!(config.is_test_mode());
        assert_eq!(config.api_base_url, TEST_API_BASE_URL);
    }

    #[test]
    fn test_base_url_override() {
        let config = AdyenConfig::new("k", "m", "test_c", "AA")
            .with_api_base_url("http://localhost:9999");

        assert_eq!(config.api_base_url, "http://localhost:9999");
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("ADYEN_API_KEY");

        let result = AdyenConfig::from_env();
        assert!(result.is_err());
    }
}
