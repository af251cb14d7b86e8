//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the payment gateway, the method defaulting table, and
//! server configuration.

use checkout_adyen::AdyenGateway;
use checkout_core::{MethodDefaults, SharedGateway};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL the provider redirects back to
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (Adyen in production, a mock in tests)
    pub gateway: SharedGateway,
    /// Payment-method defaulting table
    pub defaults: Arc<MethodDefaults>,
    /// Merchant account sessions are created against
    pub merchant_account: String,
    /// Webhook HMAC key (hex-encoded)
    pub hmac_key: String,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the Adyen gateway
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let defaults = load_method_defaults();

        let gateway = AdyenGateway::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Adyen: {}", e))?;
        let merchant_account = gateway.config().merchant_account.clone();
        let hmac_key = gateway.config().hmac_key.clone();

        Ok(Self {
            gateway: Arc::new(gateway),
            defaults: Arc::new(defaults),
            merchant_account,
            hmac_key,
            config,
        })
    }

    /// Build state around an arbitrary gateway (used by tests)
    pub fn with_gateway(
        gateway: SharedGateway,
        merchant_account: impl Into<String>,
        hmac_key: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            defaults: Arc::new(MethodDefaults::builtin()),
            merchant_account: merchant_account.into(),
            hmac_key: hmac_key.into(),
            config: AppConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                base_url: "http://localhost:8080".to_string(),
                environment: "test".to_string(),
            },
        }
    }
}

/// Load the method defaulting table from config, falling back to the
/// built-in pairs when no file is found.
fn load_method_defaults() -> MethodDefaults {
    let config_paths = [
        "config/methods.toml",
        "../config/methods.toml",
        "../../config/methods.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            match MethodDefaults::from_toml(&content) {
                Ok(defaults) => {
                    tracing::info!(
                        "Loaded method defaults for {} methods from {}",
                        defaults.methods.len(),
                        path
                    );
                    return defaults;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, using built-in table", path, e);
                    return MethodDefaults::builtin();
                }
            }
        }
    }

    tracing::info!("No method defaults file found, using built-in table");
    MethodDefaults::builtin()
}
