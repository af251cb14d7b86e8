//! # Checkout Error Types
//!
//! Typed error handling for the drop-in checkout flow.
//! All checkout operations return `Result<T, CheckoutError>`.

use thiserror::Error;

/// Core error type for all checkout operations
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Session creation failed at the payment service.
    /// Terminal for the current page load; the shopper must reload to retry.
    #[error("Session creation failed [{status}]: {message}")]
    SessionCreation { status: u16, message: String },

    /// A payment or details submission was rejected by the payment service
    #[error("Submission failed [{status}]: {message}")]
    Submission { status: u16, message: String },

    /// Webhook HMAC signature mismatch
    #[error("Signature validation failed: {0}")]
    SignatureValidation(String),

    /// Notification payload parsing error
    #[error("Notification parse error: {0}")]
    NotificationParse(String),

    /// Network/HTTP error communicating with the payment service
    #[error("Network error: {0}")]
    Network(String),

    /// A component was mounted against a missing or invalid anchor
    #[error("Mount failed for method '{method}': {message}")]
    Mount { method: String, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    /// Returns the HTTP status code appropriate for this error.
    ///
    /// Remote failures mirror the status reported by the payment service
    /// where one was captured, defaulting to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            CheckoutError::Configuration(_) => 500,
            CheckoutError::InvalidRequest(_) => 400,
            CheckoutError::SessionCreation { status, .. } => normalize_remote_status(*status),
            CheckoutError::Submission { status, .. } => normalize_remote_status(*status),
            CheckoutError::SignatureValidation(_) => 401,
            CheckoutError::NotificationParse(_) => 400,
            CheckoutError::Network(_) => 503,
            CheckoutError::Mount { .. } => 400,
            CheckoutError::Serialization(_) => 500,
            CheckoutError::Internal(_) => 500,
        }
    }
}

/// Clamp a captured remote status to something we can legally reflect.
/// A 2xx or zero stored in an error value means we never saw a usable status.
fn normalize_remote_status(status: u16) -> u16 {
    if (400..=599).contains(&status) {
        status
    } else {
        500
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
