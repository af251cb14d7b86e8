//! # checkout-adyen
//!
//! Adyen Checkout API client for the drop-in session flow.
//!
//! This crate provides:
//!
//! 1. **AdyenGateway** - `PaymentGateway` over the hosted Checkout API
//!    - `/sessions` with a fresh merchant reference per call
//!    - `/payments` and `/payments/details` as raw passthrough
//!    - Remote errors surfaced with their status code and message
//!
//! 2. **Webhook validation** - notification envelope parsing plus
//!    HMAC-SHA256 signature checks and a handler trait for consumption.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_adyen::AdyenGateway;
//! use checkout_core::{CheckoutRequest, MethodDefaults, PaymentGateway, SessionRequest};
//!
//! // Create gateway from environment
//! let gateway = AdyenGateway::from_env()?;
//!
//! // Create a session
//! let locale = MethodDefaults::builtin().resolve(&CheckoutRequest::for_type("card"));
//! let request = SessionRequest::build(&locale, "MyMerchant", "http://localhost:8080");
//! let session = gateway.create_session(&request).await?;
//! ```
//!
//! ## Webhook Handling
//!
//! ```rust,ignore
//! use checkout_adyen::{dispatch_notification, validate_hmac, LoggingNotificationHandler};
//!
//! let item = request.first_item()?;
//! validate_hmac(item, &hmac_key)?; // 401 on failure
//! dispatch_notification(&LoggingNotificationHandler, item)?;
//! ```

pub mod config;
pub mod gateway;
pub mod webhook;

// Re-exports
pub use config::AdyenConfig;
pub use gateway::AdyenGateway;
pub use webhook::{
    compute_signature, dispatch_notification, validate_hmac, LoggingNotificationHandler,
    NotificationHandler, NotificationRequest, NotificationRequestItem,
};
