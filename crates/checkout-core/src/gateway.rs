//! # Payment Gateway Trait
//!
//! The seam between this system and the remote payment service. The
//! service is an opaque collaborator with a fixed contract; everything
//! behind this trait is provider plumbing, which keeps the HTTP layer
//! testable against a mock.

use crate::error::CheckoutResult;
use crate::result::ServerResult;
use crate::session::{PaymentSession, SessionRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Remote payment service operations used by the checkout flow.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment session. Called exactly once per fresh checkout
    /// attempt; a failure is terminal for that attempt (no retry).
    async fn create_session(&self, request: &SessionRequest) -> CheckoutResult<PaymentSession>;

    /// Submit a payment. The payload is the drop-in's submission data,
    /// passed through verbatim.
    async fn submit_payment(&self, payload: serde_json::Value) -> CheckoutResult<ServerResult>;

    /// Submit additional details (challenge outcome or redirect token).
    async fn submit_details(&self, payload: serde_json::Value) -> CheckoutResult<ServerResult>;

    /// Public client key handed to the browser drop-in.
    fn client_key(&self) -> &str;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type SharedGateway = Arc<dyn PaymentGateway>;
