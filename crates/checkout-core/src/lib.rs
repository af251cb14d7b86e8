//! # checkout-core
//!
//! Core types and logic for the drop-in checkout session flow.
//!
//! This crate provides:
//! - `CheckoutRequest` and the injectable `MethodDefaults` table
//! - `PaymentSession` / `SessionRequest` for session creation
//! - `ServerResult` and the total `route` result router
//! - `RedirectArtifact` / `try_resume` for redirect returns
//! - `ClientConfig`, `CheckoutContext`, and `PaymentComponent` for binding
//! - `CheckoutFlow`, the page-load state machine
//! - `PaymentGateway`, the seam to the remote payment service
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{
//!     try_resume, CheckoutContext, CheckoutRequest, ClientConfig, MethodDefaults,
//!     MethodSelector, SessionRequest,
//! };
//!
//! // Fresh checkout: resolve defaults and request a session.
//! let defaults = MethodDefaults::builtin();
//! let locale = defaults.resolve(&CheckoutRequest::for_type("twint"));
//! let request = SessionRequest::build(&locale, "MyMerchant", "http://localhost:8080");
//! let session = gateway.create_session(&request).await?;
//!
//! // Bind and mount.
//! let config = ClientConfig::new(gateway.client_key(), "en_US").with_default_methods("CHF");
//! let mut ctx = CheckoutContext::bind(session, config);
//! ctx.mount(&MethodSelector::single("twint"));
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod request;
pub mod result;
pub mod resume;
pub mod session;

// Re-exports for convenience
pub use config::{ClientConfig, Environment, FieldVisibility, MethodOptions, VisibilityRules};
pub use context::{
    validate_method_type, CheckoutContext, ComponentId, ComponentState, MethodSelector,
    PaymentComponent, SubmissionState,
};
pub use error::{CheckoutError, CheckoutResult};
pub use flow::{CheckoutFlow, CheckoutPhase};
pub use gateway::{PaymentGateway, SharedGateway};
pub use request::{
    CheckoutRequest, CountryCurrency, MethodDefaults, ResolvedLocale, DEFAULT_PAYMENT_TYPE,
    MULTIPLE_PAYMENT_TYPE,
};
pub use result::{route, Disposition, Navigation, ResultCode, ServerResult};
pub use resume::{
    parse_query, try_resume, RedirectArtifact, REDIRECT_RESULT_PARAM, SESSION_ID_PARAM,
};
pub use session::{Amount, LineItem, PaymentSession, SessionRequest, CART_TOTAL_MINOR_UNITS};
