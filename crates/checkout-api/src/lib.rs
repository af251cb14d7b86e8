//! # checkout-api
//!
//! HTTP API layer for the drop-in checkout session flow.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Session creation and payment submission endpoints
//! - HMAC-validated webhook handler
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/sessions` | Create a payment session |
//! | POST | `/api/initiatePayment` | Submit a payment |
//! | POST | `/api/submitAdditionalDetails` | Submit challenge/redirect details |
//! | POST | `/api/webhooks/notifications` | Provider notifications |
//! | GET | `/preview` | Cart preview page |
//! | GET | `/checkout` | Checkout page / redirect return URL |
//! | GET | `/result/{type}` | Terminal result page |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
