//! # Routes
//!
//! Axum router configuration for the checkout API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - API:
///   - POST /api/sessions - Create a payment session
///   - POST /api/initiatePayment - Submit a payment (passthrough)
///   - POST /api/submitAdditionalDetails - Submit challenge/redirect details
///
/// - Webhooks:
///   - POST /api/webhooks/notifications - Provider notifications (HMAC-gated)
///
/// - Pages:
///   - GET /preview - Cart preview page
///   - GET /checkout - Checkout page (also the redirect return URL)
///   - GET /result/{type} - Terminal result page
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/sessions", post(handlers::create_session))
        .route("/initiatePayment", post(handlers::initiate_payment))
        .route(
            "/submitAdditionalDetails",
            post(handlers::submit_additional_details),
        )
        .route(
            "/webhooks/notifications",
            post(handlers::webhook_notifications),
        );

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // Shopper-facing pages
        .route("/preview", get(handlers::preview_page))
        .route("/checkout", get(handlers::checkout_page))
        .route("/result/{type}", get(handlers::result_page))
        .route("/static/checkout.js", get(handlers::checkout_script))
        // wasm-pack output (see checkout-wasm build instructions)
        .nest_service("/static/pkg", ServeDir::new("static/pkg"))
        // API
        .nest("/api", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
