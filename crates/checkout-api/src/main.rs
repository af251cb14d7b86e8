//! # Drop-in Checkout
//!
//! Reference merchant server for the hosted-payments session flow.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export ADYEN_API_KEY=AQE...
//! export ADYEN_MERCHANT_ACCOUNT=YourMerchantAccount
//! export ADYEN_CLIENT_KEY=test_...
//! export ADYEN_HMAC_KEY=44782DEF...
//!
//! # Run the server
//! dropin-checkout
//! ```

use checkout_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());
    info!("Merchant account: {}", state.merchant_account);

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("Server started -> http://{}", addr);

    if !is_prod {
        info!("Checkout page: http://{}/checkout?type=card", addr);
        info!("Sessions: POST http://{}/api/sessions", addr);
        info!("Webhooks: POST http://{}/api/webhooks/notifications", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
