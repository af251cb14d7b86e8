//! # Request Handlers
//!
//! Axum request handlers for the checkout API: session creation, payment
//! submission passthrough, webhook validation, and the shopper-facing
//! checkout and result pages.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use checkout_adyen::{dispatch_notification, validate_hmac, LoggingNotificationHandler};
use checkout_core::{
    validate_method_type, CheckoutError, CheckoutRequest, CheckoutResult, MethodDefaults,
    Navigation, PaymentSession, ServerResult, SessionRequest,
};
use serde::Serialize;
use tracing::{error, info, instrument};

// =============================================================================
// Response Types
// =============================================================================

/// Error body, mirroring the provider's `{message}` shape
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "dropin-checkout",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create a payment session.
///
/// Resolves country/currency through the defaulting table (explicit
/// values in the body win), builds a session request with a fresh
/// merchant reference, and forwards it to the payment service. A remote
/// failure is reflected back with the remote status where available.
#[instrument(skip(state, request), fields(payment_type = %request.payment_type))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<PaymentSession>, (StatusCode, Json<ErrorResponse>)> {
    let locale = state.defaults.resolve(&request);

    info!(
        "Creating session: country={}, currency={}",
        locale.country_code, locale.currency
    );

    let session_request =
        SessionRequest::build(&locale, &state.merchant_account, &state.config.base_url);

    let session = state
        .gateway
        .create_session(&session_request)
        .await
        .map_err(|e| {
            error!("Failed to create session: {}", e);
            checkout_error_to_response(e)
        })?;

    info!("Created session: {}", session.id);

    Ok(Json(session))
}

/// Submit a payment (raw drop-in payload passthrough)
#[instrument(skip(state, payload))]
pub async fn initiate_payment(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<ServerResult>, (StatusCode, Json<ErrorResponse>)> {
    let result = state.gateway.submit_payment(payload).await.map_err(|e| {
        error!("Payment submission failed: {}", e);
        checkout_error_to_response(e)
    })?;

    Ok(Json(result))
}

/// Submit additional details (challenge outcome or redirect token)
#[instrument(skip(state, payload))]
pub async fn submit_additional_details(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<ServerResult>, (StatusCode, Json<ErrorResponse>)> {
    let result = state.gateway.submit_details(payload).await.map_err(|e| {
        error!("Details submission failed: {}", e);
        checkout_error_to_response(e)
    })?;

    Ok(Json(result))
}

/// Handle webhook notifications.
///
/// 202 on a valid HMAC signature, 401 on an invalid one. Consumption is
/// a logging stub; signature failures never crash the server.
#[instrument(skip(state, payload))]
pub async fn webhook_notifications(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let request: checkout_adyen::NotificationRequest = serde_json::from_value(payload)
        .map_err(|e| {
            checkout_error_to_response(CheckoutError::NotificationParse(e.to_string()))
        })?;

    let item = request.first_item().map_err(checkout_error_to_response)?;

    validate_hmac(item, &state.hmac_key).map_err(|e| {
        error!("Invalid HMAC signature: {}", e);
        checkout_error_to_response(e)
    })?;

    info!(
        "merchantReference: {} eventCode: {}",
        item.merchant_reference, item.event_code
    );

    dispatch_notification(&LoggingNotificationHandler, item).map_err(|e| {
        error!("Notification handler error: {}", e);
        checkout_error_to_response(e)
    })?;

    Ok(StatusCode::ACCEPTED)
}

/// Checkout page: resolves the method list and locale for the requested
/// type and hands the page config to the browser glue as embedded JSON.
/// Doubles as the redirect return URL, where the query instead carries
/// `sessionId`/`redirectResult` for the resumer.
pub async fn checkout_page(
    State(state): State<AppState>,
    Query(request): Query<CheckoutRequest>,
) -> Response {
    if let Err(e) = validate_page_query(&request, &state.defaults) {
        error!("Rejected checkout page query: {}", e);
        return invalid_page_request();
    }

    let locale = state.defaults.resolve(&request);
    let type_list = request.method_list(&state.defaults);

    info!(
        "Checkout - Country: {}, Currency: {}",
        locale.country_code, locale.currency
    );

    let page_config = serde_json::json!({
        "clientKey": state.gateway.client_key(),
        "typeList": type_list,
        "countryCode": locale.country_code,
        "currency": locale.currency,
    });

    let containers: String = type_list
        .iter()
        .map(|t| format!(r#"        <div id="{}-container"></div>"#, t))
        .collect::<Vec<_>>()
        .join("\n");

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Checkout</title>
    <script src="https://checkoutshopper-test.adyen.com/checkoutshopper/sdk/5.68.0/adyen.js"></script>
    <link rel="stylesheet" href="https://checkoutshopper-test.adyen.com/checkoutshopper/sdk/5.68.0/adyen.css"/>
</head>
<body style="font-family: system-ui; max-width: 640px; margin: 40px auto;">
    <h1>Checkout</h1>
    <script id="page-config" type="application/json">{}</script>
{}
    <script type="module" src="/static/checkout.js"></script>
</body>
</html>
"#,
        page_config, containers
    ))
    .into_response()
}

/// Validate a shopper-facing page query before any of it is rendered.
///
/// Method types must pass the mount rule; country/currency overrides are
/// restricted to short alphabetic codes. Rejected values are never echoed
/// back into the page.
fn validate_page_query(request: &CheckoutRequest, defaults: &MethodDefaults) -> CheckoutResult<()> {
    for method in request.method_list(defaults) {
        validate_method_type(&method)?;
    }

    for code in [request.country.as_deref(), request.currency.as_deref()]
        .into_iter()
        .flatten()
    {
        let ok = !code.is_empty() && code.len() <= 8 && code.chars().all(|c| c.is_ascii_alphabetic());
        if !ok {
            return Err(CheckoutError::InvalidRequest(
                "invalid country or currency code".to_string(),
            ));
        }
    }

    Ok(())
}

fn invalid_page_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(
            "<!DOCTYPE html>\n<html><body style=\"font-family: system-ui; max-width: 640px; margin: 40px auto;\">\
             <h1>Invalid checkout request</h1></body></html>\n"
                .to_string(),
        ),
    )
        .into_response()
}

/// Cart preview page shown before checkout. Resolves the same defaulting
/// table as the checkout page and forwards the query untouched so the
/// chosen type/country/currency survive the hop.
pub async fn preview_page(
    State(state): State<AppState>,
    Query(request): Query<CheckoutRequest>,
) -> Response {
    if let Err(e) = validate_page_query(&request, &state.defaults) {
        error!("Rejected preview page query: {}", e);
        return invalid_page_request();
    }

    let locale = state.defaults.resolve(&request);

    let checkout_href = format!(
        "/checkout?type={}&country={}&currency={}",
        request.payment_type, locale.country_code, locale.currency
    );

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Cart</title></head>
<body style="font-family: system-ui; max-width: 640px; margin: 40px auto;">
    <h1>Your Cart</h1>
    <table style="width: 100%;">
        <tr><td>Sunglasses</td><td style="text-align: right;">50.00 {currency}</td></tr>
        <tr><td>Headphones</td><td style="text-align: right;">50.00 {currency}</td></tr>
        <tr><td><strong>Total</strong></td><td style="text-align: right;"><strong>100.00 {currency}</strong></td></tr>
    </table>
    <p><a href="{href}">Continue to checkout</a></p>
</body>
</html>
"#,
        currency = locale.currency,
        href = checkout_href
    ))
    .into_response()
}

/// The browser glue script driving the checkout page, embedded at build
/// time. The wasm package it imports is built separately with wasm-pack.
pub async fn checkout_script() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        include_str!("../static/checkout.js"),
    )
}

/// Terminal result page. Unknown slugs fall back to the error page
/// instead of a 404, matching the total routing contract.
pub async fn result_page(Path(slug): Path<String>) -> impl IntoResponse {
    let target = Navigation::from_slug(&slug);

    let (icon, title, detail) = match target {
        Navigation::Success => ("&#x2705;", "Payment Successful!", "Your payment was processed successfully."),
        Navigation::Pending => ("&#x23F3;", "Payment Pending", "Your payment is being processed. You will be notified once it completes."),
        Navigation::Failed => ("&#x274C;", "Payment Failed", "Your payment was refused. No charges were made."),
        Navigation::Error => ("&#x26A0;", "Something Went Wrong", "An error occurred during checkout. Please try again."),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body style="font-family: system-ui; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #1a1a2e 0%, #16213e 100%);">
    <div style="background: white; padding: 60px; border-radius: 16px; text-align: center;">
        <div style="font-size: 60px;">{icon}</div>
        <h1>{title}</h1>
        <p style="color: #666;">{detail}</p>
    </div>
</body>
</html>
"#
    ))
}
