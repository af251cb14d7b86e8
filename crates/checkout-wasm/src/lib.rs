//! # checkout-wasm
//!
//! WebAssembly bindings for the drop-in checkout session flow.
//!
//! This crate provides the browser-side glue:
//! - Redirect-return detection from the page query string
//! - Shopper preference cache (locale/currency/country) in local storage
//! - Drop-in configuration production for the embedded SDK
//! - Server-response routing to a result page path
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { detect_redirect, dropin_configuration, route_server_response } from 'dropin-checkout-wasm';
//!
//! await init();
//!
//! const resume = detect_redirect(window.location.search);
//! if (resume === undefined) {
//!   const session = await callServer("/api/sessions", {});
//!   const config = dropin_configuration(clientKey, prefs, session);
//!   // hand config to the drop-in SDK, mount per method
//! }
//! ```
//!
//! ## Building
//!
//! From the workspace root, into the directory the server publishes as
//! `/static/pkg/`:
//!
//! ```bash
//! wasm-pack build crates/checkout-wasm --target web --out-dir ../../static/pkg
//! ```

use checkout_core::{
    parse_query, route, try_resume, ClientConfig, Disposition, PaymentSession, RedirectArtifact,
    ServerResult,
};
use wasm_bindgen::prelude::*;

const LOCALE_KEY: &str = "selectedLocale";
const CURRENCY_KEY: &str = "selectedCurrency";
const COUNTRY_KEY: &str = "selectedCountry";

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Shopper display preferences, cached per page origin.
/// A convenience cache only; never part of the session protocol.
#[derive(Debug, Clone)]
#[wasm_bindgen]
pub struct ShopperPrefs {
    locale: String,
    currency: String,
    country: String,
}

#[wasm_bindgen]
impl ShopperPrefs {
    #[wasm_bindgen(constructor)]
    pub fn new(locale: String, currency: String, country: String) -> Self {
        Self {
            locale,
            currency,
            country,
        }
    }

    /// Load preferences from local storage, falling back to en_US/USD/US
    pub fn from_storage() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());

        let read = |key: &str| -> Option<String> {
            storage.as_ref().and_then(|s| s.get_item(key).ok().flatten())
        };

        Self {
            locale: read(LOCALE_KEY).unwrap_or_else(|| "en_US".to_string()),
            currency: read(CURRENCY_KEY).unwrap_or_else(|| "USD".to_string()),
            country: read(COUNTRY_KEY).unwrap_or_else(|| "US".to_string()),
        }
    }

    /// Persist preferences back to local storage (best effort)
    pub fn persist(&self) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(LOCALE_KEY, &self.locale);
            let _ = storage.set_item(CURRENCY_KEY, &self.currency);
            let _ = storage.set_item(COUNTRY_KEY, &self.country);
        }
    }

    #[wasm_bindgen(getter)]
    pub fn locale(&self) -> String {
        self.locale.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn currency(&self) -> String {
        self.currency.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn country(&self) -> String {
        self.country.clone()
    }
}

impl Default for ShopperPrefs {
    fn default() -> Self {
        Self::new("en_US".into(), "USD".into(), "US".into())
    }
}

fn detect_redirect_artifact(query: &str) -> Option<RedirectArtifact> {
    try_resume(&parse_query(query))
}

/// Detect a redirect return from the page query string.
///
/// Returns `{sessionId, redirectResult}` when `sessionId` is present,
/// `undefined` for a fresh checkout.
#[wasm_bindgen]
pub fn detect_redirect(query: &str) -> Result<JsValue, JsValue> {
    match detect_redirect_artifact(query) {
        Some(artifact) => serde_wasm_bindgen::to_value(&artifact)
            .map_err(|e| JsValue::from_str(&format!("serialize failed: {}", e))),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// The `submitDetails` payload for a redirect return
#[wasm_bindgen]
pub fn redirect_details_payload(session_id: &str, redirect_result: &str) -> Result<JsValue, JsValue> {
    let artifact = RedirectArtifact {
        session_id: session_id.to_string(),
        redirect_result: redirect_result.to_string(),
    };
    serde_wasm_bindgen::to_value(&artifact.details_payload())
        .map_err(|e| JsValue::from_str(&format!("serialize failed: {}", e)))
}

fn build_dropin_config(
    client_key: &str,
    prefs: &ShopperPrefs,
    session: &PaymentSession,
) -> serde_json::Value {
    ClientConfig::new(client_key, prefs.locale.clone())
        .with_default_methods(&prefs.currency)
        .to_dropin_json(session)
}

/// Build the full drop-in configuration for a session.
///
/// `session` is the JSON returned by `POST /api/sessions`, or a bare
/// `{id}` object on the resume path.
#[wasm_bindgen]
pub fn dropin_configuration(
    client_key: &str,
    prefs: &ShopperPrefs,
    session: JsValue,
) -> Result<JsValue, JsValue> {
    let session: PaymentSession = serde_wasm_bindgen::from_value(session)
        .map_err(|e| JsValue::from_str(&format!("invalid session: {}", e)))?;

    serde_wasm_bindgen::to_value(&build_dropin_config(client_key, prefs, &session))
        .map_err(|e| JsValue::from_str(&format!("serialize failed: {}", e)))
}

fn route_response_value(response: &ServerResult) -> serde_json::Value {
    match route(response) {
        Disposition::HandleAction(action) => serde_json::json!({
            "kind": "action",
            "action": action,
        }),
        Disposition::Navigate(target) => serde_json::json!({
            "kind": "navigate",
            "path": target.path(),
        }),
    }
}

/// Route a server response.
///
/// Returns `{kind: "action", action}` for an inline challenge (feed it
/// to the owning component) or `{kind: "navigate", path}` for a terminal
/// result. Total: malformed responses route to the error page.
#[wasm_bindgen]
pub fn route_server_response(response: JsValue) -> Result<JsValue, JsValue> {
    let response: ServerResult =
        serde_wasm_bindgen::from_value(response).unwrap_or_else(|_| ServerResult {
            action: None,
            result_code: None,
            extra: serde_json::Map::new(),
        });

    serde_wasm_bindgen::to_value(&route_response_value(&response))
        .map_err(|e| JsValue::from_str(&format!("serialize failed: {}", e)))
}

/// The container element id a payment method component mounts into
#[wasm_bindgen]
pub fn container_id(method: &str) -> String {
    format!("{}-container", method)
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
