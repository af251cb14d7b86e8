//! # Redirect Resumption
//!
//! When a shopper returns from an external authentication page, the
//! provider appends `sessionId` (and usually `redirectResult`) to the
//! return URL. Presence of `sessionId` is the sole signal that this page
//! load resumes an existing session instead of starting a new one.

use crate::session::PaymentSession;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query parameter carrying the session identifier on return
pub const SESSION_ID_PARAM: &str = "sessionId";

/// Query parameter carrying the opaque redirect token on return
pub const REDIRECT_RESULT_PARAM: &str = "redirectResult";

/// The state carried back from an external redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectArtifact {
    /// Identifier of the session being resumed
    pub session_id: String,

    /// Opaque token to submit back to the provider; may be empty when the
    /// provider did not include one, which is not an error
    #[serde(default)]
    pub redirect_result: String,
}

impl RedirectArtifact {
    /// The session value to rebind against. The identifier alone is
    /// sufficient for the remote service to resolve the session.
    pub fn session(&self) -> PaymentSession {
        PaymentSession::from_id(self.session_id.clone())
    }

    /// The `submitDetails` payload carrying the redirect token
    pub fn details_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "details": { "redirectResult": self.redirect_result }
        })
    }
}

/// Detect a redirect return from page query parameters.
///
/// Returns `Some` iff `sessionId` is present; a missing `redirectResult`
/// passes through as an empty token.
pub fn try_resume(params: &HashMap<String, String>) -> Option<RedirectArtifact> {
    let session_id = params.get(SESSION_ID_PARAM)?;
    if session_id.is_empty() {
        return None;
    }

    Some(RedirectArtifact {
        session_id: session_id.clone(),
        redirect_result: params
            .get(REDIRECT_RESULT_PARAM)
            .cloned()
            .unwrap_or_default(),
    })
}

/// Split a raw query string into parameters.
///
/// Convenience for tests and server-side use; values are taken verbatim.
/// Browser callers should hand in parameters decoded by the URL layer.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}
