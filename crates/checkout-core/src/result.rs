//! # Server Results and Result Routing
//!
//! The payment service answers every submission with either an inline
//! `action` (e.g. a 3-D Secure challenge) or a terminal result code.
//! Routing is a pure, total function: unrecognized codes land on the
//! error page instead of propagating an error.

use serde::{Deserialize, Serialize};

/// Terminal result codes we route on.
///
/// Anything the provider sends that we do not recognize is carried as
/// `Other` and routed to the error page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultCode {
    Authorised,
    Pending,
    Received,
    Refused,
    Other(String),
}

impl ResultCode {
    /// Total parse: never fails, unknown strings become `Other`
    pub fn parse(code: &str) -> Self {
        match code {
            "Authorised" => ResultCode::Authorised,
            "Pending" => ResultCode::Pending,
            "Received" => ResultCode::Received,
            "Refused" => ResultCode::Refused,
            other => ResultCode::Other(other.to_string()),
        }
    }
}

/// A response from the payment service to a session or submission call.
///
/// `action` and `result_code` are mutually exclusive in practice; when
/// both appear, `action` takes precedence and the result is not terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResult {
    /// Opaque challenge descriptor, fed back into the owning component
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<serde_json::Value>,

    /// Terminal result code as sent on the wire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_code: Option<String>,

    /// Remaining provider fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ServerResult {
    /// A terminal result with the given code
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            action: None,
            result_code: Some(code.into()),
            extra: serde_json::Map::new(),
        }
    }

    /// An action-required result
    pub fn with_action(action: serde_json::Value) -> Self {
        Self {
            action: Some(action),
            result_code: None,
            extra: serde_json::Map::new(),
        }
    }

    /// The parsed result code, if this result is terminal
    pub fn code(&self) -> Option<ResultCode> {
        self.result_code.as_deref().map(ResultCode::parse)
    }
}

/// Terminal navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Navigation {
    Success,
    Pending,
    Failed,
    Error,
}

impl Navigation {
    /// The result page path the shopper is sent to
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::Success => "/result/success",
            Navigation::Pending => "/result/pending",
            Navigation::Failed => "/result/failed",
            Navigation::Error => "/result/error",
        }
    }

    /// Parse a result-page slug, falling back to the error page
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "success" => Navigation::Success,
            "pending" => Navigation::Pending,
            "failed" => Navigation::Failed,
            _ => Navigation::Error,
        }
    }
}

/// What the caller must do with a server result
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Dispatch the challenge to the owning component; no navigation
    HandleAction(serde_json::Value),
    /// Navigate the shopper to a terminal page
    Navigate(Navigation),
}

/// Map a server result to its disposition.
///
/// Total and deterministic: an `action` always wins; otherwise the result
/// code picks the page, with absent or unrecognized codes falling through
/// to the error page.
pub fn route(result: &ServerResult) -> Disposition {
    if let Some(action) = &result.action {
        return Disposition::HandleAction(action.clone());
    }

    let target = match result.code() {
        Some(ResultCode::Authorised) => Navigation::Success,
        Some(ResultCode::Pending) | Some(ResultCode::Received) => Navigation::Pending,
        Some(ResultCode::Refused) => Navigation::Failed,
        Some(ResultCode::Other(_)) | None => Navigation::Error,
    };

    Disposition::Navigate(target)
}
