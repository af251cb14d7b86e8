//! # Adyen Checkout API Client
//!
//! `PaymentGateway` implementation over the Adyen Checkout API:
//! sessions, payments, and payment details. The remote service is an
//! opaque collaborator; request and response bodies are passed through
//! with minimal interpretation.

use crate::config::AdyenConfig;
use async_trait::async_trait;
use checkout_core::{
    CheckoutError, CheckoutResult, PaymentGateway, PaymentSession, ServerResult, SessionRequest,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

/// Gateway over Adyen's hosted Checkout API.
pub struct AdyenGateway {
    config: AdyenConfig,
    client: Client,
}

/// How a non-2xx response should be classified
enum RemoteCall {
    Session,
    Submission,
}

impl AdyenGateway {
    /// Create a new gateway
    pub fn new(config: AdyenConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Create from environment variables
    pub fn from_env() -> CheckoutResult<Self> {
        let config = AdyenConfig::from_env()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AdyenConfig {
        &self.config
    }

    /// POST a JSON body and decode a JSON response, mapping non-2xx
    /// statuses to the appropriate error with the remote status and
    /// message attached.
    async fn post_json<T, B>(
        &self,
        path: &str,
        body: &B,
        idempotency_key: Option<&str>,
        call: RemoteCall,
    ) -> CheckoutResult<T>
    where
        T: for<'de> Deserialize<'de>,
        B: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.config.api_base_url, path);

        let mut request = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .json(body);

        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Adyen API error: status={}, body={}", status, text);

            let message = serde_json::from_str::<AdyenErrorResponse>(&text)
                .map(|e| e.message)
                .unwrap_or(text);

            return Err(match call {
                RemoteCall::Session => CheckoutError::SessionCreation {
                    status: status.as_u16(),
                    message,
                },
                RemoteCall::Submission => CheckoutError::Submission {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Adyen response: {}", e))
        })
    }
}

#[async_trait]
impl PaymentGateway for AdyenGateway {
    #[instrument(skip(self, request), fields(reference = %request.reference))]
    async fn create_session(&self, request: &SessionRequest) -> CheckoutResult<PaymentSession> {
        debug!(
            "Creating session: country={}, currency={}",
            request.country_code, request.amount.currency
        );

        let session: PaymentSession = self
            .post_json(
                "/sessions",
                request,
                Some(&request.reference),
                RemoteCall::Session,
            )
            .await?;

        info!("Created session: id={}", session.id);
        Ok(session)
    }

    #[instrument(skip(self, payload))]
    async fn submit_payment(&self, payload: serde_json::Value) -> CheckoutResult<ServerResult> {
        self.post_json("/payments", &payload, None, RemoteCall::Submission)
            .await
    }

    #[instrument(skip(self, payload))]
    async fn submit_details(&self, payload: serde_json::Value) -> CheckoutResult<ServerResult> {
        self.post_json("/payments/details", &payload, None, RemoteCall::Submission)
            .await
    }

    fn client_key(&self) -> &str {
        &self.config.client_key
    }

    fn provider_name(&self) -> &'static str {
        "adyen"
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdyenErrorResponse {
    message: String,
    #[serde(default)]
    #[allow(dead_code)]
    error_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::{CheckoutRequest, MethodDefaults, ResultCode};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway_for(server: &MockServer) -> AdyenGateway {
        let config = AdyenConfig::new("test-api-key", "TestMerchant", "test_CLIENTKEY", "AA")
            .with_api_base_url(server.uri());
        AdyenGateway::new(config)
    }

    fn session_request() -> SessionRequest {
        let locale = MethodDefaults::builtin().resolve(&CheckoutRequest::for_type("twint"));
        SessionRequest::build(&locale, "TestMerchant", "http://localhost:8080")
    }

    #[tokio::test]
    async fn test_create_session_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sessions"))
            .and(header("x-api-key", "test-api-key"))
            .and(body_partial_json(json!({
                "amount": { "currency": "CHF", "value": 10000 },
                "countryCode": "CH",
                "merchantAccount": "TestMerchant"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "CS_TEST_1",
                "sessionData": "Ab02b4c0...",
                "reference": "ord-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let session = gateway.create_session(&session_request()).await.unwrap();

        assert_eq!(session.id, "CS_TEST_1");
        assert_eq!(session.session_data.as_deref(), Some("Ab02b4c0..."));
    }

    #[tokio::test]
    async fn test_create_session_failure_mirrors_remote_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "status": 422,
                "errorCode": "901",
                "message": "Invalid Merchant Account",
                "errorType": "security"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.create_session(&session_request()).await.unwrap_err();

        match err {
            CheckoutError::SessionCreation { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Invalid Merchant Account");
            }
            other => panic!("expected SessionCreation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_payment_passthrough_returns_action() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/payments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "action": { "type": "threeDS2", "token": "xyz" }
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let result = gateway
            .submit_payment(json!({"paymentMethod": {"type": "scheme"}}))
            .await
            .unwrap();

        assert!(result.action.is_some());
        assert!(result.result_code.is_none());
    }

    #[tokio::test]
    async fn test_submit_details_returns_terminal_code() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/payments/details"))
            .and(body_partial_json(json!({
                "details": { "redirectResult": "tok" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultCode": "Authorised",
                "pspReference": "881"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let result = gateway
            .submit_details(json!({"details": {"redirectResult": "tok"}}))
            .await
            .unwrap();

        assert_eq!(result.code(), Some(ResultCode::Authorised));
    }

    #[tokio::test]
    async fn test_submission_error_classification() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/payments"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "Forbidden"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.submit_payment(json!({})).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Submission { status: 403, .. }));
        assert_eq!(err.status_code(), 403);
    }
}
