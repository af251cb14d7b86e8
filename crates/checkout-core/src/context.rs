//! # Checkout Context and Payment Components
//!
//! The bound, client-side association of one payment session with a
//! configuration and its mounted payment method components. A context is
//! bound to exactly one session for its lifetime; resuming a session
//! constructs a new context against the old identifier.

use crate::config::ClientConfig;
use crate::error::{CheckoutError, CheckoutResult};
use crate::result::{route, Disposition, Navigation, ServerResult};
use crate::resume::RedirectArtifact;
use crate::session::PaymentSession;

/// Which payment methods to mount against a context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodSelector {
    /// One method, one component
    Single(String),
    /// Ordered methods presented side by side, each mounted independently
    Multiple(Vec<String>),
}

impl MethodSelector {
    pub fn single(method: impl Into<String>) -> Self {
        MethodSelector::Single(method.into())
    }

    pub fn multiple<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MethodSelector::Multiple(methods.into_iter().map(Into::into).collect())
    }

    pub fn methods(&self) -> Vec<&str> {
        match self {
            MethodSelector::Single(m) => vec![m.as_str()],
            MethodSelector::Multiple(ms) => ms.iter().map(|m| m.as_str()).collect(),
        }
    }
}

/// Form state produced by a component when the shopper completes input.
/// Consumed exactly once by a submission call.
#[derive(Debug, Clone)]
pub struct SubmissionState {
    pub is_valid: bool,
    /// Opaque payload forwarded to the payment service verbatim
    pub data: serde_json::Value,
}

/// Rendering state of a mounted component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    /// Mounted and collecting shopper input
    Ready,
    /// A challenge action is rendered in place of the form
    ChallengeActive,
}

/// Handle to a mounted component within its owning context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentId(usize);

/// One mounted payment method component.
///
/// Holds transient form state until submission; actions dispatched to it
/// re-render in place and never navigate.
#[derive(Debug)]
pub struct PaymentComponent {
    method: String,
    anchor: String,
    state: ComponentState,
    submission: Option<SubmissionState>,
    pending_action: Option<serde_json::Value>,
}

impl PaymentComponent {
    fn new(method: &str, anchor: &str) -> Self {
        Self {
            method: method.to_string(),
            anchor: anchor.to_string(),
            state: ComponentState::Ready,
            submission: None,
            pending_action: None,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The UI anchor this component renders into
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    pub fn state(&self) -> ComponentState {
        self.state
    }

    /// Record completed shopper input, ready for one submission
    pub fn set_submission(&mut self, submission: SubmissionState) {
        self.submission = Some(submission);
    }

    /// Take the pending submission. Valid input is handed out exactly
    /// once; invalid input is discarded and never submitted.
    pub fn take_submission(&mut self) -> Option<SubmissionState> {
        let submission = self.submission.take()?;
        if submission.is_valid {
            Some(submission)
        } else {
            None
        }
    }

    /// Dispatch a challenge action to this component. The component
    /// re-renders in place to request further shopper input.
    pub fn handle_action(&mut self, action: serde_json::Value) {
        self.pending_action = Some(action);
        self.state = ComponentState::ChallengeActive;
    }

    /// The challenge currently rendered, if any
    pub fn pending_action(&self) -> Option<&serde_json::Value> {
        self.pending_action.as_ref()
    }

    /// Clear a resolved challenge and return to input collection
    pub fn resolve_action(&mut self) {
        self.pending_action = None;
        self.state = ComponentState::Ready;
    }
}

/// Validate a payment method type: non-empty, at most 100 chars,
/// alphanumeric plus `-`/`_`. Anything else is rejected before it can
/// reach an anchor id or a rendered page.
pub fn validate_method_type(method: &str) -> CheckoutResult<()> {
    let ok = !method.is_empty()
        && method.len() <= 100
        && method
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');

    if ok {
        Ok(())
    } else {
        Err(CheckoutError::Mount {
            method: method.to_string(),
            message: "invalid payment method type".to_string(),
        })
    }
}

/// The bound checkout context for one page load.
///
/// Binding is pure construction; the context owns its mounted components
/// and is the single owner of the page's checkout state.
#[derive(Debug)]
pub struct CheckoutContext {
    session: PaymentSession,
    config: ClientConfig,
    components: Vec<PaymentComponent>,
}

impl CheckoutContext {
    /// Bind a session to a configuration. Performs no network I/O.
    pub fn bind(session: PaymentSession, config: ClientConfig) -> Self {
        Self {
            session,
            config,
            components: Vec::new(),
        }
    }

    /// Bind a fresh context against a resumed session. The existing page
    /// context, if any, is never mutated to point at the old session.
    pub fn resume(artifact: &RedirectArtifact, config: ClientConfig) -> Self {
        Self::bind(artifact.session(), config)
    }

    pub fn session(&self) -> &PaymentSession {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Mount components for the selected methods.
    ///
    /// Each method gets its own anchor (`#{method}-container`). Mounts
    /// are independent: one failing validation does not prevent its
    /// siblings from mounting.
    pub fn mount(
        &mut self,
        selector: &MethodSelector,
    ) -> Vec<CheckoutResult<ComponentId>> {
        selector
            .methods()
            .into_iter()
            .map(|method| {
                validate_method_type(method)?;
                let anchor = format!("#{}-container", method);
                self.components.push(PaymentComponent::new(method, &anchor));
                Ok(ComponentId(self.components.len() - 1))
            })
            .collect()
    }

    pub fn component(&self, id: ComponentId) -> Option<&PaymentComponent> {
        self.components.get(id.0)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut PaymentComponent> {
        self.components.get_mut(id.0)
    }

    pub fn components(&self) -> &[PaymentComponent] {
        &self.components
    }

    /// Apply a server result against the owning component.
    ///
    /// An `action` is dispatched to the component and produces no
    /// navigation; a terminal code maps to its fixed navigation target.
    pub fn handle_server_response(
        &mut self,
        id: ComponentId,
        result: &ServerResult,
    ) -> CheckoutResult<Option<Navigation>> {
        match route(result) {
            Disposition::HandleAction(action) => {
                let component = self
                    .component_mut(id)
                    .ok_or_else(|| CheckoutError::Internal("unknown component".to_string()))?;
                component.handle_action(action);
                Ok(None)
            }
            Disposition::Navigate(target) => Ok(Some(target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bound_context() -> CheckoutContext {
        CheckoutContext::bind(
            PaymentSession::from_id("CS1"),
            ClientConfig::new("test_key", "en_US"),
        )
    }

    #[test]
    fn test_single_mount() {
        let mut ctx = bound_context();
        let outcomes = ctx.mount(&MethodSelector::single("card"));

        assert_eq!(outcomes.len(), 1);
        let id = *outcomes[0].as_ref().unwrap();
        let component = ctx.component(id).unwrap();
        assert_eq!(component.method(), "card");
        assert_eq!(component.anchor(), "#card-container");
    }

    #[test]
    fn test_multi_mount_produces_independent_components() {
        let mut ctx = bound_context();
        let outcomes = ctx.mount(&MethodSelector::multiple(["card", "paypal"]));

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.is_ok()));
        assert_eq!(ctx.components().len(), 2);
        assert_eq!(ctx.components()[0].anchor(), "#card-container");
        assert_eq!(ctx.components()[1].anchor(), "#paypal-container");
    }

    #[test]
    fn test_method_type_validation_rejects_markup() {
        assert!(validate_method_type("card").is_ok());
        assert!(validate_method_type("klarna_paynow").is_ok());
        assert!(validate_method_type("").is_err());
        assert!(validate_method_type("</script>").is_err());
        assert!(validate_method_type("bad method!").is_err());
    }

    #[test]
    fn test_sibling_mount_failure_is_isolated() {
        let mut ctx = bound_context();
        let outcomes = ctx.mount(&MethodSelector::multiple(["bad method!", "paypal"]));

        assert!(outcomes[0].is_err());
        let id = *outcomes[1].as_ref().unwrap();

        // The surviving component still reaches AwaitingSubmission.
        let component = ctx.component_mut(id).unwrap();
        component.set_submission(SubmissionState {
            is_valid: true,
            data: json!({"paymentMethod": {"type": "paypal"}}),
        });
        assert!(component.take_submission().is_some());
    }

    #[test]
    fn test_invalid_submission_is_never_handed_out() {
        let mut ctx = bound_context();
        let id = *ctx.mount(&MethodSelector::single("card"))[0]
            .as_ref()
            .unwrap();

        let component = ctx.component_mut(id).unwrap();
        component.set_submission(SubmissionState {
            is_valid: false,
            data: json!({}),
        });
        assert!(component.take_submission().is_none());
    }

    #[test]
    fn test_submission_is_consumed_once() {
        let mut ctx = bound_context();
        let id = *ctx.mount(&MethodSelector::single("card"))[0]
            .as_ref()
            .unwrap();

        let component = ctx.component_mut(id).unwrap();
        component.set_submission(SubmissionState {
            is_valid: true,
            data: json!({"paymentMethod": {"type": "scheme"}}),
        });

        assert!(component.take_submission().is_some());
        assert!(component.take_submission().is_none());
    }

    #[test]
    fn test_action_dispatches_to_component_without_navigation() {
        let mut ctx = bound_context();
        let id = *ctx.mount(&MethodSelector::single("card"))[0]
            .as_ref()
            .unwrap();

        let result = ServerResult::with_action(json!({"type": "threeDS2"}));
        let nav = ctx.handle_server_response(id, &result).unwrap();

        assert!(nav.is_none());
        let component = ctx.component(id).unwrap();
        assert_eq!(component.state(), ComponentState::ChallengeActive);
        assert!(component.pending_action().is_some());
    }

    #[test]
    fn test_terminal_result_navigates() {
        let mut ctx = bound_context();
        let id = *ctx.mount(&MethodSelector::single("card"))[0]
            .as_ref()
            .unwrap();

        let result = ServerResult::with_code("Authorised");
        let nav = ctx.handle_server_response(id, &result).unwrap();

        assert_eq!(nav, Some(Navigation::Success));
    }

    #[test]
    fn test_resume_binds_a_new_context() {
        let artifact = RedirectArtifact {
            session_id: "CS-old".into(),
            redirect_result: "tok".into(),
        };

        let ctx = CheckoutContext::resume(&artifact, ClientConfig::new("test_key", "en_US"));
        assert_eq!(ctx.session().id, "CS-old");
        assert!(ctx.components().is_empty());
    }
}
