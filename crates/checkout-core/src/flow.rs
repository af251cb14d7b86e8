//! # Page-Load State Machine
//!
//! Explicit model of one page load's checkout lifecycle. Transitions are
//! named triggers (submission started, response received, resumed) so the
//! machine is exhaustive and testable rather than a set of ambient event
//! listeners.

use crate::error::{CheckoutError, CheckoutResult};
use crate::result::{route, Disposition, Navigation, ServerResult};

/// Lifecycle phase of one page load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Page loaded, resume indicator not yet inspected
    Init,
    /// Session creation round trip outstanding
    AwaitingSession,
    /// Context bound, components collecting input
    Bound,
    /// A submission round trip is outstanding
    AwaitingSubmission,
    /// A challenge action is rendered; waiting on the shopper
    ActionPending,
    /// A terminal result arrived; shopper routed to a result page
    Terminal(Navigation),
    /// Unrecoverable error; requires a full page reload to retry
    Failed,
}

/// The page-load state machine.
///
/// At most one submission is in flight at a time; a second
/// `submission_started` while one is outstanding is rejected.
#[derive(Debug)]
pub struct CheckoutFlow {
    phase: CheckoutPhase,
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            phase: CheckoutPhase::Init,
        }
    }

    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.phase,
            CheckoutPhase::Terminal(_) | CheckoutPhase::Failed
        )
    }

    fn transition(&mut self, from: &[CheckoutPhase], to: CheckoutPhase) -> CheckoutResult<()> {
        if from.contains(&self.phase) {
            self.phase = to;
            Ok(())
        } else {
            Err(CheckoutError::Internal(format!(
                "invalid transition to {:?} from {:?}",
                to, self.phase
            )))
        }
    }

    /// Fresh checkout: the session-creation round trip has started
    pub fn session_requested(&mut self) -> CheckoutResult<()> {
        self.transition(&[CheckoutPhase::Init], CheckoutPhase::AwaitingSession)
    }

    /// Session creation succeeded and the context is bound
    pub fn session_ready(&mut self) -> CheckoutResult<()> {
        self.transition(&[CheckoutPhase::AwaitingSession], CheckoutPhase::Bound)
    }

    /// Session creation failed; terminal for this page load
    pub fn session_failed(&mut self) -> CheckoutResult<()> {
        self.transition(&[CheckoutPhase::AwaitingSession], CheckoutPhase::Failed)
    }

    /// Redirect return: the resumer bound a context against the carried
    /// session identifier, skipping session creation entirely
    pub fn resumed(&mut self) -> CheckoutResult<()> {
        self.transition(&[CheckoutPhase::Init], CheckoutPhase::Bound)
    }

    /// The shopper (or the resumer) triggered a submission round trip
    pub fn submission_started(&mut self) -> CheckoutResult<()> {
        self.transition(
            &[CheckoutPhase::Bound, CheckoutPhase::ActionPending],
            CheckoutPhase::AwaitingSubmission,
        )
    }

    /// A server result arrived for the outstanding submission.
    ///
    /// Actions loop back through `ActionPending`; terminal codes resolve
    /// the flow and return the navigation target.
    pub fn response_received(&mut self, result: &ServerResult) -> CheckoutResult<Option<Navigation>> {
        if self.phase != CheckoutPhase::AwaitingSubmission {
            return Err(CheckoutError::Internal(format!(
                "response received in {:?}",
                self.phase
            )));
        }

        match route(result) {
            Disposition::HandleAction(_) => {
                self.phase = CheckoutPhase::ActionPending;
                Ok(None)
            }
            Disposition::Navigate(target) => {
                self.phase = CheckoutPhase::Terminal(target);
                Ok(Some(target))
            }
        }
    }

    /// Unrecoverable transport or validation error; reachable from any
    /// non-terminal state
    pub fn failed(&mut self) {
        if !matches!(self.phase, CheckoutPhase::Terminal(_)) {
            self.phase = CheckoutPhase::Failed;
        }
    }
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fresh_checkout_happy_path() {
        let mut flow = CheckoutFlow::new();

        flow.session_requested().unwrap();
        assert_eq!(flow.phase(), CheckoutPhase::AwaitingSession);

        flow.session_ready().unwrap();
        assert_eq!(flow.phase(), CheckoutPhase::Bound);

        flow.submission_started().unwrap();
        let nav = flow
            .response_received(&ServerResult::with_code("Authorised"))
            .unwrap();

        assert_eq!(nav, Some(Navigation::Success));
        assert_eq!(flow.phase(), CheckoutPhase::Terminal(Navigation::Success));
        assert!(flow.is_terminal());
    }

    #[test]
    fn test_session_failure_never_reaches_bound() {
        let mut flow = CheckoutFlow::new();
        flow.session_requested().unwrap();
        flow.session_failed().unwrap();

        assert_eq!(flow.phase(), CheckoutPhase::Failed);
        assert!(flow.submission_started().is_err());
    }

    #[test]
    fn test_resume_skips_session_creation() {
        let mut flow = CheckoutFlow::new();
        flow.resumed().unwrap();
        assert_eq!(flow.phase(), CheckoutPhase::Bound);

        flow.submission_started().unwrap();
        let nav = flow
            .response_received(&ServerResult::with_code("Received"))
            .unwrap();
        assert_eq!(nav, Some(Navigation::Pending));
    }

    #[test]
    fn test_action_loops_back_to_submission() {
        let mut flow = CheckoutFlow::new();
        flow.resumed().unwrap();
        flow.submission_started().unwrap();

        let nav = flow
            .response_received(&ServerResult::with_action(json!({"type": "threeDS2"})))
            .unwrap();
        assert_eq!(nav, None);
        assert_eq!(flow.phase(), CheckoutPhase::ActionPending);

        // Challenge resolved, shopper submits the additional details.
        flow.submission_started().unwrap();
        let nav = flow
            .response_received(&ServerResult::with_code("Refused"))
            .unwrap();
        assert_eq!(nav, Some(Navigation::Failed));
    }

    #[test]
    fn test_one_submission_in_flight() {
        let mut flow = CheckoutFlow::new();
        flow.resumed().unwrap();
        flow.submission_started().unwrap();

        assert!(flow.submission_started().is_err());
        assert_eq!(flow.phase(), CheckoutPhase::AwaitingSubmission);
    }

    #[test]
    fn test_illegal_transitions_are_rejected() {
        let mut flow = CheckoutFlow::new();
        assert!(flow.session_ready().is_err());
        assert!(flow.submission_started().is_err());
        assert!(flow
            .response_received(&ServerResult::with_code("Authorised"))
            .is_err());
        assert_eq!(flow.phase(), CheckoutPhase::Init);
    }

    #[test]
    fn test_failed_is_reachable_from_any_state_and_sticky() {
        let mut flow = CheckoutFlow::new();
        flow.resumed().unwrap();
        flow.submission_started().unwrap();
        flow.failed();
        assert_eq!(flow.phase(), CheckoutPhase::Failed);

        // Terminal results are not overwritten by later errors.
        let mut done = CheckoutFlow::new();
        done.resumed().unwrap();
        done.submission_started().unwrap();
        done.response_received(&ServerResult::with_code("Authorised"))
            .unwrap();
        done.failed();
        assert_eq!(done.phase(), CheckoutPhase::Terminal(Navigation::Success));
    }
}
