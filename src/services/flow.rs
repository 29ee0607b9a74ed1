//! Credential submission flow — the login-form controller.
//!
//! DESIGN
//! ======
//! `LoginFlow` owns the state of one login form instance: a handle to the
//! session store plus an in-flight flag. While one submission is
//! unresolved, further calls are no-ops, so a double-click can never
//! produce duplicate sign-in attempts. The flag lives on the flow
//! instance, not in process-wide state.
//!
//! TRADE-OFFS
//! ==========
//! Cancellation is plain future drop: when the owner of a submission
//! future goes away mid-flight, the outcome is never observed and a drop
//! guard re-arms the flow so a later form instance can submit again. No
//! retry happens on failure; the user re-submits explicitly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::gate::RedirectTarget;
use crate::services::session::{Session, SessionStore};

/// Shown when the store's own error text is empty.
const GENERIC_FAILURE: &str = "Sign-in failed. Please try again.";

/// Result of a resolved submission.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Signed in; attach the session markers and navigate on.
    Success {
        session: Session,
        navigate_to: RedirectTarget,
    },
    /// Rejected; show the message and stay on the form.
    Failure { message: String },
}

/// Controller for one login form instance.
pub struct LoginFlow {
    store: Arc<dyn SessionStore>,
    in_flight: AtomicBool,
}

impl LoginFlow {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store, in_flight: AtomicBool::new(false) }
    }

    /// One-shot entry check: an existing session short-circuits the form.
    ///
    /// Store failures count as "no session" — the user just sees the
    /// sign-in form instead of being silently granted access.
    pub async fn existing_session(&self, access_token: Option<&str>) -> Option<Session> {
        let token = access_token?;
        if token.is_empty() {
            return None;
        }
        match self.store.current_session(token).await {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!(error = %e, "session check failed; treating as signed out");
                None
            }
        }
    }

    /// Submit credentials. Returns `None` while another attempt is in
    /// flight (the call is a no-op); otherwise resolves to an [`Outcome`].
    pub async fn submit(&self, email: &str, password: &str) -> Option<Outcome> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return None;
        }
        let _armed = InFlightGuard(&self.in_flight);

        let outcome = match self.store.sign_in(email, password).await {
            Ok(session) => Outcome::Success { session, navigate_to: RedirectTarget::Dashboard },
            Err(e) => {
                let message = e.to_string();
                let message = if message.trim().is_empty() {
                    GENERIC_FAILURE.to_owned()
                } else {
                    message
                };
                Outcome::Failure { message }
            }
        };
        Some(outcome)
    }
}

/// Clears the in-flight flag when a submission resolves or its future is
/// dropped mid-flight.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "flow_test.rs"]
mod tests;
