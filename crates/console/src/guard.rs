//! Admin session guard.
//!
//! Wraps the dashboard: until an admin is signed in it shows a credential
//! form instead. State changes come only from the identity gateway's
//! session notifications, so a sign-out from anywhere (or an expired
//! token) is reflected the same way as one from this guard.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ConsoleError;
use crate::identity::{IdentityGateway, SessionContext};

/// What the guard is rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Checking for an existing session.
    Initializing,
    /// Showing the credential form.
    Unauthenticated,
    /// Showing the wrapped dashboard.
    Authenticated(SessionContext),
}

/// Credential form inputs and feedback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialForm {
    pub email: String,
    pub password: String,
    /// Provider message from the last failed attempt, shown verbatim.
    pub error: Option<String>,
    /// True while a sign-in is in flight; the submit control is disabled.
    pub loading: bool,
}

pub struct SessionGuard<G: IdentityGateway + ?Sized> {
    gateway: Arc<G>,
    state: GuardState,
    form: CredentialForm,
    sign_out_error: Option<String>,
    subscription: Option<watch::Receiver<Option<SessionContext>>>,
}

impl<G: IdentityGateway + ?Sized> SessionGuard<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: GuardState::Initializing,
            form: CredentialForm::default(),
            sign_out_error: None,
            subscription: None,
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// The session to hand to the dashboard, when signed in.
    pub fn session(&self) -> Option<&SessionContext> {
        match &self.state {
            GuardState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn form(&self) -> &CredentialForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CredentialForm {
        &mut self.form
    }

    pub fn sign_out_error(&self) -> Option<&str> {
        self.sign_out_error.as_deref()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribe to session changes, then resolve the initial state.
    pub async fn mount(&mut self) {
        self.subscription = Some(self.gateway.subscribe());

        match self.gateway.current_session().await {
            Ok(session) => self.apply(session),
            Err(e) => {
                tracing::warn!(error = %e, "Session check failed");
                self.form.error = Some(e.to_string());
                self.apply(None);
            }
        }
        // The check itself may have published; that is already applied.
        if let Some(rx) = self.subscription.as_mut() {
            rx.mark_unchanged();
        }
    }

    /// Drop the subscription. The guard ignores all later changes.
    pub fn teardown(&mut self) {
        self.subscription = None;
    }

    /// Apply a pending session change, if any. Returns whether one was
    /// applied.
    pub fn sync(&mut self) -> bool {
        let Some(rx) = self.subscription.as_mut() else {
            return false;
        };
        if !rx.has_changed().unwrap_or(false) {
            return false;
        }
        let session = rx.borrow_and_update().clone();
        self.apply(session);
        true
    }

    /// Wait for the next session change and apply it.
    pub async fn next_change(&mut self) -> Result<(), ConsoleError> {
        let rx = self.subscription.as_mut().ok_or(ConsoleError::NotSignedIn)?;
        if rx.changed().await.is_err() {
            // Gateway gone: nothing can be signed in any more.
            self.apply(None);
            return Ok(());
        }
        let session = rx.borrow_and_update().clone();
        self.apply(session);
        Ok(())
    }

    /// Put the form into its loading state and hand back the credentials
    /// to send. Returns `None` while an earlier attempt is still pending.
    pub fn begin_sign_in(&mut self) -> Option<(String, String)> {
        if self.form.loading {
            return None;
        }
        self.form.loading = true;
        self.form.error = None;
        Some((self.form.email.trim().to_string(), self.form.password.clone()))
    }

    /// Settle an attempt started by [`begin_sign_in`](Self::begin_sign_in).
    pub fn finish_sign_in(&mut self, result: Result<SessionContext, ConsoleError>) {
        self.form.loading = false;
        match result {
            Ok(_) => {
                self.sync();
            }
            Err(e) => self.form.error = Some(e.to_string()),
        }
    }

    /// Submit the credential form.
    pub async fn sign_in(&mut self) {
        let Some((email, password)) = self.begin_sign_in() else {
            return;
        };
        let result = self.gateway.sign_in(&email, &password).await;
        self.finish_sign_in(result);
    }

    pub async fn sign_out(&mut self) {
        self.sign_out_error = None;
        match self.gateway.sign_out().await {
            Ok(()) => {
                self.sync();
            }
            Err(e) => self.sign_out_error = Some(e.to_string()),
        }
    }

    fn apply(&mut self, session: Option<SessionContext>) {
        self.state = match session {
            Some(session) => {
                self.form = CredentialForm::default();
                self.sign_out_error = None;
                GuardState::Authenticated(session)
            }
            None => GuardState::Unauthenticated,
        };
    }
}
