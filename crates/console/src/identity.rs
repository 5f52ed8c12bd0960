//! Identity gateway: who is signed in, and notifications when that changes.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::watch;

use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::models::{Data, SessionUser};

/// A signed-in admin plus the credential that proves it.
///
/// Passed explicitly to anything that calls the admin API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user: SessionUser,
    pub access_token: String,
}

/// Signs admins in and out and publishes every session change.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// The current session, if one is still valid.
    async fn current_session(&self) -> Result<Option<SessionContext>, ConsoleError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext, ConsoleError>;

    async fn sign_out(&self) -> Result<(), ConsoleError>;

    /// A receiver that sees every later session change. Dropping it
    /// unsubscribes.
    fn subscribe(&self) -> watch::Receiver<Option<SessionContext>>;
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    user: SessionUser,
}

/// [`IdentityGateway`] backed by the API's `/api/auth` endpoints.
///
/// The session lives in a watch channel; sign-in and sign-out publish to
/// it, and so does discovering that a stored token has expired.
pub struct HttpIdentityGateway {
    client: ApiClient,
    session: watch::Sender<Option<SessionContext>>,
    restored_token: std::sync::Mutex<Option<String>>,
}

impl HttpIdentityGateway {
    pub fn new(client: ApiClient) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            client,
            session,
            restored_token: std::sync::Mutex::new(None),
        }
    }

    /// Start from a token saved by an earlier run; it is checked against the
    /// server on the first [`current_session`](IdentityGateway::current_session).
    pub fn with_token(client: ApiClient, access_token: impl Into<String>) -> Self {
        let gateway = Self::new(client);
        if let Ok(mut token) = gateway.restored_token.lock() {
            *token = Some(access_token.into());
        }
        gateway
    }

    fn publish(&self, session: Option<SessionContext>) {
        self.session.send_replace(session);
    }

    fn token(&self) -> Option<String> {
        if let Some(session) = self.session.borrow().as_ref() {
            return Some(session.access_token.clone());
        }
        self.restored_token.lock().ok().and_then(|t| t.clone())
    }
}

#[async_trait]
impl IdentityGateway for HttpIdentityGateway {
    async fn current_session(&self) -> Result<Option<SessionContext>, ConsoleError> {
        let Some(token) = self.token() else {
            return Ok(None);
        };

        let request = self.client.get("/api/auth/session").bearer_auth(&token);
        match self.client.send_json::<Data<SessionUser>>(request).await {
            Ok(body) => {
                let session = SessionContext {
                    user: body.data,
                    access_token: token,
                };
                self.publish(Some(session.clone()));
                Ok(Some(session))
            }
            Err(ConsoleError::Api { status: 401, .. }) => {
                if let Ok(mut restored) = self.restored_token.lock() {
                    *restored = None;
                }
                self.publish(None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext, ConsoleError> {
        let request = self
            .client
            .post("/api/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }));
        let body: LoginResponse = self.client.send_json(request).await?;

        let session = SessionContext {
            user: body.user,
            access_token: body.access_token,
        };
        tracing::info!(admin_id = %session.user.id, "Signed in");
        self.publish(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ConsoleError> {
        let token = self.token().ok_or(ConsoleError::NotSignedIn)?;
        let request = self.client.post("/api/auth/logout").bearer_auth(token);
        self.client.send_empty(request).await?;

        if let Ok(mut restored) = self.restored_token.lock() {
            *restored = None;
        }
        self.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<SessionContext>> {
        self.session.subscribe()
    }
}
