//! Dashboard data access.

use async_trait::async_trait;
use cardintake_core::submission::SubmissionStatus;
use cardintake_core::types::DbId;

use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::identity::SessionContext;
use crate::models::{Data, SubmissionRecord};

/// Reads and writes submissions on behalf of a signed-in admin.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    /// Every submission with its files, newest first.
    async fn list_submissions(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<SubmissionRecord>, ConsoleError>;

    /// Persist a status change.
    async fn update_status(
        &self,
        session: &SessionContext,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<(), ConsoleError>;
}

/// [`DashboardGateway`] backed by `/api/admin/submissions`.
pub struct HttpDashboardGateway {
    client: ApiClient,
}

impl HttpDashboardGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DashboardGateway for HttpDashboardGateway {
    async fn list_submissions(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<SubmissionRecord>, ConsoleError> {
        let request = self
            .client
            .get("/api/admin/submissions")
            .bearer_auth(&session.access_token);
        let body: Data<Vec<SubmissionRecord>> = self.client.send_json(request).await?;
        Ok(body.data)
    }

    async fn update_status(
        &self,
        session: &SessionContext,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<(), ConsoleError> {
        let request = self
            .client
            .put(&format!("/api/admin/submissions/{id}/status"))
            .bearer_auth(&session.access_token)
            .json(&serde_json::json!({ "status": status }));
        self.client.send_empty(request).await
    }
}
