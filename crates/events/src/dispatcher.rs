//! Sends the admin alert and the submitter confirmation for a stored
//! submission.
//!
//! The two sends are independent: one failing never prevents the other,
//! and neither ever affects the submission itself. Callers on the intake
//! path use [`NotificationDispatcher::spawn_dispatch`] so the HTTP response
//! does not wait on SMTP.

use std::sync::Arc;

use cardintake_core::types::DbId;
use cardintake_db::models::submission::SubmissionWithFiles;
use cardintake_db::repositories::SubmissionRepo;
use cardintake_db::DbPool;

use crate::delivery::email::{EmailError, Mailer, OutgoingEmail};
use crate::templates::{render_admin_alert, render_confirmation, RenderedEmail};

/// Default sender when `FROM_EMAIL` is not set.
const DEFAULT_FROM_ADDRESS: &str = "Card Intake <noreply@cardintake.local>";

/// Default public site URL when `SITE_URL` is not set.
const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Addresses and links baked into outgoing notifications.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// Recipient of admin alerts, also quoted to submitters as the contact.
    pub admin_email: String,
    /// RFC 5322 sender mailbox.
    pub from_address: String,
    /// Public base URL; the dashboard link is `{site_url}/admin`.
    pub site_url: String,
}

impl NotificationSettings {
    /// Load settings from environment variables.
    ///
    /// | Variable      | Default                                   |
    /// |---------------|-------------------------------------------|
    /// | `ADMIN_EMAIL` | `admin@example.com`                       |
    /// | `FROM_EMAIL`  | `Card Intake <noreply@cardintake.local>`  |
    /// | `SITE_URL`    | `http://localhost:3000`                   |
    pub fn from_env() -> Self {
        Self {
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".into()),
            from_address: std::env::var("FROM_EMAIL")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.into()),
            site_url: std::env::var("SITE_URL").unwrap_or_else(|_| DEFAULT_SITE_URL.into()),
        }
    }
}

/// Why a notification could not be sent.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Submission {0} not found")]
    NotFound(DbId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Composes and sends the two notification emails for a submission.
pub struct NotificationDispatcher {
    pool: DbPool,
    mailer: Arc<dyn Mailer>,
    settings: NotificationSettings,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool, mailer: Arc<dyn Mailer>, settings: NotificationSettings) -> Self {
        Self {
            pool,
            mailer,
            settings,
        }
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    async fn load(&self, submission_id: DbId) -> Result<SubmissionWithFiles, DispatchError> {
        SubmissionRepo::find_with_files(&self.pool, submission_id)
            .await?
            .ok_or(DispatchError::NotFound(submission_id))
    }

    /// Re-fetch the submission and send the internal alert.
    /// Returns the message id.
    pub async fn send_admin_alert(&self, submission_id: DbId) -> Result<String, DispatchError> {
        let submission = self.load(submission_id).await?;
        self.send_admin_alert_for(&submission).await
    }

    /// Re-fetch the submission and send the submitter confirmation.
    /// Returns the message id.
    pub async fn send_confirmation(&self, submission_id: DbId) -> Result<String, DispatchError> {
        let submission = self.load(submission_id).await?;
        self.send_confirmation_for(&submission).await
    }

    pub async fn send_admin_alert_for(
        &self,
        submission: &SubmissionWithFiles,
    ) -> Result<String, DispatchError> {
        let rendered = render_admin_alert(submission, &self.settings.site_url);
        self.deliver(self.settings.admin_email.clone(), rendered)
            .await
    }

    pub async fn send_confirmation_for(
        &self,
        submission: &SubmissionWithFiles,
    ) -> Result<String, DispatchError> {
        let rendered = render_confirmation(submission, &self.settings.admin_email);
        self.deliver(submission.submission.email.clone(), rendered)
            .await
    }

    async fn deliver(&self, to: String, rendered: RenderedEmail) -> Result<String, DispatchError> {
        let email = OutgoingEmail {
            from: self.settings.from_address.clone(),
            to,
            subject: rendered.subject,
            text: rendered.text,
            html: rendered.html,
        };
        Ok(self.mailer.send(email).await?)
    }

    /// Send both emails for an already-loaded submission, logging failures.
    ///
    /// Returns how many of the two sends succeeded.
    pub async fn dispatch_loaded(&self, submission: &SubmissionWithFiles) -> usize {
        let id = submission.submission.id;
        let mut sent = 0;

        match self.send_admin_alert_for(submission).await {
            Ok(message_id) => {
                sent += 1;
                tracing::info!(submission_id = %id, %message_id, "Admin alert sent");
            }
            Err(e) => {
                tracing::error!(submission_id = %id, error = %e, "Failed to send admin alert")
            }
        }

        match self.send_confirmation_for(submission).await {
            Ok(message_id) => {
                sent += 1;
                tracing::info!(submission_id = %id, %message_id, "Confirmation sent");
            }
            Err(e) => {
                tracing::error!(submission_id = %id, error = %e, "Failed to send confirmation")
            }
        }

        sent
    }

    /// Re-fetch the submission and send both emails, logging every failure.
    pub async fn dispatch(&self, submission_id: DbId) -> usize {
        match self.load(submission_id).await {
            Ok(submission) => self.dispatch_loaded(&submission).await,
            Err(e) => {
                tracing::error!(
                    submission_id = %submission_id,
                    error = %e,
                    "Could not load submission for notifications"
                );
                0
            }
        }
    }

    /// Run [`dispatch`](Self::dispatch) in the background.
    pub fn spawn_dispatch(self: &Arc<Self>, submission_id: DbId) -> tokio::task::JoinHandle<usize> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.dispatch(submission_id).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cardintake_core::submission::SubmissionStatus;
    use cardintake_db::models::submission::Submission;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    use super::*;

    /// Records every message; fails any whose recipient is in `fail_for`.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail_for: Vec<String>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<String, EmailError> {
            if self.fail_for.contains(&email.to) {
                return Err(EmailError::Build("relay refused".into()));
            }
            let id = format!("<{}@test>", self.sent.lock().unwrap().len());
            self.sent.lock().unwrap().push(email);
            Ok(id)
        }
    }

    fn settings() -> NotificationSettings {
        NotificationSettings {
            admin_email: "staff@cards.test".into(),
            from_address: "Card Intake <noreply@cards.test>".into(),
            site_url: "https://cards.test".into(),
        }
    }

    fn submission() -> SubmissionWithFiles {
        let now = chrono::Utc::now();
        SubmissionWithFiles {
            submission: Submission {
                id: Uuid::new_v4(),
                name: "Misty".into(),
                email: "misty@example.com".into(),
                phone: None,
                description: "Water types".into(),
                address: None,
                city: None,
                state: None,
                zip_code: None,
                country: None,
                price_range: None,
                status: SubmissionStatus::Pending,
                created_at: now,
                updated_at: now,
            },
            submission_files: Vec::new(),
        }
    }

    /// A pool that is never connected; these tests never touch the database.
    fn lazy_pool() -> DbPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://unused@localhost/unused")
            .unwrap()
    }

    #[tokio::test]
    async fn dispatch_sends_two_distinct_emails() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = NotificationDispatcher::new(lazy_pool(), mailer.clone(), settings());

        let sent = dispatcher.dispatch_loaded(&submission()).await;

        assert_eq!(sent, 2);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].to, "staff@cards.test");
        assert_eq!(sent[1].to, "misty@example.com");
        assert_ne!(sent[0].subject, sent[1].subject);
        assert!(sent.iter().all(|m| m.from == "Card Intake <noreply@cards.test>"));
    }

    #[tokio::test]
    async fn one_failed_send_does_not_block_the_other() {
        let mailer = Arc::new(RecordingMailer {
            fail_for: vec!["staff@cards.test".into()],
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(lazy_pool(), mailer.clone(), settings());

        let sent = dispatcher.dispatch_loaded(&submission()).await;

        assert_eq!(sent, 1);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "misty@example.com");
    }

    #[tokio::test]
    async fn send_errors_surface_to_direct_callers() {
        let mailer = Arc::new(RecordingMailer {
            fail_for: vec!["misty@example.com".into()],
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(lazy_pool(), mailer, settings());

        let result = dispatcher.send_confirmation_for(&submission()).await;
        assert!(matches!(result, Err(DispatchError::Email(_))));
    }
}
