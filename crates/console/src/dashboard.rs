//! Admin dashboard.
//!
//! Two views over one list of submissions: the list (with per-status
//! counts) and the detail of the selected row. Both read the same records,
//! so a status change shows up in both at once.
//!
//! Status changes are written optimistically and rolled back if the server
//! refuses them. Any failure to load the list replaces the page with an
//! error and a retry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cardintake_core::submission::{AddressField, SubmissionStatus};
use cardintake_core::types::{DbId, Timestamp};
use cardintake_core::upload::FileKind;
use tokio::time::Instant;

use crate::error::ConsoleError;
use crate::gateway::DashboardGateway;
use crate::identity::SessionContext;
use crate::models::SubmissionRecord;

/// How long the "copied" acknowledgment stays visible.
pub const COPY_ACK: Duration = Duration::from_secs(2);

/// Clipboard the "copy address" action writes to.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ConsoleError>;
}

/// Load state of the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Full-page error; only [`Dashboard::reload`] leaves it.
    Failed(String),
}

/// Totals shown above the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub reviewed: usize,
    pub contacted: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn get(&self, status: SubmissionStatus) -> usize {
        match status {
            SubmissionStatus::Pending => self.pending,
            SubmissionStatus::Reviewed => self.reviewed,
            SubmissionStatus::Contacted => self.contacted,
            SubmissionStatus::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.reviewed + self.contacted + self.completed
    }
}

/// One row of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address_complete: bool,
    pub file_count: usize,
    pub status: SubmissionStatus,
    pub badge_class: &'static str,
    pub submitted_at: Timestamp,
}

/// One tile of the detail view's file gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTile {
    pub name: String,
    pub url: String,
    pub kind: FileKind,
    pub size: String,
}

/// Shipping block of the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressView {
    /// Ready to print, one line per entry.
    Complete(Vec<String>),
    /// Labels of the fields still missing.
    Incomplete(Vec<&'static str>),
}

/// The selected submission, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: String,
    pub address: AddressView,
    pub files: Vec<FileTile>,
    pub status: SubmissionStatus,
    pub status_label: &'static str,
    pub badge_class: &'static str,
    /// Copy-address and the shipping-label button are offered.
    pub label_ready: bool,
    /// The "copied" acknowledgment is showing.
    pub copied: bool,
}

/// What the page shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardView {
    Loading,
    Error(String),
    List {
        counts: StatusCounts,
        rows: Vec<ListRow>,
    },
    Detail(DetailView),
}

pub struct Dashboard<G: DashboardGateway + ?Sized, C: Clipboard + ?Sized> {
    gateway: Arc<G>,
    clipboard: Arc<C>,
    load: LoadState,
    submissions: Vec<SubmissionRecord>,
    selected: Option<DbId>,
    status_error: Option<String>,
    copied_at: Option<Instant>,
}

impl<G: DashboardGateway + ?Sized, C: Clipboard + ?Sized> Dashboard<G, C> {
    pub fn new(gateway: Arc<G>, clipboard: Arc<C>) -> Self {
        Self {
            gateway,
            clipboard,
            load: LoadState::Loading,
            submissions: Vec::new(),
            selected: None,
            status_error: None,
            copied_at: None,
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn submissions(&self) -> &[SubmissionRecord] {
        &self.submissions
    }

    /// Message from the last status change the server refused.
    pub fn status_error(&self) -> Option<&str> {
        self.status_error.as_deref()
    }

    /// Fetch every submission with its files.
    pub async fn load(&mut self, session: &SessionContext) {
        self.load = LoadState::Loading;
        match self.gateway.list_submissions(session).await {
            Ok(submissions) => {
                self.submissions = submissions;
                self.load = LoadState::Ready;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load submissions");
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Start over as if the page had been opened fresh.
    pub async fn reload(&mut self, session: &SessionContext) {
        self.submissions.clear();
        self.selected = None;
        self.status_error = None;
        self.copied_at = None;
        self.load(session).await;
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for s in &self.submissions {
            match s.status {
                SubmissionStatus::Pending => counts.pending += 1,
                SubmissionStatus::Reviewed => counts.reviewed += 1,
                SubmissionStatus::Contacted => counts.contacted += 1,
                SubmissionStatus::Completed => counts.completed += 1,
            }
        }
        counts
    }

    /// Open the detail view for a loaded submission.
    pub fn select(&mut self, id: DbId) -> Result<(), ConsoleError> {
        if !self.submissions.iter().any(|s| s.id == id) {
            return Err(ConsoleError::UnknownSubmission);
        }
        self.selected = Some(id);
        self.status_error = None;
        self.copied_at = None;
        Ok(())
    }

    /// Back to the list.
    pub fn back(&mut self) {
        self.selected = None;
        self.status_error = None;
        self.copied_at = None;
    }

    fn find_mut(&mut self, id: DbId) -> Option<&mut SubmissionRecord> {
        self.submissions.iter_mut().find(|s| s.id == id)
    }

    fn selected_record(&self) -> Option<&SubmissionRecord> {
        let id = self.selected?;
        self.submissions.iter().find(|s| s.id == id)
    }

    /// Set a status locally, persist it, and roll back if persisting fails.
    pub async fn change_status(
        &mut self,
        session: &SessionContext,
        id: DbId,
        status: SubmissionStatus,
    ) -> Result<(), ConsoleError> {
        let record = self.find_mut(id).ok_or(ConsoleError::UnknownSubmission)?;
        let previous = record.status;
        record.status = status;
        self.status_error = None;

        if let Err(e) = self.gateway.update_status(session, id, status).await {
            tracing::warn!(submission_id = %id, error = %e, "Status update failed, rolling back");
            if let Some(record) = self.find_mut(id) {
                record.status = previous;
            }
            self.status_error = Some(e.to_string());
            return Err(e);
        }

        tracing::info!(submission_id = %id, %status, "Status updated");
        Ok(())
    }

    /// Copy the selected submission's shipping label text.
    ///
    /// Only offered when the address is complete.
    pub async fn copy_address(&mut self) -> Result<(), ConsoleError> {
        let record = self.selected_record().ok_or(ConsoleError::UnknownSubmission)?;
        let text = record
            .shipping_address()
            .label_text(&record.name)
            .ok_or_else(|| ConsoleError::Validation("Shipping address is incomplete".into()))?;

        self.clipboard.write_text(&text).await?;
        self.copied_at = Some(Instant::now());
        Ok(())
    }

    fn copied(&self) -> bool {
        self.copied_at.is_some_and(|at| at.elapsed() < COPY_ACK)
    }

    pub fn view(&self) -> DashboardView {
        match &self.load {
            LoadState::Loading => return DashboardView::Loading,
            LoadState::Failed(message) => return DashboardView::Error(message.clone()),
            LoadState::Ready => {}
        }

        match self.selected_record() {
            Some(record) => DashboardView::Detail(self.detail(record)),
            None => DashboardView::List {
                counts: self.counts(),
                rows: self.submissions.iter().map(list_row).collect(),
            },
        }
    }

    fn detail(&self, record: &SubmissionRecord) -> DetailView {
        let address = record.shipping_address();
        let label_ready = address.is_complete();
        let address_view = if label_ready {
            let lines = address
                .label_text(&record.name)
                .map(|text| text.lines().skip(1).map(str::to_string).collect())
                .unwrap_or_default();
            AddressView::Complete(lines)
        } else {
            AddressView::Incomplete(
                address
                    .missing_fields()
                    .into_iter()
                    .map(AddressField::label)
                    .collect(),
            )
        };

        DetailView {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            description: record.description.clone(),
            address: address_view,
            files: record
                .submission_files
                .iter()
                .map(|f| FileTile {
                    name: f.file_name.clone(),
                    url: f.file_url.clone(),
                    kind: f.kind(),
                    size: f.size_label(),
                })
                .collect(),
            status: record.status,
            status_label: record.status.label(),
            badge_class: record.status.badge_class(),
            label_ready,
            copied: label_ready && self.copied(),
        }
    }
}

fn list_row(record: &SubmissionRecord) -> ListRow {
    ListRow {
        id: record.id,
        name: record.name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        address_complete: record.shipping_address().is_complete(),
        file_count: record.submission_files.len(),
        status: record.status,
        badge_class: record.status.badge_class(),
        submitted_at: record.created_at,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::models::{FileRecord, SessionUser};

    #[derive(Default)]
    struct FakeGateway {
        submissions: Mutex<Vec<SubmissionRecord>>,
        fail_list: AtomicBool,
        fail_update: AtomicBool,
    }

    #[async_trait]
    impl DashboardGateway for FakeGateway {
        async fn list_submissions(
            &self,
            _session: &SessionContext,
        ) -> Result<Vec<SubmissionRecord>, ConsoleError> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ConsoleError::Api {
                    status: 500,
                    message: "An internal error occurred".into(),
                });
            }
            Ok(self.submissions.lock().unwrap().clone())
        }

        async fn update_status(
            &self,
            _session: &SessionContext,
            id: DbId,
            status: SubmissionStatus,
        ) -> Result<(), ConsoleError> {
            if self.fail_update.load(Ordering::SeqCst) {
                return Err(ConsoleError::Api {
                    status: 500,
                    message: "An internal error occurred".into(),
                });
            }
            if let Some(s) = self
                .submissions
                .lock()
                .unwrap()
                .iter_mut()
                .find(|s| s.id == id)
            {
                s.status = status;
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeClipboard {
        written: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Clipboard for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), ConsoleError> {
            self.written.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn session() -> SessionContext {
        SessionContext {
            user: SessionUser {
                id: Uuid::nil(),
                email: "staff@cards.test".into(),
            },
            access_token: "token".into(),
        }
    }

    fn record(name: &str, complete: bool) -> SubmissionRecord {
        let id = Uuid::new_v4();
        let at = chrono::Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, 0).unwrap();
        SubmissionRecord {
            id,
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: None,
            description: "Cards".into(),
            address: Some("1 Main St".into()),
            city: Some("Cerulean".into()),
            state: Some("WA".into()),
            zip_code: complete.then(|| "98001".to_string()),
            country: Some("United States".into()),
            price_range: None,
            status: SubmissionStatus::Pending,
            created_at: at,
            updated_at: at,
            submission_files: vec![FileRecord {
                id: Uuid::new_v4(),
                file_name: "front.jpg".into(),
                file_type: "image/jpeg".into(),
                file_size: 1536,
                file_url: "https://cdn.test/front.jpg".into(),
                created_at: at,
            }],
        }
    }

    type TestDashboard = Dashboard<FakeGateway, FakeClipboard>;

    async fn loaded(
        records: Vec<SubmissionRecord>,
    ) -> (TestDashboard, Arc<FakeGateway>, Arc<FakeClipboard>) {
        let gateway = Arc::new(FakeGateway {
            submissions: Mutex::new(records),
            ..Default::default()
        });
        let clipboard = Arc::new(FakeClipboard::default());
        let mut dashboard = Dashboard::new(gateway.clone(), clipboard.clone());
        dashboard.load(&session()).await;
        (dashboard, gateway, clipboard)
    }

    #[tokio::test]
    async fn list_view_shows_rows_and_counts() {
        let (dashboard, _, _) = loaded(vec![record("Misty", true), record("Brock", false)]).await;

        let DashboardView::List { counts, rows } = dashboard.view() else {
            panic!("expected list view");
        };
        assert_eq!(counts.pending, 2);
        assert_eq!(counts.total(), 2);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].address_complete);
        assert!(!rows[1].address_complete);
        assert_eq!(rows[0].file_count, 1);
    }

    #[tokio::test]
    async fn status_change_updates_detail_and_list_without_reload() {
        let misty = record("Misty", true);
        let id = misty.id;
        let (mut dashboard, gateway, _) = loaded(vec![misty, record("Brock", true)]).await;

        dashboard.select(id).unwrap();
        dashboard
            .change_status(&session(), id, SubmissionStatus::Contacted)
            .await
            .unwrap();

        let DashboardView::Detail(detail) = dashboard.view() else {
            panic!("expected detail view");
        };
        assert_eq!(detail.status, SubmissionStatus::Contacted);
        assert_eq!(detail.badge_class, SubmissionStatus::Contacted.badge_class());

        dashboard.back();
        let DashboardView::List { counts, rows } = dashboard.view() else {
            panic!("expected list view");
        };
        assert_eq!(rows.iter().find(|r| r.id == id).unwrap().status, SubmissionStatus::Contacted);
        assert_eq!(counts.contacted, 1);
        assert_eq!(counts.pending, 1);

        let stored = gateway.submissions.lock().unwrap();
        assert_eq!(stored.iter().find(|s| s.id == id).unwrap().status, SubmissionStatus::Contacted);
    }

    #[tokio::test]
    async fn failed_status_change_rolls_back() {
        let misty = record("Misty", true);
        let id = misty.id;
        let (mut dashboard, gateway, _) = loaded(vec![misty]).await;
        gateway.fail_update.store(true, Ordering::SeqCst);
        dashboard.select(id).unwrap();

        let result = dashboard
            .change_status(&session(), id, SubmissionStatus::Completed)
            .await;

        assert_matches!(result, Err(ConsoleError::Api { .. }));
        assert_eq!(dashboard.status_error(), Some("An internal error occurred"));
        let DashboardView::Detail(detail) = dashboard.view() else {
            panic!("expected detail view");
        };
        assert_eq!(detail.status, SubmissionStatus::Pending);
        assert_eq!(dashboard.counts().pending, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn copy_address_writes_label_and_acknowledges_briefly() {
        let misty = record("Misty", true);
        let id = misty.id;
        let (mut dashboard, _, clipboard) = loaded(vec![misty]).await;
        dashboard.select(id).unwrap();

        dashboard.copy_address().await.unwrap();

        assert_eq!(
            clipboard.written.lock().unwrap()[0],
            "Misty\n1 Main St\nCerulean, WA 98001\nUnited States"
        );
        assert_matches!(dashboard.view(), DashboardView::Detail(d) if d.copied);

        tokio::time::advance(COPY_ACK + Duration::from_millis(1)).await;
        assert_matches!(dashboard.view(), DashboardView::Detail(d) if !d.copied);
    }

    #[tokio::test]
    async fn incomplete_address_lists_missing_fields_and_blocks_copy() {
        let brock = record("Brock", false);
        let id = brock.id;
        let (mut dashboard, _, clipboard) = loaded(vec![brock]).await;
        dashboard.select(id).unwrap();

        let DashboardView::Detail(detail) = dashboard.view() else {
            panic!("expected detail view");
        };
        assert!(!detail.label_ready);
        assert_eq!(detail.address, AddressView::Incomplete(vec!["ZIP code"]));
        assert_eq!(detail.files[0].kind, FileKind::Image);
        assert_eq!(detail.files[0].size, "1.5 KB");

        assert_matches!(dashboard.copy_address().await, Err(ConsoleError::Validation(_)));
        assert!(clipboard.written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_failure_shows_error_until_reload() {
        let gateway = Arc::new(FakeGateway {
            submissions: Mutex::new(vec![record("Misty", true)]),
            fail_list: AtomicBool::new(true),
            ..Default::default()
        });
        let mut dashboard = Dashboard::new(gateway.clone(), Arc::new(FakeClipboard::default()));

        dashboard.load(&session()).await;
        assert_eq!(
            dashboard.view(),
            DashboardView::Error("An internal error occurred".into())
        );

        gateway.fail_list.store(false, Ordering::SeqCst);
        dashboard.reload(&session()).await;
        assert_matches!(dashboard.view(), DashboardView::List { rows, .. } if rows.len() == 1);
    }

    #[test]
    fn selecting_unknown_submission_is_an_error() {
        let mut dashboard = Dashboard::new(
            Arc::new(FakeGateway::default()),
            Arc::new(FakeClipboard::default()),
        );
        assert_matches!(dashboard.select(Uuid::new_v4()), Err(ConsoleError::UnknownSubmission));
    }
}
