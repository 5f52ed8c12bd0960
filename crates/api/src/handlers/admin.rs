//! Handlers for the admin dashboard's `/admin/submissions` resource.
//!
//! Every handler requires a signed-in admin via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::Json;
use cardintake_core::error::CoreError;
use cardintake_core::submission::SubmissionStatus;
use cardintake_core::types::DbId;
use cardintake_db::models::submission::{
    Submission, SubmissionListParams, SubmissionWithFiles, UpdateSubmissionStatus,
};
use cardintake_db::repositories::SubmissionRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Per-status totals for the dashboard header cards.
#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: i64,
    pub reviewed: i64,
    pub contacted: i64,
    pub completed: i64,
    pub total: i64,
}

impl StatusCounts {
    fn add(&mut self, status: SubmissionStatus, count: i64) {
        let slot = match status {
            SubmissionStatus::Pending => &mut self.pending,
            SubmissionStatus::Reviewed => &mut self.reviewed,
            SubmissionStatus::Contacted => &mut self.contacted,
            SubmissionStatus::Completed => &mut self.completed,
        };
        *slot += count;
        self.total += count;
    }
}

/// GET /api/admin/submissions?status=
///
/// All submissions with their files, newest first.
pub async fn list_submissions(
    State(state): State<AppState>,
    _admin: AuthUser,
    Query(params): Query<SubmissionListParams>,
) -> AppResult<Json<DataResponse<Vec<SubmissionWithFiles>>>> {
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<SubmissionStatus>)
        .transpose()?;

    let submissions = SubmissionRepo::list_with_files(&state.pool, status).await?;

    Ok(Json(DataResponse { data: submissions }))
}

/// GET /api/admin/submissions/{id}
pub async fn get_submission(
    State(state): State<AppState>,
    _admin: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SubmissionWithFiles>>> {
    let submission = SubmissionRepo::find_with_files(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id,
        }))?;

    Ok(Json(DataResponse { data: submission }))
}

/// PUT /api/admin/submissions/{id}/status
///
/// Last write wins; `updated_at` is bumped on every write.
pub async fn update_status(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateSubmissionStatus>,
) -> AppResult<Json<DataResponse<Submission>>> {
    let status: SubmissionStatus = input.status.parse()?;

    let submission = SubmissionRepo::update_status(&state.pool, id, status)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id,
        }))?;

    tracing::info!(
        submission_id = %id,
        status = %status,
        admin_id = %admin.user_id,
        "Submission status updated"
    );

    Ok(Json(DataResponse { data: submission }))
}

/// GET /api/admin/submissions/counts
///
/// Every status is present, zero when no submission holds it.
pub async fn status_counts(
    State(state): State<AppState>,
    _admin: AuthUser,
) -> AppResult<Json<DataResponse<StatusCounts>>> {
    let rows = SubmissionRepo::count_by_status(&state.pool).await?;

    let mut counts = StatusCounts::default();
    for row in rows {
        counts.add(row.status, row.count);
    }

    Ok(Json(DataResponse { data: counts }))
}
