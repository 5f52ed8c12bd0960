//! Submission attachment model.

use cardintake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `submission_files` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SubmissionFile {
    pub id: DbId,
    pub submission_id: DbId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub file_url: String,
    pub created_at: Timestamp,
}

/// DTO for recording an uploaded attachment.
#[derive(Debug, Clone)]
pub struct CreateSubmissionFile {
    pub submission_id: DbId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub file_url: String,
}
