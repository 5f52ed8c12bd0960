//! Repository for the `submission_files` table.

use cardintake_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission_file::{CreateSubmissionFile, SubmissionFile};

const COLUMNS: &str =
    "id, submission_id, file_name, file_type, file_size, file_url, created_at";

/// Insert and read attachment rows. Rows are immutable.
pub struct SubmissionFileRepo;

impl SubmissionFileRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmissionFile,
    ) -> Result<SubmissionFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO submission_files \
                (submission_id, file_name, file_type, file_size, file_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SubmissionFile>(&query)
            .bind(input.submission_id)
            .bind(&input.file_name)
            .bind(&input.file_type)
            .bind(input.file_size)
            .bind(&input.file_url)
            .fetch_one(pool)
            .await
    }

    /// Files for one submission in upload order.
    pub async fn list_by_submission(
        pool: &PgPool,
        submission_id: DbId,
    ) -> Result<Vec<SubmissionFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submission_files \
             WHERE submission_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, SubmissionFile>(&query)
            .bind(submission_id)
            .fetch_all(pool)
            .await
    }

    /// Files for a batch of submissions in upload order.
    pub async fn list_by_submissions(
        pool: &PgPool,
        submission_ids: &[DbId],
    ) -> Result<Vec<SubmissionFile>, sqlx::Error> {
        if submission_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {COLUMNS} FROM submission_files \
             WHERE submission_id = ANY($1) ORDER BY created_at, id"
        );
        sqlx::query_as::<_, SubmissionFile>(&query)
            .bind(submission_ids)
            .fetch_all(pool)
            .await
    }
}
