//! Repository for the `submissions` table.

use std::collections::HashMap;

use cardintake_core::submission::SubmissionStatus;
use cardintake_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission::{
    CreateSubmission, StatusCount, Submission, SubmissionWithFiles,
};
use crate::models::submission_file::SubmissionFile;
use crate::repositories::SubmissionFileRepo;

/// Column list for `submissions` queries.
const COLUMNS: &str = "\
    id, name, email, phone, description, \
    address, city, state, zip_code, country, \
    price_range, status, created_at, updated_at";

/// Provides CRUD operations for submissions. Rows are never deleted.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a new submission with status `pending`, returning the full row.
    pub async fn create(pool: &PgPool, input: &CreateSubmission) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions \
                (name, email, phone, description, \
                 address, city, state, zip_code, country, price_range, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.description)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.country)
            .bind(&input.price_range)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List submissions newest-first, optionally restricted to one status.
    pub async fn list(
        pool: &PgPool,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let where_clause = if status.is_some() {
            "WHERE status = $1"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM submissions {where_clause} ORDER BY created_at DESC, id"
        );

        let mut q = sqlx::query_as::<_, Submission>(&query);
        if let Some(s) = status {
            q = q.bind(s.as_str());
        }
        q.fetch_all(pool).await
    }

    /// Set the status and bump `updated_at`. Last write wins.
    ///
    /// Returns the updated row, or `None` if no submission has that ID.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        new_status: SubmissionStatus,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET status = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(new_status.as_str())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Count submissions per status. Statuses with no rows are absent.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM submissions GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }

    /// Fetch one submission together with its files.
    pub async fn find_with_files(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SubmissionWithFiles>, sqlx::Error> {
        let Some(submission) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let submission_files = SubmissionFileRepo::list_by_submission(pool, id).await?;
        Ok(Some(SubmissionWithFiles {
            submission,
            submission_files,
        }))
    }

    /// List submissions newest-first, each joined with its files.
    pub async fn list_with_files(
        pool: &PgPool,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<SubmissionWithFiles>, sqlx::Error> {
        let submissions = Self::list(pool, status).await?;
        let ids: Vec<DbId> = submissions.iter().map(|s| s.id).collect();

        let mut files_by_submission: HashMap<DbId, Vec<SubmissionFile>> = HashMap::new();
        for file in SubmissionFileRepo::list_by_submissions(pool, &ids).await? {
            files_by_submission
                .entry(file.submission_id)
                .or_default()
                .push(file);
        }

        Ok(submissions
            .into_iter()
            .map(|submission| SubmissionWithFiles {
                submission_files: files_by_submission
                    .remove(&submission.id)
                    .unwrap_or_default(),
                submission,
            })
            .collect())
    }
}
