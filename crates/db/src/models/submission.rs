//! Submission entity model and DTOs.

use cardintake_core::submission::{ShippingAddress, SubmissionStatus};
use cardintake_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::submission_file::SubmissionFile;

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub price_range: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: SubmissionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Submission {
    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            street: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            country: self.country.clone(),
        }
    }
}

/// A submission joined with its attachments, as the dashboard and the
/// notification templates consume it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionWithFiles {
    #[serde(flatten)]
    pub submission: Submission,
    pub submission_files: Vec<SubmissionFile>,
}

/// DTO for inserting a new submission. Status always starts as `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub description: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub price_range: Option<String>,
}

/// DTO for the dashboard's status selector.
#[derive(Debug, Deserialize)]
pub struct UpdateSubmissionStatus {
    pub status: String,
}

/// Query parameters for listing submissions.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    pub status: Option<String>,
}

/// Number of submissions currently in one status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCount {
    #[sqlx(try_from = "String")]
    pub status: SubmissionStatus,
    pub count: i64,
}
