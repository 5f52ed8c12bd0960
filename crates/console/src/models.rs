//! Wire types as the console receives them from the API.

use cardintake_core::submission::{ShippingAddress, SubmissionStatus};
use cardintake_core::types::{DbId, Timestamp};
use cardintake_core::upload::{format_file_size, FileKind};
use serde::{Deserialize, Serialize};

/// One attachment of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: DbId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: i64,
    pub file_url: String,
    pub created_at: Timestamp,
}

impl FileRecord {
    pub fn kind(&self) -> FileKind {
        FileKind::from_mime(&self.file_type)
    }

    pub fn size_label(&self) -> String {
        format_file_size(u64::try_from(self.file_size).unwrap_or_default())
    }
}

/// A submission joined with its files, as listed by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
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
    pub status: SubmissionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub submission_files: Vec<FileRecord>,
}

impl SubmissionRecord {
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

/// The signed-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: DbId,
    pub email: String,
}

/// An attachment the server accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub url: String,
    pub size: i64,
}

/// What the intake endpoint hands back after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub files_uploaded: Vec<UploadedFile>,
}

/// `{ "data": T }` envelope used by the admin API.
#[derive(Debug, Deserialize)]
pub(crate) struct Data<T> {
    pub data: T,
}
