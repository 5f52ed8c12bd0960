//! Handler for the public intake endpoint.
//!
//! A submission row is committed first; attachments are then uploaded and
//! recorded one at a time. A failed attachment is logged and skipped, never
//! rolled back into the submission.

use std::collections::HashMap;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use cardintake_core::price_range::validate_price_range;
use cardintake_core::submission::{normalize_optional, validate_required, DEFAULT_COUNTRY};
use cardintake_core::types::DbId;
use cardintake_core::upload::{object_key, DEFAULT_MIME_TYPE};
use cardintake_db::models::submission::CreateSubmission;
use cardintake_db::models::submission_file::CreateSubmissionFile;
use cardintake_db::repositories::{SubmissionFileRepo, SubmissionRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying attachments.
const FILES_FIELD: &str = "files";

/// Required multipart fields, by wire name.
const REQUIRED_FIELDS: [&str; 7] = [
    "name",
    "email",
    "description",
    "address",
    "city",
    "state",
    "zipCode",
];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One attachment part, buffered.
#[derive(Debug)]
struct IncomingFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Parsed multipart body.
#[derive(Debug, Default)]
struct IntakeForm {
    fields: HashMap<String, String>,
    files: Vec<IncomingFile>,
}

impl IntakeForm {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        normalize_optional(self.fields.remove(name))
    }
}

/// An attachment that made it into storage and the database.
#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub url: String,
    pub size: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub files_uploaded: Vec<UploadedFile>,
}

/// Body of a successful `POST /api/submissions`.
#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub success: bool,
    pub submission: SubmissionReceipt,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/submissions
///
/// Validate, persist and acknowledge a new submission, then hand it to the
/// notification dispatcher in the background.
pub async fn create_submission(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<IntakeResponse>> {
    let mut form = read_form(multipart?).await?;

    let required: Vec<(&str, Option<&str>)> = REQUIRED_FIELDS
        .iter()
        .map(|name| (*name, form.get(name)))
        .collect();
    validate_required(&required)?;

    let price_range = form.take("priceRange");
    if let Some(value) = &price_range {
        validate_price_range(value)?;
    }

    let input = CreateSubmission {
        name: form.take("name").unwrap_or_default(),
        email: form.take("email").unwrap_or_default(),
        phone: form.take("phone"),
        description: form.take("description").unwrap_or_default(),
        address: form.take("address"),
        city: form.take("city"),
        state: form.take("state"),
        zip_code: form.take("zipCode"),
        country: form
            .take("country")
            .or_else(|| Some(DEFAULT_COUNTRY.to_string())),
        price_range,
    };

    let submission = SubmissionRepo::create(&state.pool, &input).await?;
    tracing::info!(
        submission_id = %submission.id,
        files = form.files.len(),
        "Submission created"
    );

    let mut files_uploaded = Vec::with_capacity(form.files.len());
    for file in form.files {
        if let Some(uploaded) = store_file(&state, submission.id, file).await {
            files_uploaded.push(uploaded);
        }
    }

    match &state.dispatcher {
        Some(dispatcher) => {
            dispatcher.spawn_dispatch(submission.id);
        }
        None => tracing::debug!(
            submission_id = %submission.id,
            "Email delivery not configured, skipping notifications"
        ),
    }

    Ok(Json(IntakeResponse {
        success: true,
        submission: SubmissionReceipt {
            id: submission.id,
            name: submission.name,
            email: submission.email,
            files_uploaded,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drain the multipart stream into text fields and buffered attachments.
///
/// Empty attachment parts (a file input left blank) are dropped here.
async fn read_form(mut multipart: Multipart) -> AppResult<IntakeForm> {
    let mut form = IntakeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == FILES_FIELD || field.file_name().is_some() {
            let name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_MIME_TYPE)
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;

            if bytes.is_empty() {
                continue;
            }
            form.files.push(IncomingFile {
                name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.fields.insert(field_name, value);
        }
    }

    Ok(form)
}

/// Upload one attachment and record it. Failures are logged and yield `None`.
async fn store_file(
    state: &AppState,
    submission_id: DbId,
    file: IncomingFile,
) -> Option<UploadedFile> {
    let key = object_key(
        submission_id,
        chrono::Utc::now().timestamp_millis(),
        &file.name,
    );
    let size = file.bytes.len() as i64;

    if let Err(e) = state
        .object_store
        .put(&key, file.bytes, &file.content_type)
        .await
    {
        tracing::warn!(
            submission_id = %submission_id,
            file_name = %file.name,
            error = %e,
            "File upload failed, skipping"
        );
        return None;
    }

    let url = state.object_store.public_url(&key);
    let record = CreateSubmissionFile {
        submission_id,
        file_name: file.name.clone(),
        file_type: file.content_type,
        file_size: size,
        file_url: url.clone(),
    };

    match SubmissionFileRepo::create(&state.pool, &record).await {
        Ok(_) => Some(UploadedFile {
            name: file.name,
            url,
            size,
        }),
        Err(e) => {
            tracing::warn!(
                submission_id = %submission_id,
                file_name = %file.name,
                error = %e,
                "Failed to record uploaded file, skipping"
            );
            None
        }
    }
}
