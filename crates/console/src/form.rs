//! The public submission form.
//!
//! Holds what the seller typed and the files they picked. Files are checked
//! against the upload rules as they are added; a rejected file gets a
//! message and never joins the list. A successful submit clears the form,
//! a failed one keeps everything so the seller can retry.

use async_trait::async_trait;
use cardintake_core::submission::{validate_required, DEFAULT_COUNTRY};
use cardintake_core::upload::validate_file;
use reqwest::multipart::{Form, Part};

use crate::client::ApiClient;
use crate::error::ConsoleError;
use crate::models::SubmissionReceipt;

/// A file picked by the seller, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Text inputs of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    /// One of the price range values, or empty for "not chosen".
    pub price_range: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            description: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            price_range: String::new(),
        }
    }
}

impl FormFields {
    /// `(wire name, value)` for every text field, in form order.
    fn wire_fields(&self) -> [(&'static str, &str); 10] {
        [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("description", self.description.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("state", self.state.as_str()),
            ("zipCode", self.zip_code.as_str()),
            ("country", self.country.as_str()),
            ("priceRange", self.price_range.as_str()),
        ]
    }

    /// Same check the server applies, so obvious gaps never leave the page.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        validate_required(&[
            ("name", Some(self.name.as_str())),
            ("email", Some(self.email.as_str())),
            ("description", Some(self.description.as_str())),
            ("address", Some(self.address.as_str())),
            ("city", Some(self.city.as_str())),
            ("state", Some(self.state.as_str())),
            ("zipCode", Some(self.zip_code.as_str())),
        ])?;
        Ok(())
    }
}

/// Everything one submit sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    /// Non-blank text fields only, keyed by wire name.
    pub fields: Vec<(&'static str, String)>,
    pub files: Vec<PendingFile>,
}

/// Where the form sends submissions.
#[async_trait]
pub trait IntakeClient: Send + Sync {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, ConsoleError>;
}

/// Posts multipart submissions to `/api/submissions`.
pub struct HttpIntakeClient {
    client: ApiClient,
}

impl HttpIntakeClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IntakeClient for HttpIntakeClient {
    async fn submit(&self, payload: SubmissionPayload) -> Result<SubmissionReceipt, ConsoleError> {
        let mut form = Form::new();
        for (name, value) in payload.fields {
            form = form.text(name, value);
        }
        for file in payload.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(&file.content_type)?;
            form = form.part("files", part);
        }

        let request = self.client.post("/api/submissions").multipart(form);
        let response: IntakeEnvelope = self.client.send_json(request).await?;
        Ok(response.submission)
    }
}

#[derive(Debug, serde::Deserialize)]
struct IntakeEnvelope {
    submission: SubmissionReceipt,
}

/// State of the public form.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub fields: FormFields,
    files: Vec<PendingFile>,
    file_errors: Vec<String>,
    submitting: bool,
    error: Option<String>,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    /// One message per file rejected since the last successful add.
    pub fn file_errors(&self) -> &[String] {
        &self.file_errors
    }

    /// Last submit failure, as the server worded it.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Add a picked file if it passes the size and type rules.
    pub fn add_file(&mut self, file: PendingFile) -> Result<(), ConsoleError> {
        if let Err(e) = validate_file(&file.name, &file.content_type, file.bytes.len() as u64) {
            let message = ConsoleError::from(e).to_string();
            self.file_errors.push(message.clone());
            return Err(ConsoleError::Validation(message));
        }
        self.file_errors.clear();
        self.files.push(file);
        Ok(())
    }

    /// Add several files; each is judged on its own.
    pub fn add_files(&mut self, files: impl IntoIterator<Item = PendingFile>) -> usize {
        self.file_errors.clear();
        let mut added = 0;
        for file in files {
            match validate_file(&file.name, &file.content_type, file.bytes.len() as u64) {
                Ok(()) => {
                    self.files.push(file);
                    added += 1;
                }
                Err(e) => self.file_errors.push(ConsoleError::from(e).to_string()),
            }
        }
        added
    }

    pub fn remove_file(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    fn payload(&self) -> SubmissionPayload {
        let fields = self
            .fields
            .wire_fields()
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| (name, value.trim().to_string()))
            .collect();
        SubmissionPayload {
            fields,
            files: self.files.clone(),
        }
    }

    /// Validate and mark the form as in flight, returning what to send.
    /// Refused while an earlier submit is still pending.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, ConsoleError> {
        if self.submitting {
            return Err(ConsoleError::Validation("Submission already in progress".into()));
        }
        if let Err(e) = self.fields.validate() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.submitting = true;
        self.error = None;
        Ok(self.payload())
    }

    /// Settle a submit started by [`begin_submit`](Self::begin_submit). On
    /// success the form is reset.
    pub fn finish_submit(
        &mut self,
        result: Result<SubmissionReceipt, ConsoleError>,
    ) -> Result<SubmissionReceipt, ConsoleError> {
        self.submitting = false;
        match result {
            Ok(receipt) => {
                tracing::info!(submission_id = %receipt.id, "Submission accepted");
                *self = Self::default();
                Ok(receipt)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Send the form. On success the form is reset and the receipt returned.
    pub async fn submit<C: IntakeClient + ?Sized>(
        &mut self,
        client: &C,
    ) -> Result<SubmissionReceipt, ConsoleError> {
        let payload = self.begin_submit()?;
        let result = client.submit(payload).await;
        self.finish_submit(result)
    }
}
