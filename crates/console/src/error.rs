use cardintake_core::error::CoreError;

/// Errors surfaced by the console state machines.
///
/// `Api` displays the server's message unchanged so it can be shown to the
/// user as-is.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The server answered with an error body.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The action needs a signed-in admin.
    #[error("Not signed in")]
    NotSignedIn,

    /// No submission with that id is loaded.
    #[error("Submission not found")]
    UnknownSubmission,

    /// The clipboard refused the write.
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),
}

impl From<CoreError> for ConsoleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ConsoleError::Validation(msg),
            other => ConsoleError::Validation(other.to_string()),
        }
    }
}
