//! Attachment rules: accepted media types, size ceiling, object-key naming
//! and human-readable sizes.

use crate::error::CoreError;
use crate::types::DbId;

/// Largest single attachment the intake form accepts (100 MiB).
pub const MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// MIME types the intake form accepts.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/quicktime",
];

/// Fallback MIME type for parts that arrive without one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Broad media category, used to pick a gallery icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Video,
    Other,
}

impl FileKind {
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::Other
        }
    }
}

/// Check a file against the form's size and type rules.
pub fn validate_file(name: &str, mime: &str, size: u64) -> Result<(), CoreError> {
    if size > MAX_FILE_BYTES {
        return Err(CoreError::Validation(format!(
            "File {name} is too large. Max size is 100MB."
        )));
    }
    if !ALLOWED_MIME_TYPES.contains(&mime) {
        return Err(CoreError::Validation(format!(
            "File {name} is not supported. Please use JPG, PNG, GIF, WEBP, MP4, or MOV files."
        )));
    }
    Ok(())
}

/// Make a client-supplied file name safe to embed in an object key.
///
/// Path separators and control characters become `_`; an empty result
/// becomes `file`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Object-storage key for an attachment:
/// `{submission_id}/{timestamp_millis}-{file_name}`.
pub fn object_key(submission_id: DbId, timestamp_millis: i64, file_name: &str) -> String {
    format!(
        "{submission_id}/{timestamp_millis}-{}",
        sanitize_file_name(file_name)
    )
}

/// Render a byte count with base-1024 units, at most two decimals.
///
/// `0` renders as `0 Bytes`; sizes beyond the GB range stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let rendered = rendered.trim_end_matches('0').trim_end_matches('.');
    format!("{rendered} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn accepted_media_passes() {
        assert!(validate_file("front.jpg", "image/jpeg", 1024).is_ok());
        assert!(validate_file("binder.mov", "video/quicktime", MAX_FILE_BYTES).is_ok());
    }

    #[test]
    fn oversized_file_is_rejected() {
        let err = validate_file("huge.mp4", "video/mp4", MAX_FILE_BYTES + 1).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn unsupported_type_is_rejected() {
        assert_matches!(
            validate_file("notes.pdf", "application/pdf", 10),
            Err(CoreError::Validation(msg)) if msg.contains("not supported")
        );
    }

    #[test]
    fn file_kind_follows_mime_prefix() {
        assert_eq!(FileKind::from_mime("image/png"), FileKind::Image);
        assert_eq!(FileKind::from_mime("video/mp4"), FileKind::Video);
        assert_eq!(FileKind::from_mime("text/plain"), FileKind::Other);
    }

    #[test]
    fn object_key_is_namespaced_by_submission() {
        let id = Uuid::nil();
        assert_eq!(
            object_key(id, 1_700_000_000_000, "charizard.jpg"),
            "00000000-0000-0000-0000-000000000000/1700000000000-charizard.jpg"
        );
    }

    #[test]
    fn sanitize_strips_directories_and_controls() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\cards\\a\tb.png"), "a_b.png");
        assert_eq!(sanitize_file_name("  "), "file");
        assert_eq!(sanitize_file_name(".."), "file");
    }

    #[test]
    fn file_sizes_render_like_the_dashboard() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024 * 1024), "3072 GB");
    }
}
