//! Email bodies for new submissions.
//!
//! Each template renders a plain-text part and an HTML part from the same
//! data. Every piece of submitter-provided text is HTML-escaped before it
//! lands in the HTML part.

use cardintake_core::price_range::price_range_label;
use cardintake_core::types::Timestamp;
use cardintake_core::upload::format_file_size;
use cardintake_db::models::submission::SubmissionWithFiles;

/// Subject, text and HTML for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn format_timestamp(ts: &Timestamp) -> String {
    ts.format("%b %-d, %Y %H:%M UTC").to_string()
}

/// First eight characters of the id, quoted to submitters as a reference.
pub fn short_reference(submission: &SubmissionWithFiles) -> String {
    submission.submission.id.to_string().chars().take(8).collect()
}

/// `• name (size)` lines, or a placeholder when nothing was uploaded.
fn file_lines(submission: &SubmissionWithFiles) -> Vec<String> {
    submission
        .submission_files
        .iter()
        .map(|f| {
            format!(
                "• {} ({})",
                f.file_name,
                format_file_size(u64::try_from(f.file_size).unwrap_or_default())
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Admin alert
// ---------------------------------------------------------------------------

/// Internal alert listing contact info, address, description and files.
pub fn render_admin_alert(submission: &SubmissionWithFiles, site_url: &str) -> RenderedEmail {
    let s = &submission.submission;
    let address = s.shipping_address().one_line();
    let price = price_range_label(s.price_range.as_deref());
    let submitted = format_timestamp(&s.created_at);
    let dashboard_url = format!("{}/admin", site_url.trim_end_matches('/'));
    let files = file_lines(submission);
    let file_count = files.len();

    let files_text = if files.is_empty() {
        "No files uploaded".to_string()
    } else {
        files.join("\n")
    };

    let mut text = String::new();
    text.push_str("New card collection submission\n\n");
    text.push_str(&format!("Name: {}\n", s.name));
    text.push_str(&format!("Email: {}\n", s.email));
    if let Some(phone) = &s.phone {
        text.push_str(&format!("Phone: {phone}\n"));
    }
    text.push_str(&format!("Submitted: {submitted}\n\n"));
    text.push_str(&format!("Shipping address: {address}\n"));
    text.push_str(&format!("Expected price range: {price}\n\n"));
    text.push_str(&format!("Description:\n{}\n\n", s.description));
    text.push_str(&format!("Uploaded files ({file_count}):\n{files_text}\n\n"));
    text.push_str(&format!("View in admin dashboard: {dashboard_url}\n"));
    text.push_str(&format!("Submission ID: {}\n", s.id));

    let phone_row = s
        .phone
        .as_deref()
        .map(|p| {
            format!(
                "<tr><td><strong>Phone:</strong></td><td><a href=\"tel:{0}\">{0}</a></td></tr>",
                escape_html(p)
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="font-size: 22px;">New Card Collection Submission</h1>
  <h2 style="font-size: 18px;">Contact Information</h2>
  <table>
    <tr><td><strong>Name:</strong></td><td>{name}</td></tr>
    <tr><td><strong>Email:</strong></td><td><a href="mailto:{email}">{email}</a></td></tr>
    {phone_row}
    <tr><td><strong>Submitted:</strong></td><td>{submitted}</td></tr>
  </table>
  <h2 style="font-size: 18px;">Shipping Address</h2>
  <p>{address}</p>
  <h2 style="font-size: 18px;">Collection Details</h2>
  <p><strong>Expected Price Range:</strong> {price}</p>
  <p style="white-space: pre-wrap;">{description}</p>
  <h2 style="font-size: 18px;">Uploaded Files ({file_count})</h2>
  <pre style="font-family: Arial, sans-serif; white-space: pre-wrap;">{files}</pre>
  <p><a href="{dashboard_url}">View in Admin Dashboard</a></p>
  <p style="color: #718096; font-size: 14px;">Submission ID: {id}</p>
</div>"#,
        name = escape_html(&s.name),
        email = escape_html(&s.email),
        phone_row = phone_row,
        submitted = submitted,
        address = escape_html(&address),
        price = escape_html(price),
        description = escape_html(&s.description),
        file_count = file_count,
        files = escape_html(&files_text),
        dashboard_url = escape_html(&dashboard_url),
        id = s.id,
    );

    RenderedEmail {
        subject: format!("New card collection submission from {}", s.name),
        text,
        html,
    }
}

// ---------------------------------------------------------------------------
// Submitter confirmation
// ---------------------------------------------------------------------------

const NEXT_STEPS: [&str; 4] = [
    "Our team will review your collection photos and videos",
    "We'll assess the value and condition of your cards",
    "We'll contact you with an offer within 24-48 hours",
    "If you accept, we'll arrange secure shipping and payment",
];

const IMPORTANT_NOTES: [&str; 3] = [
    "Please keep your cards in a safe place until we contact you",
    "Don't send your cards until we've agreed on terms",
    "If you have any questions, reply to this email",
];

/// User-facing acknowledgment of receipt.
pub fn render_confirmation(submission: &SubmissionWithFiles, contact_email: &str) -> RenderedEmail {
    let s = &submission.submission;
    let reference = short_reference(submission);
    let submitted = format_timestamp(&s.created_at);
    let file_count = submission.submission_files.len();

    let numbered = |items: &[&str]| -> String {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let bulleted = |items: &[&str]| -> String {
        items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let list_items = |items: &[&str]| -> String {
        items
            .iter()
            .map(|item| format!("<li>{}</li>", escape_html(item)))
            .collect::<String>()
    };

    let text = format!(
        "Hi {name},\n\n\
         We've received your card collection submission. Our team will review it \
         and get back to you within 24-48 hours.\n\n\
         Reference: {reference}\n\
         Submitted: {submitted}\n\
         Files uploaded: {file_count}\n\n\
         What happens next?\n{steps}\n\n\
         Important notes:\n{notes}\n\n\
         Questions? Contact us at {contact}\n",
        name = s.name,
        steps = numbered(&NEXT_STEPS[..]),
        notes = bulleted(&IMPORTANT_NOTES[..]),
        contact = contact_email,
    );

    let html = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1 style="font-size: 22px;">Submission Received!</h1>
  <p>Hi {name},</p>
  <p>We've received your card collection submission. Our team will review it and get back to you within 24-48 hours.</p>
  <table>
    <tr><td><strong>Reference:</strong></td><td style="font-family: monospace;">{reference}</td></tr>
    <tr><td><strong>Submitted:</strong></td><td>{submitted}</td></tr>
    <tr><td><strong>Files Uploaded:</strong></td><td>{file_count} files</td></tr>
  </table>
  <h2 style="font-size: 18px;">What happens next?</h2>
  <ol>{steps}</ol>
  <h2 style="font-size: 18px;">Important Notes</h2>
  <ul>{notes}</ul>
  <p>Questions? Contact us at <a href="mailto:{contact}">{contact}</a></p>
</div>"#,
        name = escape_html(&s.name),
        reference = reference,
        submitted = submitted,
        file_count = file_count,
        steps = list_items(&NEXT_STEPS[..]),
        notes = list_items(&IMPORTANT_NOTES[..]),
        contact = escape_html(contact_email),
    );

    RenderedEmail {
        subject: "We received your card collection submission".to_string(),
        text,
        html,
    }
}
