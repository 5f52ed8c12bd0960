//! Transactional email for new submissions.
//!
//! - [`delivery`] -- the [`Mailer`] seam and its SMTP implementation.
//! - [`templates`] -- the admin alert and the submitter confirmation.
//! - [`NotificationDispatcher`] -- re-fetches a stored submission and sends
//!   both emails independently, logging failures.

pub mod delivery;
pub mod dispatcher;
pub mod templates;

pub use delivery::email::{EmailConfig, EmailError, Mailer, OutgoingEmail, SmtpMailer};
pub use dispatcher::{DispatchError, NotificationDispatcher, NotificationSettings};
