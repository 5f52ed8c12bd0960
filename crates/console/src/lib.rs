//! Client-side layer for the public form and the admin dashboard.
//!
//! Each screen is a plain state machine driven by async calls to a gateway
//! trait, so the logic runs the same against the HTTP server or an
//! in-memory fake:
//!
//! - [`form::SubmissionForm`] -- the public intake form.
//! - [`guard::SessionGuard`] -- gates the dashboard behind admin sign-in.
//! - [`dashboard::Dashboard`] -- list/detail review of submissions.
//!
//! The `Http*` types implement the gateways against the API server.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod gateway;
pub mod guard;
pub mod identity;
pub mod models;

pub use client::ApiClient;
pub use error::ConsoleError;
