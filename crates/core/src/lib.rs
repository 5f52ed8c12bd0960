//! Domain rules shared by the intake server and the console client.
//!
//! Nothing in this crate performs I/O. It owns the vocabulary of the
//! application (submission status, shipping address completeness, price
//! ranges, upload rules, object-storage key naming) so the API, the
//! notification templates and the dashboard all agree on it.

pub mod error;
pub mod price_range;
pub mod submission;
pub mod types;
pub mod upload;
