//! Request extractors that gate the admin API.
//!
//! - [`auth::AuthUser`] -- the signed-in admin, from a JWT Bearer token.

pub mod auth;
