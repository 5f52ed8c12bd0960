//! Authentication primitives for the admin dashboard.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token generation and validation.
//! - [`bootstrap`] -- create the first admin account from the environment.

pub mod bootstrap;
pub mod jwt;
pub mod password;
