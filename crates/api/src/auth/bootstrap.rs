//! First-run admin account.

use cardintake_db::models::admin_user::CreateAdminUser;
use cardintake_db::repositories::AdminUserRepo;
use cardintake_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};

/// Credentials for the admin account created at startup when absent.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl AdminBootstrap {
    /// Read `ADMIN_BOOTSTRAP_EMAIL` and `ADMIN_BOOTSTRAP_PASSWORD`.
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_BOOTSTRAP_EMAIL")
            .ok()
            .filter(|v| !v.trim().is_empty())?;
        let password = std::env::var("ADMIN_BOOTSTRAP_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self {
            email: email.trim().to_string(),
            password,
        })
    }
}

/// Create the bootstrap admin unless an account with that email exists.
///
/// Returns whether a new account was created. An existing account's
/// password is never overwritten.
pub async fn ensure_admin(pool: &DbPool, bootstrap: &AdminBootstrap) -> AppResult<bool> {
    validate_password_strength(&bootstrap.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    if AdminUserRepo::find_by_email(pool, &bootstrap.email)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let password_hash = hash_password(&bootstrap.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = AdminUserRepo::create_if_absent(
        pool,
        &CreateAdminUser {
            email: bootstrap.email.clone(),
            password_hash,
        },
    )
    .await?;

    if created {
        tracing::info!(email = %bootstrap.email, "Bootstrap admin account created");
    }
    Ok(created)
}
