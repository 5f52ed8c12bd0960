//! Handlers for the `/auth` resource (login, logout, session).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cardintake_core::error::CoreError;
use cardintake_core::types::DbId;
use cardintake_db::repositories::AdminUserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Shown for both unknown emails and wrong passwords.
const INVALID_CREDENTIALS: &str = "Invalid login credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public admin info; never carries the password hash.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: DbId,
    pub email: String,
}

/// Successful sign-in.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionUser,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with email + password and return an access token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let user = AdminUserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(admin_id = %user.id, "Rejected admin sign-in");
        return Err(invalid());
    }

    let access_token = generate_access_token(user.id, &user.email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(admin_id = %user.id, "Admin signed in");

    Ok(Json(LoginResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: SessionUser {
            id: user.id,
            email: user.email,
        },
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; this only confirms the caller held a valid one.
/// Returns 204 No Content.
pub async fn logout(admin: AuthUser) -> StatusCode {
    tracing::info!(admin_id = %admin.user_id, token_id = %admin.token_id, "Admin signed out");
    StatusCode::NO_CONTENT
}

/// GET /api/auth/session
///
/// Return the admin the bearer token belongs to.
pub async fn session(
    State(state): State<AppState>,
    admin: AuthUser,
) -> AppResult<Json<DataResponse<SessionUser>>> {
    let user = AdminUserRepo::find_by_id(&state.pool, admin.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    Ok(Json(DataResponse {
        data: SessionUser {
            id: user.id,
            email: user.email,
        },
    }))
}
