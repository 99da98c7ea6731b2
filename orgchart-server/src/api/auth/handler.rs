//! Authentication Handlers
//!
//! Handles registration, login, logout and the current-user lookup

use std::time::Duration;

use axum::{Extension, Json, extract::State};

use crate::api::{ApiJson, ValidatedJson};
use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::user::{self, NewUser};
use crate::security_log;
use crate::utils::{AppError, AppResult, ErrorCode};

use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Register a new (non-admin) account
pub async fn register(
    State(state): State<ServerState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<UserInfo>> {
    if req.password != req.password_confirm {
        return Err(AppError::new(ErrorCode::PasswordMismatch)
            .with_detail("password_confirm", "Passwords do not match"));
    }

    let hash_pass = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

    let created = user::create(
        &state.pool,
        NewUser {
            username: &req.username,
            email: &req.email,
            hash_pass: &hash_pass,
            is_admin: false,
        },
    )
    .await?;

    tracing::info!(user_id = created.id, username = %created.username, "User registered");
    Ok(Json(created.into()))
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = user::find_by_username(&state.pool, &req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message to prevent username enumeration
    let account = match found {
        Some(u) if verify_password(&req.password, &u.hash_pass) => u,
        Some(_) => {
            security_log!("WARN", "login_failed", username = req.username.clone(), reason = "invalid_password");
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", username = req.username.clone(), reason = "user_not_found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        security_log!("WARN", "login_disabled", username = account.username.clone());
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(account.id, &account.username, account.is_admin)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        is_admin = account.is_admin,
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        expires_in: jwt_service.expires_in_seconds(),
        user: account.into(),
    }))
}

/// Get current user info (fresh from the database)
pub async fn me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(AppError::not_authenticated)?;
    Ok(Json(account.into()))
}

/// Logout handler
///
/// Revokes the presented token until it would have expired anyway
pub async fn logout(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<bool>> {
    state.revoked_tokens.revoke(current.jti.clone(), current.exp);
    security_log!("INFO", "logout", user_id = current.id, username = current.username.clone());
    Ok(Json(true))
}
