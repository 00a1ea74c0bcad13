//! Account and role management endpoints.

use axum::{extract::State, Json};

use super::{created, success, ApiResult};
use crate::auth::password;
use crate::errors::AppError;
use crate::models::{
    AdminAccount, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    RoleChangeRequest,
};
use crate::AppState;

/// POST /admins/register - Create a new account (public, non-admin until promoted).
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<RegisterResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    let password_hash = password::hash(&request.password)?;
    let account = state
        .repo
        .create_admin(request.email.trim(), &password_hash)
        .await?;

    tracing::info!(uid = %account.uid, "Account registered");
    created(RegisterResponse {
        uid: account.uid,
        email: account.email,
    })
}

/// POST /admins/login - Verify credentials and issue a bearer token (public).
///
/// Misses and bad passwords get the same answer so the endpoint does not
/// reveal which emails have accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let account = state
        .repo
        .find_admin_by_email(request.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

    if !password::verify(&request.password, &account.password_hash) {
        return Err(AppError::Unauthenticated(
            "Invalid email or password".to_string(),
        ));
    }

    let token = state
        .tokens
        .issue(&account.uid, &account.email)
        .map_err(|e| AppError::Internal(format!("Token issuance failed: {}", e)))?;

    tracing::info!(uid = %account.uid, "Login succeeded");
    success(LoginResponse {
        token,
        is_admin: account.is_admin,
    })
}

/// GET /admins - List all accounts (admin-only). Password hashes are never serialized.
pub async fn list_admins(State(state): State<AppState>) -> ApiResult<Vec<AdminAccount>> {
    let admins = state.repo.list_admins().await?;
    success(admins)
}

/// POST /admins/promote - Grant the admin flag to an account (admin-only).
pub async fn promote_admin(
    State(state): State<AppState>,
    Json(request): Json<RoleChangeRequest>,
) -> ApiResult<()> {
    if request.uid.trim().is_empty() {
        return Err(AppError::InvalidInput("uid is required".to_string()));
    }

    state.repo.set_admin_flag(&request.uid, true).await?;
    tracing::info!(uid = %request.uid, "Account promoted to admin");
    success(())
}

/// POST /admins/demote - Revoke the admin flag from an account (admin-only).
pub async fn demote_admin(
    State(state): State<AppState>,
    Json(request): Json<RoleChangeRequest>,
) -> ApiResult<()> {
    if request.uid.trim().is_empty() {
        return Err(AppError::InvalidInput("uid is required".to_string()));
    }

    state.repo.set_admin_flag(&request.uid, false).await?;
    tracing::info!(uid = %request.uid, "Account demoted from admin");
    success(())
}
