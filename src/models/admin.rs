//! Role records and account management request/response types.

use serde::{Deserialize, Serialize};

/// A role record: one per caller, keyed by uid.
///
/// The password hash stays server-side; it is skipped on serialization so it
/// can never leak through a list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub uid: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: String,
}

/// Request body for creating an account (non-admin until promoted).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Response body after a successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub uid: String,
    pub email: String,
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body carrying the issued bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub is_admin: bool,
}

/// Request body for promote/demote operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChangeRequest {
    pub uid: String,
}
