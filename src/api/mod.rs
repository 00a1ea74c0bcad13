//! REST API module.
//!
//! Contains all API routes and handlers.

mod admins;
mod deleted;
mod employees;

pub use admins::*;
pub use deleted::*;
pub use employees::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, status: StatusCode) -> Self {
        Self {
            success: true,
            data,
            status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Create a successful API response (200).
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data, StatusCode::OK))
}

/// Create a successful API response for a newly created resource (201).
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data, StatusCode::CREATED))
}
