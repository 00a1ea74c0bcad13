//! Deleted employee endpoints (admin-only).
//!
//! Deleted records persist until restored; there is no hard destruction.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::Employee;
use crate::AppState;

/// GET /deletedEmployees - List all deleted employee records.
pub async fn list_deleted_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let employees = state.repo.list_deleted_employees().await?;
    success(employees)
}

/// GET /deletedEmployees/:id_number - Get a single deleted employee record.
pub async fn get_deleted_employee(
    State(state): State<AppState>,
    Path(id_number): Path<String>,
) -> ApiResult<Employee> {
    match state.repo.get_deleted_employee(&id_number).await? {
        Some(employee) => success(employee),
        None => Err(AppError::NotFound(format!(
            "Deleted employee {} not found",
            id_number
        ))),
    }
}

/// POST /deletedEmployees/restore/:id_number - Move a deleted employee back to
/// the active store.
pub async fn restore_employee(
    State(state): State<AppState>,
    Path(id_number): Path<String>,
) -> ApiResult<Employee> {
    let employee = state.repo.restore_employee(&id_number).await?;
    tracing::info!(id_number = %id_number, "Employee restored");
    success(employee)
}
