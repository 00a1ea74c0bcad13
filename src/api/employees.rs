//! Employee record endpoints.
//!
//! Create and update accept multipart form data so a photo can ride along
//! with the record fields.

use axum::{
    extract::{Multipart, Path, State},
    body::Bytes,
};

use super::{created, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Employee, EmployeeUpdate, NewEmployee};
use crate::AppState;

/// A photo payload extracted from a multipart field.
struct PhotoUpload {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

/// Employee fields as they arrive from a multipart form; all optional so the
/// same parser serves create (which requires them) and update (which merges).
#[derive(Default)]
struct EmployeeForm {
    name: Option<String>,
    surname: Option<String>,
    age: Option<String>,
    id_number: Option<String>,
    role: Option<String>,
    photo: Option<PhotoUpload>,
}

async fn read_form(mut multipart: Multipart) -> Result<EmployeeForm, AppError> {
    let mut form = EmployeeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {}", e)))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "photo" => {
                let filename = field.file_name().unwrap_or("photo").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read photo field: {}", e))
                })?;
                form.photo = Some(PhotoUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            other => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read field {}: {}", other, e))
                })?;
                match other {
                    "name" => form.name = Some(value),
                    "surname" => form.surname = Some(value),
                    "age" => form.age = Some(value),
                    "idNumber" => form.id_number = Some(value),
                    "role" => form.role = Some(value),
                    _ => {} // unknown fields are ignored
                }
            }
        }
    }

    Ok(form)
}

fn require(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!("{} is required", field))),
    }
}

/// Coerce the age field to a non-negative integer.
fn parse_age(raw: &str) -> Result<i64, AppError> {
    let age: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("age must be a number, got {:?}", raw)))?;
    if age < 0 {
        return Err(AppError::InvalidInput("age must be non-negative".to_string()));
    }
    Ok(age)
}

/// POST /employees - Create a new employee record (admin-only).
///
/// The photo upload completes before the record is written; an upload failure
/// aborts the whole operation.
pub async fn create_employee(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Employee> {
    let form = read_form(multipart).await?;

    let name = require(form.name, "name")?;
    let surname = require(form.surname, "surname")?;
    let age = parse_age(&require(form.age, "age")?)?;
    let id_number = require(form.id_number, "idNumber")?;
    let role = require(form.role, "role")?;

    let photo_url = match form.photo {
        Some(photo) => Some(
            state
                .photos
                .store(&photo.filename, &photo.content_type, &photo.bytes)
                .await?,
        ),
        None => None,
    };

    let employee = state
        .repo
        .create_employee(&NewEmployee {
            name,
            surname,
            age,
            id_number,
            role,
            photo_url,
        })
        .await?;

    tracing::info!(id_number = %employee.id_number, "Employee created");
    created(employee)
}

/// GET /employees - List all active employee records.
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let employees = state.repo.list_employees().await?;
    success(employees)
}

/// GET /employees/:id_number - Get a single active employee record.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id_number): Path<String>,
) -> ApiResult<Employee> {
    match state.repo.get_employee(&id_number).await? {
        Some(employee) => success(employee),
        None => Err(AppError::NotFound(format!(
            "Employee {} not found",
            id_number
        ))),
    }
}

/// PUT /employees/:id_number - Partially update an employee record (admin-only).
///
/// Fields left out of the form keep their current values. A new photo
/// replaces the old one; the replaced blob is released best-effort.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id_number): Path<String>,
    multipart: Multipart,
) -> ApiResult<Employee> {
    let form = read_form(multipart).await?;

    let age = form.age.as_deref().map(parse_age).transpose()?;

    let photo_url = match form.photo {
        Some(photo) => Some(
            state
                .photos
                .store(&photo.filename, &photo.content_type, &photo.bytes)
                .await?,
        ),
        None => None,
    };

    let update = EmployeeUpdate {
        name: form.name,
        surname: form.surname,
        age,
        id_number: form.id_number,
        role: form.role,
        photo_url,
    };

    let (employee, replaced_photo) = state.repo.update_employee(&id_number, &update).await?;
    if let Some(old_url) = replaced_photo {
        state.photos.remove(&old_url).await;
    }

    tracing::info!(id_number = %employee.id_number, "Employee updated");
    success(employee)
}

/// DELETE /employees/:id_number - Move an employee to the deleted store (admin-only).
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id_number): Path<String>,
) -> ApiResult<Employee> {
    let employee = state.repo.delete_employee(&id_number).await?;
    tracing::info!(id_number = %id_number, "Employee soft-deleted");
    success(employee)
}
