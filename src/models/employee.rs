//! Employee record model.
//!
//! The same shape is used for both the active and the deleted store; a record
//! is never present in both at once.

use serde::{Deserialize, Serialize};

/// An employee record, identified externally by `id_number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Internal storage identifier
    pub id: String,
    pub name: String,
    pub surname: String,
    pub age: i64,
    /// External identifier, unique among active records
    pub id_number: String,
    /// Free-text job title
    pub role: String,
    /// URL of the stored photo; serialized as null when absent
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields required to create a new employee record.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub surname: String,
    pub age: i64,
    pub id_number: String,
    pub role: String,
    pub photo_url: Option<String>,
}

/// Partial update for an existing employee record. Absent fields keep their
/// current values.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub age: Option<i64>,
    pub id_number: Option<String>,
    pub role: Option<String>,
    /// Set when a new photo was uploaded; the previous photo is replaced
    pub photo_url: Option<String>,
}
