//! Database repository for role records and both employee stores.
//!
//! Uses prepared statements and transactions for data integrity. The
//! lifecycle moves between the active and deleted stores are single
//! transactions whose first statement is the conditional removal from the
//! source table, so concurrent moves for the same id_number serialize and
//! exactly one succeeds.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::{is_unique_violation, AppError};
use crate::models::{AdminAccount, Employee, EmployeeUpdate, NewEmployee};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== ROLE STORE ====================

    /// Get a role record by uid.
    pub async fn get_admin(&self, uid: &str) -> Result<Option<AdminAccount>, AppError> {
        let row = sqlx::query(
            "SELECT uid, email, password_hash, is_admin, created_at FROM admins WHERE uid = ?",
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(admin_from_row))
    }

    /// Get a role record by email (used by login and bootstrap).
    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<AdminAccount>, AppError> {
        let row = sqlx::query(
            "SELECT uid, email, password_hash, is_admin, created_at FROM admins WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(admin_from_row))
    }

    /// List all role records.
    pub async fn list_admins(&self) -> Result<Vec<AdminAccount>, AppError> {
        let rows = sqlx::query(
            "SELECT uid, email, password_hash, is_admin, created_at FROM admins ORDER BY email",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(admin_from_row).collect())
    }

    /// Create a non-admin role record. Duplicate email is a conflict.
    pub async fn create_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminAccount, AppError> {
        let uid = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO admins (uid, email, password_hash, is_admin, created_at) VALUES (?, ?, ?, 0, ?)",
        )
        .bind(&uid)
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Account with email {} already exists", email))
            } else {
                e.into()
            }
        })?;

        Ok(AdminAccount {
            uid,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            is_admin: false,
            created_at: now,
        })
    }

    /// Set the admin flag for an existing role record.
    pub async fn set_admin_flag(&self, uid: &str, is_admin: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE admins SET is_admin = ? WHERE uid = ?")
            .bind(is_admin as i32)
            .bind(uid)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Account {} not found", uid)));
        }
        Ok(())
    }

    /// Ensure the bootstrap admin exists, creating it with `is_admin = true`
    /// if absent. Idempotent: existing accounts are matched by email and left
    /// untouched.
    pub async fn ensure_bootstrap_admin(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<(), AppError> {
        if self.find_admin_by_email(email).await?.is_some() {
            return Ok(());
        }

        let uid = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT OR IGNORE INTO admins (uid, email, password_hash, is_admin, created_at) VALUES (?, ?, ?, 1, ?)",
        )
        .bind(&uid)
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(email = %email, "Bootstrap admin created");
        }
        Ok(())
    }

    // ==================== EMPLOYEE RECORD STORE ====================

    /// List all active employee records.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, surname, age, id_number, role, photo_url, created_at, updated_at FROM employees",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(employee_from_row).collect())
    }

    /// Get an active employee record by id_number.
    pub async fn get_employee(&self, id_number: &str) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, surname, age, id_number, role, photo_url, created_at, updated_at FROM employees WHERE id_number = ?",
        )
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(employee_from_row))
    }

    /// Create a new employee record. Duplicate id_number is a conflict.
    pub async fn create_employee(&self, new: &NewEmployee) -> Result<Employee, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO employees (id, name, surname, age, id_number, role, photo_url, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.name)
        .bind(&new.surname)
        .bind(new.age)
        .bind(&new.id_number)
        .bind(&new.role)
        .bind(&new.photo_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Employee with id number {} already exists",
                    new.id_number
                ))
            } else {
                e.into()
            }
        })?;

        Ok(Employee {
            id,
            name: new.name.clone(),
            surname: new.surname.clone(),
            age: new.age,
            id_number: new.id_number.clone(),
            role: new.role.clone(),
            photo_url: new.photo_url.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update an active employee record, merging the provided fields.
    ///
    /// Returns the previous photo URL alongside the updated record when the
    /// photo was replaced, so the caller can release the old blob.
    pub async fn update_employee(
        &self,
        id_number: &str,
        update: &EmployeeUpdate,
    ) -> Result<(Employee, Option<String>), AppError> {
        let existing = self
            .get_employee(id_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id_number)))?;

        let now = Utc::now().to_rfc3339();

        let name = update.name.as_ref().unwrap_or(&existing.name);
        let surname = update.surname.as_ref().unwrap_or(&existing.surname);
        let age = update.age.unwrap_or(existing.age);
        let new_id_number = update.id_number.as_ref().unwrap_or(&existing.id_number);
        let role = update.role.as_ref().unwrap_or(&existing.role);
        let replaced_photo = update
            .photo_url
            .as_ref()
            .and(existing.photo_url.clone())
            .filter(|old| Some(old) != update.photo_url.as_ref());
        let photo_url = update.photo_url.clone().or(existing.photo_url.clone());

        let result = sqlx::query(
            "UPDATE employees SET name = ?, surname = ?, age = ?, id_number = ?, role = ?, photo_url = ?, updated_at = ? WHERE id_number = ?",
        )
        .bind(name)
        .bind(surname)
        .bind(age)
        .bind(new_id_number)
        .bind(role)
        .bind(&photo_url)
        .bind(&now)
        .bind(id_number)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Employee with id number {} already exists",
                    new_id_number
                ))
            } else {
                e.into()
            }
        })?;

        if result.rows_affected() == 0 {
            // Moved or removed between read and write
            return Err(AppError::NotFound(format!(
                "Employee {} not found",
                id_number
            )));
        }

        Ok((
            Employee {
                id: existing.id,
                name: name.clone(),
                surname: surname.clone(),
                age,
                id_number: new_id_number.clone(),
                role: role.clone(),
                photo_url,
                created_at: existing.created_at,
                updated_at: now,
            },
            replaced_photo,
        ))
    }

    // ==================== DELETED RECORD STORE ====================

    /// List all deleted employee records.
    pub async fn list_deleted_employees(&self) -> Result<Vec<Employee>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, surname, age, id_number, role, photo_url, created_at, updated_at FROM deleted_employees",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(employee_from_row).collect())
    }

    /// Get a deleted employee record by id_number.
    pub async fn get_deleted_employee(
        &self,
        id_number: &str,
    ) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, surname, age, id_number, role, photo_url, created_at, updated_at FROM deleted_employees WHERE id_number = ?",
        )
        .bind(id_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(employee_from_row))
    }

    // ==================== LIFECYCLE ENGINE ====================

    /// Move an active record to the deleted store.
    ///
    /// Both writes commit atomically. The conditional DELETE runs first and
    /// takes the writer lock, so of two concurrent deletes for the same
    /// id_number exactly one sees the row; the other gets `NotFound` and
    /// performs no writes.
    pub async fn delete_employee(&self, id_number: &str) -> Result<Employee, AppError> {
        self.move_employee(id_number, "employees", "deleted_employees")
            .await
    }

    /// Move a deleted record back to the active store.
    pub async fn restore_employee(&self, id_number: &str) -> Result<Employee, AppError> {
        self.move_employee(id_number, "deleted_employees", "employees")
            .await
    }

    async fn move_employee(
        &self,
        id_number: &str,
        from: &str,
        to: &str,
    ) -> Result<Employee, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!(
            "DELETE FROM {} WHERE id_number = ? RETURNING id, name, surname, age, id_number, role, photo_url, created_at, updated_at",
            from
        ))
        .bind(id_number)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!(
                "Employee {} not found",
                id_number
            )));
        };
        let employee = employee_from_row(&row);

        sqlx::query(&format!(
            "INSERT INTO {} (id, name, surname, age, id_number, role, photo_url, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            to
        ))
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(&employee.surname)
        .bind(employee.age)
        .bind(&employee.id_number)
        .bind(&employee.role)
        .bind(&employee.photo_url)
        .bind(&employee.created_at)
        .bind(&employee.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!(
                    "Employee {} already exists in the target store",
                    id_number
                ))
            } else {
                e.into()
            }
        })?;

        tx.commit().await?;
        Ok(employee)
    }
}

// Helper functions for row conversion

fn admin_from_row(row: &sqlx::sqlite::SqliteRow) -> AdminAccount {
    let is_admin: i32 = row.get("is_admin");
    AdminAccount {
        uid: row.get("uid"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_admin: is_admin != 0,
        created_at: row.get("created_at"),
    }
}

fn employee_from_row(row: &sqlx::sqlite::SqliteRow) -> Employee {
    Employee {
        id: row.get("id"),
        name: row.get("name"),
        surname: row.get("surname"),
        age: row.get("age"),
        id_number: row.get("id_number"),
        role: row.get("role"),
        photo_url: row.get("photo_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
