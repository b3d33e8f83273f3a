use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use staffdir_core::{DomainError, EmployeeId};

/// A stored employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for create and full update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
}

impl EmployeeDraft {
    /// Trim and validate. Emails compare case-insensitively, so they are
    /// stored lower-cased.
    pub fn validate(self) -> Result<Self, DomainError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let email = self.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        if let Some(salary) = self.salary {
            if !salary.is_finite() || salary < 0.0 {
                return Err(DomainError::validation("salary must be a non-negative number"));
            }
        }

        let department = self
            .department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            name,
            email,
            department,
            salary: self.salary,
        })
    }

    /// Materialize a new record from a validated draft.
    pub fn into_employee(self, id: EmployeeId, created_at: DateTime<Utc>) -> Employee {
        Employee {
            id,
            name: self.name,
            email: self.email,
            department: self.department,
            salary: self.salary,
            created_at,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("employee not found")]
    NotFound,

    #[error("email already in use: {0}")]
    DuplicateEmail(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("directory store failure: {0}")]
    Backend(String),
}

/// CRUD over employee records. Email is unique across records.
pub trait EmployeeRepository: Send + Sync {
    /// All records, oldest first.
    fn list(&self) -> Result<Vec<Employee>, DirectoryError>;

    fn get(&self, id: EmployeeId) -> Result<Employee, DirectoryError>;

    fn create(&self, draft: EmployeeDraft) -> Result<Employee, DirectoryError>;

    /// Replace name, email, department and salary; `id` and `created_at` stay.
    fn update(&self, id: EmployeeId, draft: EmployeeDraft) -> Result<Employee, DirectoryError>;

    fn delete(&self, id: EmployeeId) -> Result<(), DirectoryError>;
}

impl<R> EmployeeRepository for Arc<R>
where
    R: EmployeeRepository + ?Sized,
{
    fn list(&self) -> Result<Vec<Employee>, DirectoryError> {
        (**self).list()
    }

    fn get(&self, id: EmployeeId) -> Result<Employee, DirectoryError> {
        (**self).get(id)
    }

    fn create(&self, draft: EmployeeDraft) -> Result<Employee, DirectoryError> {
        (**self).create(draft)
    }

    fn update(&self, id: EmployeeId, draft: EmployeeDraft) -> Result<Employee, DirectoryError> {
        (**self).update(id, draft)
    }

    fn delete(&self, id: EmployeeId) -> Result<(), DirectoryError> {
        (**self).delete(id)
    }
}
