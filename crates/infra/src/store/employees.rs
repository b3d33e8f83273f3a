use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use staffdir_core::EmployeeId;
use staffdir_directory::{DirectoryError, Employee, EmployeeDraft, EmployeeRepository};

/// In-memory employee repository with a unique index on email.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    inner: RwLock<HashMap<EmployeeId, Employee>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> DirectoryError {
    DirectoryError::Backend("employee store lock poisoned".to_string())
}

fn email_taken(
    map: &HashMap<EmployeeId, Employee>,
    email: &str,
    except: Option<EmployeeId>,
) -> bool {
    map.values().any(|e| e.email == email && Some(e.id) != except)
}

impl EmployeeRepository for InMemoryEmployeeRepository {
    fn list(&self) -> Result<Vec<Employee>, DirectoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        let mut all: Vec<Employee> = map.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(all)
    }

    fn get(&self, id: EmployeeId) -> Result<Employee, DirectoryError> {
        let map = self.inner.read().map_err(poisoned)?;
        map.get(&id).cloned().ok_or(DirectoryError::NotFound)
    }

    fn create(&self, draft: EmployeeDraft) -> Result<Employee, DirectoryError> {
        let draft = draft.validate()?;
        let mut map = self.inner.write().map_err(poisoned)?;
        if email_taken(&map, &draft.email, None) {
            return Err(DirectoryError::DuplicateEmail(draft.email));
        }

        let employee = draft.into_employee(EmployeeId::new(), Utc::now());
        map.insert(employee.id, employee.clone());
        tracing::debug!(employee_id = %employee.id, "employee created");
        Ok(employee)
    }

    fn update(&self, id: EmployeeId, draft: EmployeeDraft) -> Result<Employee, DirectoryError> {
        let draft = draft.validate()?;
        let mut map = self.inner.write().map_err(poisoned)?;
        let created_at = map.get(&id).ok_or(DirectoryError::NotFound)?.created_at;
        if email_taken(&map, &draft.email, Some(id)) {
            return Err(DirectoryError::DuplicateEmail(draft.email));
        }

        let employee = draft.into_employee(id, created_at);
        map.insert(id, employee.clone());
        Ok(employee)
    }

    fn delete(&self, id: EmployeeId) -> Result<(), DirectoryError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.remove(&id).map(|_| ()).ok_or(DirectoryError::NotFound)
    }
}
