//! Employee directory records and the repository contract for them.

pub mod employee;

pub use employee::{DirectoryError, Employee, EmployeeDraft, EmployeeRepository};
