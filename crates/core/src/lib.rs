//! `staffdir-core`: shared identifiers and the domain error model.
//!
//! No IO and no framework types live here.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{EmployeeId, UserId};
