//! Infrastructure layer: store implementations behind the domain traits.

pub mod store;

pub use store::{InMemoryCredentialStore, InMemoryEmployeeRepository};
