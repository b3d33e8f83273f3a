//! In-memory stores for tests/dev.
//!
//! Each store holds a single `RwLock`, so every check-and-write (uniqueness,
//! existence) happens under one write guard and is atomic.

pub mod credentials;
pub mod employees;

pub use credentials::InMemoryCredentialStore;
pub use employees::InMemoryEmployeeRepository;
