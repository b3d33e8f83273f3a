//! API-side authorization guard for directory operations.
//!
//! Runs in the handler before the repository is touched.

use staffdir_auth::{AuthzError, Operation};

use crate::context::PrincipalContext;

/// Check that the current principal may perform `operation`.
pub fn authorize_operation(
    principal: &PrincipalContext,
    operation: Operation,
) -> Result<(), AuthzError> {
    let result = principal.to_request_auth().ensure(operation);
    if let Err(e) = &result {
        tracing::debug!(username = principal.username(), operation = operation.name(), error = %e, "access denied");
    }
    result
}
