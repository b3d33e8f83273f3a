use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};

use staffdir_auth::Operation;
use staffdir_core::EmployeeId;
use staffdir_directory::EmployeeDraft;

use crate::app::errors;
use crate::app::services::AppServices;
use crate::authz::authorize_operation;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// Role mismatches get the same body as a missing token; the cause is
/// logged by [`authorize_operation`].
fn guard(principal: &PrincipalContext, operation: Operation) -> Result<(), Response> {
    authorize_operation(principal, operation).map_err(|_| errors::forbidden())
}

fn parse_id(raw: &str) -> Result<EmployeeId, Response> {
    raw.parse::<EmployeeId>()
        .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
}

pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    payload: Result<Json<EmployeeDraft>, JsonRejection>,
) -> Response {
    if let Err(resp) = guard(&principal, Operation::CreateEmployee) {
        return resp;
    }
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };

    match services.employees.create(body) {
        Ok(employee) => {
            tracing::info!(employee_id = %employee.id, by = principal.username(), "employee created");
            let location = format!("/employees/{}", employee.id);
            (StatusCode::CREATED, [(header::LOCATION, location)], Json(employee)).into_response()
        }
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = guard(&principal, Operation::ListEmployees) {
        return resp;
    }

    match services.employees.list() {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = guard(&principal, Operation::GetEmployee) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.employees.get(id) {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeDraft>, JsonRejection>,
) -> Response {
    if let Err(resp) = guard(&principal, Operation::UpdateEmployee) {
        return resp;
    }
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => return errors::json_rejection(rejection),
    };
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.employees.update(id, body) {
        Ok(employee) => {
            tracing::info!(employee_id = %employee.id, by = principal.username(), "employee updated");
            (StatusCode::OK, Json(employee)).into_response()
        }
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn delete_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = guard(&principal, Operation::DeleteEmployee) {
        return resp;
    }
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.employees.delete(id) {
        Ok(()) => {
            tracing::info!(employee_id = %id, by = principal.username(), "employee deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::directory_error_to_response(e),
    }
}
