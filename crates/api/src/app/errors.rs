use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use phonebook_infra::{DirectoryError, LookupField};

pub fn directory_error_to_response(err: DirectoryError) -> axum::response::Response {
    match err {
        DirectoryError::Unauthorized => unauthorized(),
        DirectoryError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "Insufficient privileges"),
        DirectoryError::InvalidName => json_error(StatusCode::BAD_REQUEST, "invalid_name", "Invalid input for name"),
        DirectoryError::InvalidPhone => {
            json_error(StatusCode::BAD_REQUEST, "invalid_phone", "Invalid input for phone number")
        }
        DirectoryError::Duplicate => json_error(StatusCode::BAD_REQUEST, "duplicate", "Person already exists"),
        DirectoryError::NotFound(LookupField::Name) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "Person not found")
        }
        DirectoryError::NotFound(LookupField::Number) => {
            json_error(StatusCode::NOT_FOUND, "not_found", "Number not found")
        }
        // Detail was already logged where it happened.
        DirectoryError::Internal(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "An internal error occurred",
        ),
    }
}

/// 401 with a `WWW-Authenticate: Bearer` challenge.
pub fn unauthorized() -> axum::response::Response {
    let mut response = json_error(StatusCode::UNAUTHORIZED, "unauthorized", "Invalid credentials");
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
    response
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
