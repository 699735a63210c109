use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use chrono::Utc;

use crate::app::{dto, errors, AppServices};

/// `POST /token`: exchange a username/password form for a bearer token.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    form: Result<Form<dto::LoginForm>, FormRejection>,
) -> axum::response::Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            return errors::json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_request",
                rejection.body_text(),
            );
        }
    };

    let Some(identity) = services
        .directory
        .credentials()
        .verify(&form.username, &form.password)
    else {
        tracing::info!(username = %form.username, "login rejected");
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_grant",
            "Incorrect username or password",
        );
    };

    match services.issuer.issue(&identity, Utc::now()) {
        Ok(token) => {
            tracing::info!(username = %identity.username, role = %identity.role, "token issued");
            (StatusCode::OK, Json(dto::TokenResponse::bearer(token))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred",
            )
        }
    }
}
