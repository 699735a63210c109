use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use phonebook_auth::Capability;

use crate::app::{dto, errors, AppServices};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/list", get(list_people))
        .route("/add", post(add_person))
        .route("/deleteByName", put(delete_by_name))
        .route("/deleteByNumber", put(delete_by_number))
}

pub async fn list_people(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.directory.list(principal.username()).await {
        Ok(records) => {
            let items = records.into_iter().map(dto::record_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn add_person(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::AddPersonQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_query(&services, &principal, "add", rejection).await,
    };

    match services
        .directory
        .add(principal.username(), &query.full_name, &query.phone_number)
        .await
    {
        Ok(_) => message("Person added successfully"),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn delete_by_name(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::DeleteByNameQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_query(&services, &principal, "delete by name", rejection).await,
    };

    match services
        .directory
        .delete_by_name(principal.username(), &query.full_name)
        .await
    {
        Ok(_) => message("Person deleted successfully"),
        Err(e) => errors::directory_error_to_response(e),
    }
}

pub async fn delete_by_number(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::DeleteByNumberQuery>, QueryRejection>,
) -> axum::response::Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_query(&services, &principal, "delete by number", rejection).await,
    };

    match services
        .directory
        .delete_by_number(principal.username(), &query.phone_number)
        .await
    {
        Ok(_) => message("Person deleted successfully"),
        Err(e) => errors::directory_error_to_response(e),
    }
}

fn message(message: &'static str) -> axum::response::Response {
    (StatusCode::OK, Json(dto::MessageResponse { message })).into_response()
}

/// A malformed mutation still goes through the gate first, so a reader gets 403, not 422.
async fn invalid_query(
    services: &AppServices,
    principal: &PrincipalContext,
    operation: &str,
    rejection: QueryRejection,
) -> axum::response::Response {
    if let Err(e) = services
        .directory
        .authorize(principal.username(), Capability::Write, operation)
        .await
    {
        return errors::directory_error_to_response(e);
    }

    errors::json_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        "invalid_request",
        rejection.body_text(),
    )
}
