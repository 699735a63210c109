use axum::Router;

pub mod auth;
pub mod phonebook;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new().nest("/PhoneBook", phonebook::router())
}
