use serde::{Deserialize, Serialize};

use phonebook_directory::DirectoryRecord;

// -------------------------
// Request DTOs
// -------------------------

/// `application/x-www-form-urlencoded` body of `POST /token`.
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPersonQuery {
    pub full_name: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteByNameQuery {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteByNumberQuery {
    pub phone_number: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub fn record_to_json(record: DirectoryRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id.to_string(),
        "full_name": record.full_name.as_str(),
        "phone_number": record.phone_number.as_str(),
    })
}
