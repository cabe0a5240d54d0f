use argon2::password_hash;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::password::verify_password;

/// User record in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Argon2 PHC string, never exposed in JSON.
    #[serde(skip_serializing, default)]
    pub password: String,
    #[sqlx(rename = "user_active")]
    pub active: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn password_matches(&self, plain: &str) -> Result<bool, password_hash::Error> {
        verify_password(plain, &self.password)
    }
}

/// Input for `UserStore::insert`; `password` is plaintext and hashed on insert.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
    #[serde(default)]
    pub active: i32,
}
