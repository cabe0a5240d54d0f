use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::dto::JsonResponse;
use crate::users::UserError;

pub const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Everything that can end an authentication request.
///
/// The variants stay distinct for logging, but only `Decode` reaches the
/// client with its own message. The rest render one identical body so a
/// caller cannot tell an unknown email from a wrong password.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid request body: {0}")]
    Decode(String),
    #[error("no user with that email")]
    UnknownEmail,
    #[error("user lookup failed: {0}")]
    Lookup(#[source] UserError),
    #[error("password does not match")]
    CredentialMismatch,
    #[error("password verification failed: {0}")]
    Verify(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::Decode(msg) => msg,
            AuthError::UnknownEmail
            | AuthError::Lookup(_)
            | AuthError::CredentialMismatch
            | AuthError::Verify(_) => INVALID_CREDENTIALS.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(JsonResponse::error(message))).into_response()
    }
}
