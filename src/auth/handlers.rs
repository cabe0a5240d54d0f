use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthRequest, JsonResponse},
        errors::AuthError,
    },
    state::AppState,
    users::{password::verify_against_dummy, User},
};

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/authenticate", post(authenticate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

#[instrument(skip(state, payload))]
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JsonResponse<User>>), AuthError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection, "undecodable authenticate body");
        AuthError::Decode(rejection.body_text())
    })?;

    let user = match state.users.get_by_email(&payload.email).await {
        Ok(u) => u,
        Err(e) if e.is_not_found() => {
            verify_against_dummy(&payload.password);
            warn!(email = %payload.email, "authenticate unknown email");
            return Err(AuthError::UnknownEmail);
        }
        Err(e) => {
            error!(error = %e, "get_by_email failed");
            return Err(AuthError::Lookup(e));
        }
    };

    match user.password_matches(&payload.password) {
        Ok(true) => {}
        Ok(false) => {
            warn!(email = %payload.email, user_id = user.id, "authenticate invalid password");
            return Err(AuthError::CredentialMismatch);
        }
        Err(e) => {
            error!(error = %e, user_id = user.id, "stored hash unreadable");
            return Err(AuthError::Verify(e.to_string()));
        }
    }

    info!(user_id = user.id, email = %user.email, "user authenticated");
    let message = format!("Logged in user {}", user.email);
    Ok((StatusCode::ACCEPTED, Json(JsonResponse::ok(message, user))))
}
