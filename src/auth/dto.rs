use serde::{Deserialize, Serialize};

/// Request body for `POST /authenticate`.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
}

/// Uniform `{error, message, data}` envelope for every response.
#[derive(Debug, Serialize)]
pub struct JsonResponse<T: Serialize> {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl JsonResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }
}
