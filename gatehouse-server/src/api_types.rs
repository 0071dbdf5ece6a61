//! Response envelope shared by every endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(error),
        }
    }
}

/// Body returned by a successful `POST /sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokenResponse {
    /// Opaque bearer string; clients present it in the `Authorization`
    /// header until it expires.
    pub access_token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Body accepted by `POST /sessions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
