use axum::{Json, extract::State};
use gatehouse_core::AccountError;
use tracing::warn;

use crate::api_types::{ApiResponse, AuthTokenResponse, LoginRequest};
use crate::app_state::AppState;
use crate::errors::{AppError, AppResult};

/// `POST /sessions`: verify credentials and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthTokenResponse>>> {
    let user = state
        .service
        .authenticate(&request.email, &request.password)
        .await
        .map_err(|err| map_credential_error(&state, err))?;

    let access_token = state
        .tokens
        .issue(user.id, user.role)
        .map_err(|_| AppError::internal("failed to issue token"))?;

    Ok(Json(ApiResponse::success(AuthTokenResponse {
        access_token,
        expires_in: state.tokens.ttl_secs(),
    })))
}

/// The single configurable rendering choice for authentication failures:
/// with masking on, an unknown e-mail and a wrong password are
/// indistinguishable to the caller. Either way both kinds are logged
/// distinctly for auditing.
fn map_credential_error(state: &AppState, err: AccountError) -> AppError {
    match err {
        AccountError::EmailNotFound | AccountError::InvalidCredentials => {
            warn!(kind = %err, "authentication failed");
            if state.mask_credential_errors {
                AppError::unauthorized("invalid credentials")
            } else {
                AppError::from(err)
            }
        }
        other => AppError::from(other),
    }
}
