//! Bearer-token extraction.
//!
//! The middleware is strict about tokens that were presented and lenient
//! about tokens that were not: a missing `Authorization` header lets the
//! request through with no principal (the core's authorization engine then
//! denies with `Unauthenticated` where one is required), while a present
//! but unverifiable token is rejected outright. Forged, malformed and
//! expired tokens are indistinguishable in the response.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::errors::AppError;

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = extract_bearer_token(&request)? {
        let principal = state.tokens.verify(&token).map_err(AppError::from)?;
        request.extensions_mut().insert(principal);
    }

    Ok(next.run(request).await)
}

/// `Ok(None)` when no `Authorization` header is present; an error when one
/// is present but is not a bearer token.
fn extract_bearer_token(
    request: &Request,
) -> Result<Option<String>, AppError> {
    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("invalid or expired token"))?;

    Ok(Some(token.to_string()))
}
