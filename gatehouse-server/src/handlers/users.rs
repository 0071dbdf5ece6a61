//! Account lifecycle endpoints.
//!
//! Handlers extract an optional [`Principal`] from the request extensions
//! (set by the auth middleware) and pass it into the core explicitly; the
//! core decides. `User` serializes without its password hash, so records
//! can be returned directly.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use gatehouse_core::{NewUser, Principal, User, UserQuery, UserUpdate};
use uuid::Uuid;

use crate::api_types::ApiResponse;
use crate::app_state::AppState;
use crate::errors::AppResult;

/// `POST /users`: public registration.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// `GET /users`: admin-only listing with optional filter and sort.
pub async fn list(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let principal = principal.map(|Extension(p)| p);
    let users = state.service.list(principal.as_ref(), &query).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// `GET /user/{id}`: self or admin.
pub async fn get(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let principal = principal.map(|Extension(p)| p);
    let user = state.service.get(principal.as_ref(), id).await?;
    Ok(Json(ApiResponse::success(user)))
}

/// `PATCH /user/{id}`: partial update, self or admin; role changes are
/// admin-only.
pub async fn update(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UserUpdate>,
) -> AppResult<Json<ApiResponse<User>>> {
    let principal = principal.map(|Extension(p)| p);
    let user = state
        .service
        .update(principal.as_ref(), id, request)
        .await?;
    Ok(Json(ApiResponse::success(user)))
}

/// `DELETE /user/{id}`: self or admin.
pub async fn remove(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let principal = principal.map(|Extension(p)| p);
    state.service.delete(principal.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
