use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::auth::middleware::auth_middleware;
use crate::handlers::{auth, users};

pub fn build_router(state: AppState) -> Router {
    // Registration and login take no bearer token.
    let public = Router::new()
        .route("/users", post(users::create))
        .route("/sessions", post(auth::login));

    let protected = Router::new()
        .route("/users", get(users::list))
        .route(
            "/user/{id}",
            get(users::get).patch(users::update).delete(users::remove),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
