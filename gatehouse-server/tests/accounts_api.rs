//! End-to-end exercises of the HTTP surface against the in-memory store.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use gatehouse_core::auth::token::TokenService;
use gatehouse_core::store::InMemoryUserStore;
use gatehouse_core::User;
use gatehouse_server::api_types::{ApiResponse, AuthTokenResponse};
use gatehouse_server::{AppState, build_router};
use serde_json::json;

fn test_server(mask_credential_errors: bool) -> TestServer {
    let store = Arc::new(InMemoryUserStore::default());
    let tokens = TokenService::with_default_ttl("integration-test-secret");
    let state = AppState::new(store, tokens, mask_credential_errors)
        .expect("state builds");
    TestServer::new(build_router(state)).expect("server builds")
}

async fn register(
    server: &TestServer,
    name: &str,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> User {
    let mut body = json!({ "name": name, "email": email, "password": password });
    if let Some(role) = role {
        body["role"] = json!(role);
    }

    let response = server.post("/users").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response
        .json::<ApiResponse<User>>()
        .data
        .expect("created user in response")
}

async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/sessions")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response
        .json::<ApiResponse<AuthTokenResponse>>()
        .data
        .expect("token in response")
        .access_token
}

#[tokio::test]
async fn registration_returns_the_record_without_its_hash() {
    let server = test_server(false);

    let response = server
        .post("/users")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "hunter22",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let text = response.text();
    assert!(!text.contains("password_hash"));
    assert!(!text.contains("hunter22"));

    let user = response
        .json::<ApiResponse<User>>()
        .data
        .expect("created user");
    assert_eq!(user.name, "Alice");
    assert_eq!(user.role.as_str(), "user");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let server = test_server(false);
    register(&server, "Alice", "alice@example.com", "hunter22", None).await;

    let response = server
        .post("/users")
        .json(&json!({
            "name": "Impostor",
            "email": "alice@example.com",
            "password": "different",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_issues_a_bearer_token() {
    let server = test_server(false);
    register(&server, "Alice", "alice@example.com", "hunter22", None).await;

    let response = server
        .post("/sessions")
        .json(&json!({ "email": "alice@example.com", "password": "hunter22" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response
        .json::<ApiResponse<AuthTokenResponse>>()
        .data
        .expect("token body");
    assert!(!body.access_token.is_empty());
    assert_eq!(body.expires_in, TokenService::DEFAULT_TTL_SECS);
}

#[tokio::test]
async fn credential_failures_are_distinguishable_by_default() {
    let server = test_server(false);
    register(&server, "Alice", "alice@example.com", "hunter22", None).await;

    let wrong_password = server
        .post("/sessions")
        .json(&json!({ "email": "alice@example.com", "password": "nope" }))
        .await;
    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);

    let unknown_email = server
        .post("/sessions")
        .json(&json!({ "email": "ghost@example.com", "password": "nope" }))
        .await;
    assert_eq!(unknown_email.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn masking_collapses_credential_failures() {
    let server = test_server(true);
    register(&server, "Alice", "alice@example.com", "hunter22", None).await;

    let wrong_password = server
        .post("/sessions")
        .json(&json!({ "email": "alice@example.com", "password": "nope" }))
        .await;
    let unknown_email = server
        .post("/sessions")
        .json(&json!({ "email": "ghost@example.com", "password": "nope" }))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong_password.json::<ApiResponse<()>>().error,
        unknown_email.json::<ApiResponse<()>>().error,
    );
}

#[tokio::test]
async fn a_user_can_fetch_their_own_record() {
    let server = test_server(false);
    let alice =
        register(&server, "Alice", "alice@example.com", "hunter22", None).await;
    let token = login(&server, "alice@example.com", "hunter22").await;

    let response = server
        .get(&format!("/user/{}", alice.id))
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let fetched = response
        .json::<ApiResponse<User>>()
        .data
        .expect("fetched user");
    assert_eq!(fetched.id, alice.id);
    assert!(fetched.last_login.is_some());
}

#[tokio::test]
async fn a_user_cannot_touch_a_foreign_record() {
    let server = test_server(false);
    register(&server, "Alice", "alice@example.com", "hunter22", None).await;
    let bob =
        register(&server, "Bob", "bob@example.com", "password1", None).await;
    let token = login(&server, "alice@example.com", "hunter22").await;

    let get = server
        .get(&format!("/user/{}", bob.id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(get.status_code(), StatusCode::FORBIDDEN);

    let delete = server
        .delete(&format!("/user/{}", bob.id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(delete.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn protected_routes_reject_anonymous_and_garbage_tokens() {
    let server = test_server(false);
    let alice =
        register(&server, "Alice", "alice@example.com", "hunter22", None).await;

    let anonymous = server.get(&format!("/user/{}", alice.id)).await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);

    let garbage = server
        .get(&format!("/user/{}", alice.id))
        .authorization_bearer("not.a.jwt")
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_changes_are_admin_only() {
    let server = test_server(false);
    let alice =
        register(&server, "Alice", "alice@example.com", "hunter22", None).await;
    register(&server, "Root", "root@example.com", "rootpass", Some("admin"))
        .await;

    let alice_token = login(&server, "alice@example.com", "hunter22").await;
    let self_promotion = server
        .patch(&format!("/user/{}", alice.id))
        .authorization_bearer(&alice_token)
        .json(&json!({ "role": "admin" }))
        .await;
    assert_eq!(self_promotion.status_code(), StatusCode::FORBIDDEN);

    let admin_token = login(&server, "root@example.com", "rootpass").await;
    let promotion = server
        .patch(&format!("/user/{}", alice.id))
        .authorization_bearer(&admin_token)
        .json(&json!({ "role": "admin" }))
        .await;
    assert_eq!(promotion.status_code(), StatusCode::OK);

    let promoted = promotion
        .json::<ApiResponse<User>>()
        .data
        .expect("updated user");
    assert_eq!(promoted.role.as_str(), "admin");
}

#[tokio::test]
async fn a_user_can_update_their_own_profile() {
    let server = test_server(false);
    let alice =
        register(&server, "Alice", "alice@example.com", "hunter22", None).await;
    let token = login(&server, "alice@example.com", "hunter22").await;

    let response = server
        .patch(&format!("/user/{}", alice.id))
        .authorization_bearer(&token)
        .json(&json!({ "name": "Alicia" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated = response
        .json::<ApiResponse<User>>()
        .data
        .expect("updated user");
    assert_eq!(updated.name, "Alicia");
    assert_eq!(updated.email, "alice@example.com");
}

#[tokio::test]
async fn listing_is_admin_only_and_honours_the_query() {
    let server = test_server(false);
    register(&server, "Root", "root@example.com", "rootpass", Some("admin"))
        .await;
    register(&server, "Carol", "carol@example.com", "password1", None).await;
    register(&server, "Alice", "alice@example.com", "password2", None).await;
    register(&server, "Bob", "bob@example.com", "password3", None).await;

    let user_token = login(&server, "carol@example.com", "password1").await;
    let denied = server
        .get("/users")
        .authorization_bearer(&user_token)
        .await;
    assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);

    let admin_token = login(&server, "root@example.com", "rootpass").await;
    let response = server
        .get("/users?role=user&sortBy=name&order=desc")
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let names: Vec<String> = response
        .json::<ApiResponse<Vec<User>>>()
        .data
        .expect("listing")
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(names, vec!["Carol", "Bob", "Alice"]);
}

#[tokio::test]
async fn deleting_an_account_invalidates_its_record_but_not_its_token() {
    let server = test_server(false);
    let alice =
        register(&server, "Alice", "alice@example.com", "hunter22", None).await;
    let token = login(&server, "alice@example.com", "hunter22").await;

    let delete = server
        .delete(&format!("/user/{}", alice.id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(delete.status_code(), StatusCode::NO_CONTENT);

    // The token still verifies; the record behind it is gone.
    let fetch = server
        .get(&format!("/user/{}", alice.id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(fetch.status_code(), StatusCode::NOT_FOUND);

    let relogin = server
        .post("/sessions")
        .json(&json!({ "email": "alice@example.com", "password": "hunter22" }))
        .await;
    assert_eq!(relogin.status_code(), StatusCode::CONFLICT);
}
