//! API integration tests.
//!
//! These tests drive the router end to end over the in-memory store.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware,
};
use ideaboard_api::{AppState, auth_middleware, router as api_router};
use ideaboard_core::stores::{MemoryStore, SequentialTokens};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Create the test router over an empty store.
fn create_test_router() -> Router {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_store(store, Arc::new(SequentialTokens::new()));

    api_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

/// POST a JSON body, optionally authenticated, and decode the reply.
async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Register `username` and return its session token.
async fn signup(app: &Router, username: &str) -> String {
    let (status, body) = post(
        app,
        "/signup",
        None,
        json!({
            "fullName": format!("{username} tester"),
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router();

    let (status, _) = post(&app, "/nonexistent", None, json!({})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_returns_token_without_password() {
    let app = create_test_router();

    let (status, body) = post(
        &app,
        "/signup",
        None,
        json!({
            "fullName": "Alice Liddell",
            "username": "alice",
            "email": "alice@example.com",
            "password": "password123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
    assert!(body["data"]["profileSlug"].as_str().unwrap().starts_with("alice-"));
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_signup_with_short_password_is_validation_error() {
    let app = create_test_router();

    let (status, body) = post(
        &app,
        "/signup",
        None,
        json!({
            "fullName": "Alice",
            "username": "alice",
            "email": "alice@example.com",
            "password": "short",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_signup_with_taken_username_conflicts() {
    let app = create_test_router();
    signup(&app, "alice").await;

    let (status, body) = post(
        &app,
        "/signup",
        None,
        json!({
            "fullName": "Other Alice",
            "username": "alice",
            "email": "other@example.com",
            "password": "password123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "CONFLICT");
}

#[tokio::test]
async fn test_signin_issues_new_token() {
    let app = create_test_router();
    let first = signup(&app, "alice").await;

    let (status, body) = post(
        &app,
        "/signin",
        None,
        json!({ "email": "alice@example.com", "password": "password123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let second = body["data"]["token"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    // The old session no longer authenticates
    let (status, _) = post(&app, "/i/profile", Some(&first), json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = post(&app, "/i/profile", Some(&second), json!({})).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_signin_with_wrong_password_is_unauthenticated() {
    let app = create_test_router();
    signup(&app, "alice").await;

    let (status, body) = post(
        &app,
        "/signin",
        None,
        json!({ "email": "alice@example.com", "password": "wrongpassword" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_signout_requires_auth_and_ends_session() {
    let app = create_test_router();
    let token = signup(&app, "alice").await;

    let (status, _) = post(&app, "/signout", None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(&app, "/signout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(&app, "/i/profile", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_follow_request_is_unauthenticated() {
    let app = create_test_router();
    let bob = signup(&app, "bob").await;

    let (status, body) = post(
        &app,
        "/following/requests/send",
        None,
        json!({ "username": "bob" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "UNAUTHENTICATED");

    let (_, body) = post(&app, "/following/requests/received", Some(&bob), json!({})).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_follow_request_accept_flow() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (status, body) = post(
        &app,
        "/following/requests/send",
        Some(&alice),
        json!({ "username": "bob" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/following/requests/send",
        Some(&alice),
        json!({ "username": "bob" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "DUPLICATE_REQUEST");

    let (_, body) = post(&app, "/following/requests/received", Some(&bob), json!({})).await;
    assert_eq!(body["data"][0]["id"], request_id.as_str());

    // Only the target may answer
    let (status, body) = post(
        &app,
        "/following/requests/accept",
        Some(&alice),
        json!({ "requestId": request_id }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "NOT_AUTHORIZED");

    let (status, body) = post(
        &app,
        "/following/requests/accept",
        Some(&bob),
        json!({ "requestId": request_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "accepted");

    let (status, body) = post(
        &app,
        "/following/requests/accept",
        Some(&bob),
        json!({ "requestId": request_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "NOT_PENDING");

    let (_, body) = post(
        &app,
        "/following/relation",
        Some(&alice),
        json!({ "username": "bob" }),
    )
    .await;
    assert_eq!(
        body["data"],
        json!({ "following": true, "followedBy": true, "mutual": true })
    );

    let (_, body) = post(
        &app,
        "/following/followers",
        None,
        json!({ "username": "bob" }),
    )
    .await;
    assert_eq!(body["data"][0]["username"], "alice");
}

#[tokio::test]
async fn test_follow_request_notifications() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (_, body) = post(
        &app,
        "/following/requests/send",
        Some(&alice),
        json!({ "username": "bob" }),
    )
    .await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(&app, "/notifications", Some(&bob), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["type"], "newFollow");
    assert_eq!(body["data"][0]["isRead"], false);

    post(
        &app,
        "/following/requests/accept",
        Some(&bob),
        json!({ "requestId": request_id }),
    )
    .await;

    let (_, body) = post(&app, "/notifications", Some(&alice), json!({})).await;
    assert_eq!(body["data"][0]["type"], "followRequestAccepted");

    let (_, body) = post(&app, "/notifications/mark-read", Some(&bob), json!({})).await;
    assert_eq!(body["data"]["marked"], 1);

    let (status, _) = post(&app, "/notifications", None, json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reject_leaves_followers_unchanged() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (_, body) = post(
        &app,
        "/following/requests/send",
        Some(&alice),
        json!({ "username": "bob" }),
    )
    .await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(
        &app,
        "/following/requests/reject",
        Some(&bob),
        json!({ "requestId": request_id }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "rejected");

    let (_, body) = post(&app, "/following/mine/followers", Some(&bob), json!({})).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_remove_follower_clears_both_directions() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (_, body) = post(
        &app,
        "/following/requests/send",
        Some(&alice),
        json!({ "username": "bob" }),
    )
    .await;
    let request_id = body["data"]["id"].as_str().unwrap().to_string();
    post(
        &app,
        "/following/requests/accept",
        Some(&bob),
        json!({ "requestId": request_id }),
    )
    .await;

    let (status, _) = post(
        &app,
        "/following/followers/remove",
        Some(&bob),
        json!({ "username": "alice" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = post(
        &app,
        "/following/relation",
        Some(&bob),
        json!({ "username": "alice" }),
    )
    .await;
    assert_eq!(
        body["data"],
        json!({ "following": false, "followedBy": false, "mutual": false })
    );
}

#[tokio::test]
async fn test_self_follow_is_rejected() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;

    let (status, body) = post(
        &app,
        "/following/create",
        Some(&alice),
        json!({ "username": "alice" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "SELF_FOLLOW");
}

#[tokio::test]
async fn test_profile_update_and_show() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;

    let (status, body) = post(
        &app,
        "/i/profile/update",
        Some(&alice),
        json!({ "bio": "Ideas about bikes", "city": "Lyon" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bio"], "Ideas about bikes");

    let (status, body) = post(&app, "/profiles/show", None, json!({ "username": "alice" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["city"], "Lyon");
    assert_eq!(body["data"]["followersCount"], 0);

    let (status, body) = post(&app, "/profiles/show", None, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "BAD_REQUEST");

    let (status, _) = post(&app, "/profiles/show", None, json!({ "username": "nobody" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_users_listing_hides_credentials() {
    let app = create_test_router();
    signup(&app, "alice").await;

    let (status, body) = post(&app, "/users", None, json!({})).await;

    assert_eq!(status, StatusCode::OK);
    let user = &body["data"][0];
    assert_eq!(user["username"], "alice");
    assert!(user.get("password").is_none());
    assert!(user.get("token").is_none());
    assert!(user.get("email").is_none());
}

/// Create an idea as `token` and return its (id, slug).
async fn create_idea(app: &Router, token: &str, title: &str, visibility: &str) -> (String, String) {
    let (status, body) = post(
        app,
        "/ideas/create",
        Some(token),
        json!({ "title": title, "body": "Worth trying", "visibility": visibility }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    (
        body["data"]["id"].as_str().unwrap().to_string(),
        body["data"]["slug"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_idea_like_and_dislike_toggle() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let (idea_id, slug) = create_idea(&app, &alice, "Solar bikes", "Public").await;

    let (_, body) = post(&app, "/ideas/like", Some(&bob), json!({ "ideaId": idea_id })).await;
    assert_eq!(
        body["data"],
        json!({ "liked": true, "likesCount": 1, "dislikesCount": 0 })
    );

    let (_, body) = post(&app, "/ideas/like", Some(&bob), json!({ "ideaId": idea_id })).await;
    assert_eq!(
        body["data"],
        json!({ "liked": false, "likesCount": 0, "dislikesCount": 0 })
    );

    let (_, body) = post(&app, "/ideas/dislike", Some(&bob), json!({ "ideaId": idea_id })).await;
    assert_eq!(
        body["data"],
        json!({ "disliked": true, "likesCount": 0, "dislikesCount": 1 })
    );

    let (status, body) = post(&app, "/ideas/show", None, json!({ "slug": slug })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["views"], 1);
    assert_eq!(body["data"]["dislikesCount"], 1);

    let (status, _) = post(&app, "/ideas/like", None, json!({ "ideaId": idea_id })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_listing_hides_private_ideas() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;
    create_idea(&app, &alice, "Open idea", "Public").await;
    create_idea(&app, &alice, "Secret idea", "Private").await;

    let (_, body) = post(&app, "/ideas/public", None, json!({})).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Open idea");

    let (_, body) = post(&app, "/ideas", None, json!({})).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = post(&app, "/ideas/mine", Some(&alice), json!({})).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_only_author_can_change_idea() {
    let app = create_test_router();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let (idea_id, _) = create_idea(&app, &alice, "Solar bikes", "Public").await;

    let (status, body) = post(
        &app,
        "/ideas/update",
        Some(&bob),
        json!({ "ideaId": idea_id, "title": "Hijacked" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "NOT_AUTHORIZED");

    let (status, body) = post(
        &app,
        "/ideas/update",
        Some(&alice),
        json!({ "ideaId": idea_id, "title": "Solar cargo bikes" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Solar cargo bikes");

    let (status, _) = post(&app, "/ideas/delete", Some(&bob), json!({ "ideaId": idea_id })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(&app, "/ideas/delete", Some(&alice), json!({ "ideaId": idea_id })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(&app, "/ideas/like", Some(&bob), json!({ "ideaId": idea_id })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "IDEA_NOT_FOUND");
}
