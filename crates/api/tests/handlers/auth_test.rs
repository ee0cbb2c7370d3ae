use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use timetable_core::models::user::{SessionResponse, User};

use crate::test_utils::{PASSWORD, TestApp, bearer, sign_up, test_server};

#[tokio::test]
async fn test_signup_normalizes_email_and_signs_in() {
    let server = test_server();
    let session = sign_up(&server, "  Ann@School.ORG ").await;

    assert_eq!(session.user.email, "ann@school.org");
    assert!(!session.token.is_empty());

    let (name, value) = bearer(&session.token);
    let me = server.get("/api/auth/me").add_header(name, value).await;
    assert_eq!(me.status_code(), StatusCode::OK);
    assert_eq!(me.json::<User>().id, session.user.id);
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let server = test_server();
    sign_up(&server, "ann@school.org").await;

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "email": "ANN@school.org", "password": PASSWORD }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let server = test_server();
    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "email": "ann@school.org", "password": "short" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<serde_json::Value>();
    assert!(body["error"].as_str().unwrap().contains("at least 8"));
}

#[tokio::test]
async fn test_login_with_correct_and_wrong_password() {
    let server = test_server();
    sign_up(&server, "ann@school.org").await;

    let ok = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ann@school.org", "password": PASSWORD }))
        .await;
    assert_eq!(ok.status_code(), StatusCode::OK);
    assert_eq!(ok.json::<SessionResponse>().user.email, "ann@school.org");

    let wrong = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ann@school.org", "password": "not the password" }))
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let unknown = server
        .post("/api/auth/login")
        .json(&json!({ "email": "bob@school.org", "password": PASSWORD }))
        .await;
    assert_eq!(unknown.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/timetables").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let (name, value) = bearer("not-a-real-token");
    let response = app.server.get("/api/timetables").add_header(name, value).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = TestApp::new().await;

    let response = app.post("/api/auth/logout").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app.get("/api/auth/me").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_session() {
    let server = test_server();
    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<serde_json::Value>()["status"], "ok");
}
