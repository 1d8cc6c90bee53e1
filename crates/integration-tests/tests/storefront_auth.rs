//! Auth flow tests: route gating, inline validation, and remote-failure
//! toasts, driven through the real router.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use papaya_market_integration_tests::test_app;

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let response = test_app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn login_page_renders() {
    let response = test_app().oneshot(get("/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Login"));
    assert!(body.contains("name=\"username\""));
    assert!(body.contains("name=\"password\""));
}

#[tokio::test]
async fn register_page_renders() {
    let response = test_app().oneshot(get("/register")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Signup"));
    assert!(body.contains("name=\"confirm_password\""));
}

#[tokio::test]
async fn short_login_fields_render_inline_errors() {
    let response = test_app()
        .oneshot(post_form("/login", "username=abc&password=short"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Please fill this field with 8-20 characters"));
    // The submitted username is preserved
    assert!(body.contains("value=\"abc\""));
}

#[tokio::test]
async fn validation_failure_does_not_call_the_api_or_touch_the_session() {
    let response = test_app()
        .oneshot(post_form("/login", "username=abc&password=short"))
        .await
        .unwrap();

    // No toast: the failure never reached the remote call
    assert!(!response.headers().contains_key(header::SET_COOKIE));
    let body = body_string(response).await;
    assert!(!body.contains("Login failed."));
}

#[tokio::test]
async fn failed_login_stays_on_login_with_one_error_toast() {
    // Well-formed credentials; the store API is unreachable, so the remote
    // call fails and the page re-renders in place.
    let response = test_app()
        .oneshot(post_form("/login", "username=testuser1&password=password123"))
        .await
        .unwrap();

    // Not a redirect: the route stays on /login
    assert_eq!(response.status(), StatusCode::OK);
    // The token was not stored
    assert!(!response.headers().contains_key(header::SET_COOKIE));

    let body = body_string(response).await;
    assert!(body.contains("Login failed."));
    assert!(body.contains("flash-error"));
    // Exactly one toast
    assert_eq!(body.matches("role=\"alert\"").count(), 1);
}

#[tokio::test]
async fn register_password_mismatch_renders_inline() {
    let response = test_app()
        .oneshot(post_form(
            "/register",
            "username=testuser1&email=user%40example.com&password=password1&confirm_password=password2",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Passwords do not match."));
}

#[tokio::test]
async fn register_invalid_email_renders_inline() {
    let response = test_app()
        .oneshot(post_form(
            "/register",
            "username=testuser1&email=not-an-email&password=password1&confirm_password=password1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Please input a valid email."));
}

#[tokio::test]
async fn failed_registration_shows_error_toast() {
    // Valid form, unreachable API
    let response = test_app()
        .oneshot(post_form(
            "/register",
            "username=testuser1&email=user%40example.com&password=password1&confirm_password=password1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Registration failed."));
    assert!(body.contains("flash-error"));
}

#[tokio::test]
async fn logout_redirects_to_login() {
    let response = test_app().oneshot(get("/logout")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/login"
    );
}
