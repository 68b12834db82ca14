//! Integration tests for the refresh-token endpoint

mod common;

use actix_web::{http::StatusCode, test, test::TestRequest};
use serde_json::Value;

use wg_api::app::create_app;
use wg_api::dto::AuthenticationResponse;

use common::*;

#[actix_web::test]
async fn test_refresh_issues_new_access_token() {
    let app = test::init_service(create_app(test_state(false), &cors(), max_payload())).await;

    let resp = test::call_service(&app, signup_request("ada@example.com").to_request()).await;
    let issued: AuthenticationResponse = test::read_body_json(resp).await;

    let resp = test::call_service(&app, refresh_request(&issued.refresh_token).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let refreshed: AuthenticationResponse = test::read_body_json(resp).await;
    assert_eq!(refreshed.refresh_token, issued.refresh_token);
    assert_ne!(refreshed.access_token, issued.access_token);

    // The previous access token was revoked by the rotation
    let stale = test::call_service(&app, logout_request(&issued.access_token).to_request()).await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(stale).await;
    assert_eq!(body["error"], "token_revoked");

    let current =
        test::call_service(&app, logout_request(&refreshed.access_token).to_request()).await;
    assert_eq!(current.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_without_header_is_empty_ok() {
    let app = test::init_service(create_app(test_state(false), &cors(), max_payload())).await;

    let req = TestRequest::post().uri("/api/v1/auth/refresh-token").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(test::read_body(resp).await.is_empty());
}

#[actix_web::test]
async fn test_refresh_with_other_scheme_is_empty_ok() {
    let app = test::init_service(create_app(test_state(false), &cors(), max_payload())).await;

    let req = TestRequest::post()
        .uri("/api/v1/auth/refresh-token")
        .insert_header(("authorization", "Basic YWRhOnNlY3JldA=="))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(test::read_body(resp).await.is_empty());
}

#[actix_web::test]
async fn test_strict_refresh_rejects_missing_header() {
    let app = test::init_service(create_app(test_state(true), &cors(), max_payload())).await;

    let req = TestRequest::post().uri("/api/v1/auth/refresh-token").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_token");
    assert_eq!(body["details"]["reason"], "missing_bearer");
}

#[actix_web::test]
async fn test_refresh_with_garbage_token_is_unauthorized() {
    let app = test::init_service(create_app(test_state(false), &cors(), max_payload())).await;

    let resp = test::call_service(&app, refresh_request("not.a.jwt").to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_token");
}

#[actix_web::test]
async fn test_refresh_for_unknown_subject_is_not_found() {
    // Tokens signed by a second gateway sharing the secret but not its users
    let other = test::init_service(create_app(test_state(false), &cors(), max_payload())).await;
    let resp = test::call_service(&other, signup_request("ghost@example.com").to_request()).await;
    let issued: AuthenticationResponse = test::read_body_json(resp).await;

    let app = test::init_service(create_app(test_state(false), &cors(), max_payload())).await;
    let resp = test::call_service(&app, refresh_request(&issued.refresh_token).to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
