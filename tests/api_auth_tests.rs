//! 认证 API 集成测试

use axum::http::StatusCode;
use chirpy::auth::{
    jwt::{JwtService, ACCESS_TOKEN_TTL_SECS},
    refresh_token::hash_token,
};
use chirpy::repository::RefreshTokenStore;
use chrono::{Duration, Utc};
use serde_json::json;

mod common;
use common::{body_json, empty_request, TestApp, JWT_SECRET};

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    let user = app.create_user("a@x.com", "secret123").await;

    let login = app.login("a@x.com", "secret123").await;

    assert_eq!(login["id"], user["id"]);
    assert_eq!(login["email"], "a@x.com");
    assert_eq!(login["is_chirpy_red"], false);
    assert!(login["created_at"].is_string());
    assert!(login["updated_at"].is_string());
    assert!(login.get("hashed_password").is_none());

    // 访问令牌属于该用户，有效期一小时
    let token = login["token"].as_str().unwrap();
    let jwt = JwtService::new(JWT_SECRET.as_bytes()).unwrap();
    assert_eq!(jwt.validate(token).unwrap().to_string(), user["id"].as_str().unwrap());

    // 刷新令牌已持久化，有效期 60 天
    let refresh_token = login["refresh_token"].as_str().unwrap();
    assert_eq!(refresh_token.len(), 64);
    let record = app
        .state
        .stores
        .refresh_tokens
        .find(&hash_token(refresh_token))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.user_id.to_string(), user["id"].as_str().unwrap());
    assert!(record.revoked_at.is_none());
    let lifetime = record.expires_at - record.created_at;
    assert_eq!(lifetime, Duration::days(60));
    assert!(record.expires_at > Utc::now() + Duration::seconds(ACCESS_TOKEN_TTL_SECS));
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_look_the_same() {
    let app = TestApp::new();
    app.create_user("a@x.com", "secret123").await;

    let wrong_password = app
        .post_json("/api/login", json!({"email": "a@x.com", "password": "secret124"}), None)
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = body_json(wrong_password).await;

    let unknown_email = app
        .post_json("/api/login", json!({"email": "b@x.com", "password": "secret123"}), None)
        .await;
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email = body_json(unknown_email).await;

    assert_eq!(wrong_password["error"]["message"], "Incorrect email or password");
    assert_eq!(wrong_password["error"]["message"], unknown_email["error"]["message"]);
    assert_eq!(wrong_password["error"]["code"], unknown_email["error"]["code"]);
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = TestApp::new();
    let (user_id, _, refresh_token) = app.signup("a@x.com", "secret123").await;

    let response = app
        .send(empty_request("POST", "/api/refresh", Some(&format!("Bearer {}", refresh_token))))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let jwt = JwtService::new(JWT_SECRET.as_bytes()).unwrap();
    let subject = jwt.validate(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(subject.to_string(), user_id);
}

#[tokio::test]
async fn test_refresh_rejects_access_token_and_garbage() {
    let app = TestApp::new();
    let (_, access_token, _) = app.signup("a@x.com", "secret123").await;

    let response = app
        .send(empty_request("POST", "/api/refresh", Some(&format!("Bearer {}", access_token))))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(empty_request("POST", "/api/refresh", Some("Bearer deadbeef")))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(empty_request("POST", "/api/refresh", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_after_revoke_fails() {
    let app = TestApp::new();
    let (_, _, refresh_token) = app.signup("a@x.com", "secret123").await;
    let bearer = format!("Bearer {}", refresh_token);

    let response = app.send(empty_request("POST", "/api/revoke", Some(&bearer))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.send(empty_request("POST", "/api/refresh", Some(&bearer))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoke_twice_succeeds() {
    let app = TestApp::new();
    let (_, _, refresh_token) = app.signup("a@x.com", "secret123").await;
    let bearer = format!("Bearer {}", refresh_token);

    let first = app.send(empty_request("POST", "/api/revoke", Some(&bearer))).await;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    let revoked_at = app
        .state
        .stores
        .refresh_tokens
        .find(&hash_token(&refresh_token))
        .await
        .unwrap()
        .unwrap()
        .revoked_at;

    let second = app.send(empty_request("POST", "/api/revoke", Some(&bearer))).await;
    assert_eq!(second.status(), StatusCode::NO_CONTENT);

    let record = app
        .state
        .stores
        .refresh_tokens
        .find(&hash_token(&refresh_token))
        .await
        .unwrap()
        .unwrap();
    assert!(revoked_at.is_some());
    assert_eq!(record.revoked_at, revoked_at);
}

#[tokio::test]
async fn test_revoke_unknown_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .send(empty_request("POST", "/api/revoke", Some("Bearer not-a-token")))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_concurrent_revoke_and_refresh() {
    let app = TestApp::new();
    let (_, _, refresh_token) = app.signup("a@x.com", "secret123").await;
    let bearer = format!("Bearer {}", refresh_token);

    let (revoke, refresh) = tokio::join!(
        app.send(empty_request("POST", "/api/revoke", Some(&bearer))),
        app.send(empty_request("POST", "/api/refresh", Some(&bearer))),
    );

    // 刷新可能先于撤销完成，但撤销一定成功
    assert_eq!(revoke.status(), StatusCode::NO_CONTENT);
    assert!(matches!(refresh.status(), StatusCode::OK | StatusCode::UNAUTHORIZED));

    // 撤销完成之后的刷新必然失败
    let after = app.send(empty_request("POST", "/api/refresh", Some(&bearer))).await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_malformed_body() {
    let app = TestApp::new();

    let response = app
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/login")
                .header("content-type", "application/json")
                .body(axum::body::Body::from("{not json"))
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], 400);
    assert_eq!(body["error"]["message"], "Request body is not valid JSON");
    assert!(body["error"]["request_id"].is_string());
}

#[tokio::test]
async fn test_login_missing_field_uses_error_envelope() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/login", json!({"email": "a@x.com", "password": 12345678}), None)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "Request body has missing or invalid fields");
    assert!(!body.to_string().contains("12345678"));
}
