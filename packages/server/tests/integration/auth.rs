use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::spawn().await;
    let res = app.get_without_token(routes::HEALTH).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "OK");
    assert!(res.body["timestamp"].is_string());
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({ "username": "foreman", "password": "password123", "role": "Manager" }),
        )
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["username"], "foreman");
    assert_eq!(res.body["role"], "Manager");
    assert!(res.body["id"].is_number());

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "username": "foreman", "password": "password123" }),
        )
        .await;
    assert_eq!(res.status, 200);
    assert!(res.body["token"].is_string());
    assert_eq!(res.body["role"], "Manager");
}

#[tokio::test]
async fn register_defaults_to_staff_role() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({ "username": "worker1", "password": "password123" }),
        )
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["role"], "Staff");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = TestApp::spawn().await;
    app.create_user_with_role("taken", "password123", "Staff").await;

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({ "username": "taken", "password": "password456" }),
        )
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "USERNAME_TAKEN");
}

#[tokio::test]
async fn invalid_role_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::REGISTER,
            &json!({ "username": "odd", "password": "password123", "role": "Admin" }),
        )
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.create_user_with_role("staff1", "password123", "Staff").await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({ "username": "staff1", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn me_reflects_token_identity() {
    let app = TestApp::spawn().await;
    let (id, token) = app.create_user_with_role("staff2", "password123", "Staff").await;

    let res = app.get_with_token(routes::ME, &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["id"], id);
    assert_eq!(res.body["username"], "staff2");
    assert_eq!(res.body["role"], "Staff");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::DEFECTS).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");

    let res = app.get_with_token(routes::DEFECTS, "not-a-jwt").await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_INVALID");
}
