use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn manager_can_invite_and_remove_members() {
    let app = TestApp::spawn().await;
    let (_, manager) = app.create_user_with_role("boss", "password123", "Manager").await;
    app.create_user_with_role("crew1", "password123", "Staff").await;

    let res = app
        .post_with_token(routes::MEMBER_INVITE, &json!({ "username": "crew1" }), &manager)
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["username"], "crew1");
    assert_eq!(res.body["role"], "Staff");
    assert_eq!(res.body["invited_by_username"], "boss");
    let member_id = res.body["id"].as_i64().unwrap();

    let res = app.get_with_token(routes::MEMBERS, &manager).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body.as_array().unwrap().len(), 1);

    let res = app.delete_with_token(&routes::member(member_id), &manager).await;
    assert_eq!(res.status, 204);

    let res = app.get_with_token(routes::MEMBERS, &manager).await;
    assert!(res.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn staff_cannot_manage_members() {
    let app = TestApp::spawn().await;
    let (_, staff) = app.create_user_with_role("crew2", "password123", "Staff").await;

    let res = app
        .post_with_token(routes::MEMBER_INVITE, &json!({ "username": "crew2" }), &staff)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");

    let res = app.delete_with_token(&routes::member(1), &staff).await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn inviting_unknown_username_is_not_found() {
    let app = TestApp::spawn().await;
    let (_, manager) = app.create_user_with_role("boss", "password123", "Manager").await;

    let res = app
        .post_with_token(routes::MEMBER_INVITE, &json!({ "username": "ghost" }), &manager)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn double_invite_is_a_conflict() {
    let app = TestApp::spawn().await;
    let (_, manager) = app.create_user_with_role("boss", "password123", "Manager").await;
    app.create_user_with_role("crew3", "password123", "Staff").await;

    let res = app
        .post_with_token(routes::MEMBER_INVITE, &json!({ "username": "crew3" }), &manager)
        .await;
    assert_eq!(res.status, 201);

    let res = app
        .post_with_token(routes::MEMBER_INVITE, &json!({ "username": "crew3" }), &manager)
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn removing_unknown_member_is_not_found() {
    let app = TestApp::spawn().await;
    let (_, manager) = app.create_user_with_role("boss", "password123", "Manager").await;

    let res = app.delete_with_token(&routes::member(9999), &manager).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
