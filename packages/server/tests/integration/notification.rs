use chrono::{Duration, Utc};
use common::DefectStatus;
use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn only_due_unacknowledged_records_are_pending() {
    let app = TestApp::spawn().await;
    let (uid, token) = app.create_user_with_role("watcher", "password123", "Staff").await;
    let now = Utc::now();

    let due = app
        .insert_defect_due_at("due", uid, Some(now - Duration::seconds(30)), false, DefectStatus::OnProgress)
        .await;
    app.insert_defect_due_at("not yet due", uid, Some(now + Duration::hours(1)), false, DefectStatus::OnProgress)
        .await;
    app.insert_defect_due_at("already seen", uid, Some(now - Duration::seconds(30)), true, DefectStatus::OnProgress)
        .await;
    app.insert_defect_due_at("no reminder", uid, None, false, DefectStatus::OnProgress)
        .await;

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    assert_eq!(res.status, 200);
    let items = res.body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], due);
    assert_eq!(items[0]["name"], "due");
    assert_eq!(items[0]["created_by_username"], "watcher");
}

#[tokio::test]
async fn pending_is_ordered_earliest_due_first() {
    let app = TestApp::spawn().await;
    let (uid, token) = app.create_user_with_role("watcher", "password123", "Staff").await;
    let now = Utc::now();

    app.insert_defect_due_at("middle", uid, Some(now - Duration::minutes(10)), false, DefectStatus::OnProgress)
        .await;
    app.insert_defect_due_at("oldest", uid, Some(now - Duration::hours(2)), false, DefectStatus::OnProgress)
        .await;
    app.insert_defect_due_at("newest", uid, Some(now - Duration::seconds(5)), false, DefectStatus::OnProgress)
        .await;

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    let names: Vec<&str> = res.body.as_array().unwrap().iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["oldest", "middle", "newest"]);
}

#[tokio::test]
async fn freshly_created_defect_with_delay_is_not_yet_pending() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_user_with_role("watcher", "password123", "Staff").await;

    let res = app.create_defect(&token, "later", Some(3600)).await;
    assert_eq!(res.status, 201);

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    assert_eq!(res.status, 200);
    assert!(res.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn acknowledge_removes_from_pending_and_is_idempotent() {
    let app = TestApp::spawn().await;
    let (uid, token) = app.create_user_with_role("watcher", "password123", "Staff").await;
    let now = Utc::now();

    let id = app
        .insert_defect_due_at("nagging", uid, Some(now - Duration::minutes(1)), false, DefectStatus::OnProgress)
        .await;

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);

    let first = app
        .patch_with_token(&routes::defect_mark_notified(id.into()), &json!({}), &token)
        .await;
    assert_eq!(first.status, 200);
    assert_eq!(first.body["is_notified"], true);

    // Client and poller may race; a repeat acknowledge is a success no-op.
    let second = app
        .patch_with_token(&routes::defect_mark_notified(id.into()), &json!({}), &token)
        .await;
    assert_eq!(second.status, 200);
    assert_eq!(second.body["is_notified"], true);

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    assert!(res.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn acknowledging_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;
    let (_, token) = app.create_user_with_role("watcher", "password123", "Staff").await;

    let res = app
        .patch_with_token(&routes::defect_mark_notified(424242), &json!({}), &token)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn finished_records_never_reappear_in_pending() {
    let app = TestApp::spawn().await;
    let (uid, token) = app.create_user_with_role("watcher", "password123", "Staff").await;
    let now = Utc::now();

    // Due, never acknowledged, but already finished: permanently suppressed.
    app.insert_defect_due_at("repaired early", uid, Some(now - Duration::hours(1)), false, DefectStatus::Finish)
        .await;

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    assert_eq!(res.status, 200);
    assert!(res.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn finishing_a_due_defect_suppresses_its_reminder() {
    let app = TestApp::spawn().await;
    let (uid, token) = app.create_user_with_role("watcher", "password123", "Staff").await;
    let now = Utc::now();

    let id = app
        .insert_defect_due_at("overdue repair", uid, Some(now - Duration::minutes(5)), false, DefectStatus::OnProgress)
        .await;

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);

    app.patch_with_token(
        &routes::defect_after_photo(id.into()),
        &json!({ "after_photo": "data:image/jpeg;base64,/9j/after" }),
        &token,
    )
    .await;
    let res = app
        .patch_with_token(&routes::defect_status(id.into()), &json!({ "status": "Finish" }), &token)
        .await;
    assert_eq!(res.status, 200);

    let res = app.get_with_token(routes::PENDING_NOTIFICATIONS, &token).await;
    assert!(res.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn acknowledging_a_finished_record_still_succeeds() {
    let app = TestApp::spawn().await;
    let (uid, token) = app.create_user_with_role("watcher", "password123", "Staff").await;
    let now = Utc::now();

    let id = app
        .insert_defect_due_at("done but unseen", uid, Some(now - Duration::hours(1)), false, DefectStatus::Finish)
        .await;

    let res = app
        .patch_with_token(&routes::defect_mark_notified(id.into()), &json!({}), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["is_notified"], true);
    assert_eq!(res.body["status"], "Finish");
}
