use portal_server::domain::user::Role;
use serde_json::json;

mod common;
use common::TestApp;

#[tokio::test]
async fn admin_dashboard_shows_totals() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let employee = app.create_user("emp", None, Role::Employee).await;
    let emp_token = app.token_for(&employee);
    let admin_token = app.token_for(&admin);

    app.post_json(
        "/api/messages/send",
        Some(&emp_token),
        &json!({"recipient_id": admin.id, "content": "hi"}),
    )
    .await;
    app.post_json(
        "/v1/reports",
        Some(&emp_token),
        &json!({"report_type": "other", "title": "t", "content": "c"}),
    )
    .await;

    let (status, body) = app.get("/api/dashboard", Some(&admin_token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["role"], json!("admin"));
    assert_eq!(body["users_total"], json!(2));
    assert_eq!(body["messages_total"], json!(1));
    assert_eq!(body["reports_total"], json!(1));
}

#[tokio::test]
async fn employee_dashboard_shows_counts_and_recent_messages() {
    let app = TestApp::new();
    let employee = app.create_user("emp", None, Role::Employee).await;
    let parent = app.create_user("parent", Some("Pat Parent"), Role::Parent).await;
    let emp_token = app.token_for(&employee);
    let parent_token = app.token_for(&parent);

    app.post_json(
        "/api/messages/send",
        Some(&parent_token),
        &json!({"recipient_id": employee.id, "content": "question"}),
    )
    .await;
    app.post_json(
        "/api/messages/send",
        Some(&emp_token),
        &json!({"recipient_id": parent.id, "content": "answer"}),
    )
    .await;

    let (status, body) = app.get("/api/dashboard", Some(&emp_token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["role"], json!("employee"));
    assert_eq!(body["unread_messages"], json!(1));
    assert_eq!(body["sent_messages"], json!(1));
    assert_eq!(body["reports_total"], json!(0));
    let recent = body["recent_messages"].as_array().expect("recent messages");
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["sender_name"], json!("Pat Parent"));
}

#[tokio::test]
async fn parent_dashboard_shows_unread_and_recent() {
    let app = TestApp::new();
    let employee = app.create_user("emp", None, Role::Employee).await;
    let parent = app.create_user("parent", None, Role::Parent).await;
    let emp_token = app.token_for(&employee);
    let parent_token = app.token_for(&parent);

    app.post_json(
        "/api/messages/send",
        Some(&emp_token),
        &json!({"recipient_id": parent.id, "content": "notice"}),
    )
    .await;

    let (status, body) = app.get("/api/dashboard", Some(&parent_token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["role"], json!("parent"));
    assert_eq!(body["unread_messages"], json!(1));
    assert_eq!(body["recent_messages"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn student_gets_guest_dashboard() {
    let app = TestApp::new();
    let student = app.create_user("student", None, Role::Student).await;
    let token = app.token_for(&student);

    let (status, body) = app.get("/api/dashboard", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"role": "guest"}));
}
