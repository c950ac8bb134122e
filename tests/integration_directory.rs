use portal_server::domain::user::Role;
use serde_json::json;

mod common;
use common::TestApp;

#[tokio::test]
async fn admin_can_provision_accounts() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .post_json(
            "/v1/users",
            Some(&token),
            &json!({
                "username": "teacher1",
                "password": "s3cret-enough",
                "full_name": "Terry Teacher",
                "role": "employee",
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["username"], json!("teacher1"));
    assert_eq!(body["display_name"], json!("Terry Teacher"));
    assert_eq!(body["role"], json!("employee"));
    assert_eq!(body["is_active"], json!(true));

    // The new account can log in.
    let (status, _) = app
        .post_json(
            "/v1/sessions",
            None,
            &json!({"username": "teacher1", "password": "s3cret-enough"}),
        )
        .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn non_admin_cannot_provision_accounts() {
    let app = TestApp::new();
    let employee = app.create_user("emp", None, Role::Employee).await;
    let token = app.token_for(&employee);

    let (status, _) = app
        .post_json(
            "/v1/users",
            Some(&token),
            &json!({"username": "x", "password": "p", "role": "parent"}),
        )
        .await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    app.create_user("taken", None, Role::Parent).await;
    let token = app.token_for(&admin);

    let (status, body) = app
        .post_json(
            "/v1/users",
            Some(&token),
            &json!({"username": "taken", "password": "pw123456", "role": "parent"}),
        )
        .await;
    assert_eq!(status, 409);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn listing_filters_by_role() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    app.create_user("emp1", None, Role::Employee).await;
    app.create_user("emp2", None, Role::Employee).await;
    app.create_user("parent1", None, Role::Parent).await;
    let token = app.token_for(&admin);

    let (status, body) = app.get("/v1/users?role=employee", Some(&token)).await;
    assert_eq!(status, 200);
    let users = body["users"].as_array().expect("users array");
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u["role"] == json!("employee")));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let token = app.token_for(&admin);

    let (status, _) = app.get("/v1/users/9999", Some(&token)).await;
    assert_eq!(status, 404);
}
