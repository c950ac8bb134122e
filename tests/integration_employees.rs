use portal_server::domain::user::Role;
use serde_json::json;

mod common;
use common::TestApp;

async fn seed_directory(app: &TestApp, token: &str) -> (i64, i64) {
    let (status, body) =
        app.post_json("/v1/departments", Some(token), &json!({"name": "Mathematics"})).await;
    assert_eq!(status, 201);
    let department_id = body["id"].as_i64().expect("department id");

    let (status, body) =
        app.post_json("/v1/positions", Some(token), &json!({"name": "Lecturer"})).await;
    assert_eq!(status, 201);
    let position_id = body["id"].as_i64().expect("position id");

    (department_id, position_id)
}

#[tokio::test]
async fn employee_directory_lifecycle() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let token = app.token_for(&admin);
    let (department_id, position_id) = seed_directory(&app, &token).await;

    let (status, body) = app
        .post_json(
            "/v1/employees",
            Some(&token),
            &json!({
                "employee_code": "EMP-001",
                "first_name": "Ivan",
                "last_name": "Petrov",
                "email": "ipetrov@example.com",
                "department_id": department_id,
                "position_id": position_id,
                "hire_date": "2020-09-01",
            }),
        )
        .await;
    assert_eq!(status, 201);
    let id = body["id"].as_i64().expect("employee id");
    assert_eq!(body["full_name"], json!("Petrov Ivan"));
    assert_eq!(body["status"], json!("active"));
    assert_eq!(body["department"]["name"], json!("Mathematics"));
    assert_eq!(body["position"]["name"], json!("Lecturer"));
    assert_eq!(body["hire_date"], json!("2020-09-01"));

    let (status, body) = app
        .put_json(
            &format!("/v1/employees/{id}"),
            Some(&token),
            &json!({"email": "petrov@example.com", "is_contact_person": true}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["email"], json!("petrov@example.com"));
    assert_eq!(body["is_contact_person"], json!(true));

    // Dismissal keeps the record but removes it from the code lookup.
    let (status, body) = app.delete(&format!("/v1/employees/{id}"), Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], json!("dismissed"));

    let (status, _) = app.get(&format!("/v1/employees/{id}"), Some(&token)).await;
    assert_eq!(status, 200);
    let (status, _) = app.get("/v1/employees/lookup?code=EMP-001", Some(&token)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn duplicate_employee_code_is_a_conflict() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let token = app.token_for(&admin);
    let (department_id, position_id) = seed_directory(&app, &token).await;

    let payload = json!({
        "employee_code": "EMP-001",
        "first_name": "Ivan",
        "last_name": "Petrov",
        "email": "ipetrov@example.com",
        "department_id": department_id,
        "position_id": position_id,
    });
    let (status, _) = app.post_json("/v1/employees", Some(&token), &payload).await;
    assert_eq!(status, 201);
    let (status, _) = app.post_json("/v1/employees", Some(&token), &payload).await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn directory_mutations_require_admin() {
    let app = TestApp::new();
    let employee = app.create_user("emp", None, Role::Employee).await;
    let token = app.token_for(&employee);

    let (status, _) =
        app.post_json("/v1/departments", Some(&token), &json!({"name": "Physics"})).await;
    assert_eq!(status, 403);

    // Reads stay open to any signed-in account.
    let (status, _) = app.get("/v1/employees", Some(&token)).await;
    assert_eq!(status, 200);
    let (status, _) = app.get("/v1/employees", None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn lookup_requires_a_code() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let token = app.token_for(&admin);

    let (status, body) = app.get("/v1/employees/lookup", Some(&token)).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], json!("code is required"));

    let (status, _) = app.get("/v1/employees/lookup?code=NOPE", Some(&token)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn listing_filters_and_orders_by_surname() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let token = app.token_for(&admin);
    let (department_id, position_id) = seed_directory(&app, &token).await;

    for (code, first, last, contact) in [
        ("EMP-002", "Olga", "Sidorova", true),
        ("EMP-001", "Ivan", "Petrov", false),
    ] {
        let (status, _) = app
            .post_json(
                "/v1/employees",
                Some(&token),
                &json!({
                    "employee_code": code,
                    "first_name": first,
                    "last_name": last,
                    "email": format!("{}@example.com", code),
                    "department_id": department_id,
                    "position_id": position_id,
                    "is_contact_person": contact,
                }),
            )
            .await;
        assert_eq!(status, 201);
    }

    let (status, body) = app.get("/v1/employees", Some(&token)).await;
    assert_eq!(status, 200);
    let employees = body["employees"].as_array().expect("employee list");
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0]["last_name"], json!("Petrov"));
    assert_eq!(employees[1]["last_name"], json!("Sidorova"));

    let (status, body) = app.get("/v1/employees?contacts_only=true", Some(&token)).await;
    assert_eq!(status, 200);
    let contacts = body["employees"].as_array().expect("contact list");
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["employee_code"], json!("EMP-002"));

    let (status, body) = app.get("/v1/employees?search=sidor", Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["employees"].as_array().expect("search results").len(), 1);
}

#[tokio::test]
async fn employee_with_unknown_department_is_rejected() {
    let app = TestApp::new();
    let admin = app.create_user("admin", None, Role::Admin).await;
    let token = app.token_for(&admin);

    let (status, _) = app
        .post_json(
            "/v1/employees",
            Some(&token),
            &json!({
                "employee_code": "EMP-001",
                "first_name": "Ivan",
                "last_name": "Petrov",
                "email": "ipetrov@example.com",
                "department_id": 42,
                "position_id": 43,
            }),
        )
        .await;
    assert_eq!(status, 400);
}
