//! HTTP-level integration tests for the `/clients` API endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, build_test_app, clinician_token, create_client, create_entry,
    delete, get, post_json, put_json, staff_token,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: POST /api/v1/clients returns 201 and accepts camelCase fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_client_returns_201() {
    let app = build_test_app();

    let response = post_json(
        app,
        "/api/v1/clients",
        &staff_token(),
        json!({
            "firstName": "Ada",
            "lastName": "Byron",
            "email": "ada@example.com",
            "dateOfBirth": "2015-12-10",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["first_name"], "Ada");
    assert_eq!(json["data"]["date_of_birth"], "2015-12-10");
    assert!(json["data"]["id"].is_i64());
}

// ---------------------------------------------------------------------------
// Test: validation failures return 400 VALIDATION_ERROR naming the field
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_client_validates_input() {
    let app = build_test_app();

    let response = post_json(
        app.clone(),
        "/api/v1/clients",
        &staff_token(),
        json!({ "first_name": "", "last_name": "Byron", "email": "not-an-email" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("first_name"), "got: {message}");
    assert!(message.contains("email"), "got: {message}");

    let missing = post_json(app, "/api/v1/clients", &staff_token(), json!({ "first_name": "Ada" })).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(missing).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: list is alphabetical by last name and honours pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_clients_paginates_alphabetically() {
    let app = build_test_app();
    create_client(&app, "Zoe", "Young").await;
    create_client(&app, "Ada", "Byron").await;
    create_client(&app, "Bob", "Adams").await;

    let json = body_json(get(app.clone(), "/api/v1/clients", &staff_token()).await).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["last_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Adams", "Byron", "Young"]);

    let page = body_json(get(app, "/api/v1/clients?limit=1&offset=1", &staff_token()).await).await;
    assert_eq!(page["data"].as_array().unwrap().len(), 1);
    assert_eq!(page["data"][0]["last_name"], "Byron");
}

// ---------------------------------------------------------------------------
// Test: GET / PUT on a client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_and_update_client() {
    let app = build_test_app();
    let id = create_client(&app, "Ada", "Byron").await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/clients/{id}"),
        &staff_token(),
        json!({ "phone": "555-0100" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app.clone(), &format!("/api/v1/clients/{id}"), &staff_token()).await).await;
    assert_eq!(json["data"]["phone"], "555-0100");
    assert_eq!(json["data"]["first_name"], "Ada");

    let missing = get(app, "/api/v1/clients/999", &staff_token()).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(missing).await["error"], "Client with id 999 not found");
}

// ---------------------------------------------------------------------------
// Test: DELETE is admin only and cascades to waitlist entries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_client_requires_admin_and_cascades() {
    let app = build_test_app();
    let id = create_client(&app, "Ada", "Byron").await;
    let entry = create_entry(&app, json!({ "client_id": id })).await;
    let uri = format!("/api/v1/clients/{id}");

    let forbidden = delete(app.clone(), &uri, &clinician_token()).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let response = delete(app.clone(), &uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let gone = get(app.clone(), &uri, &staff_token()).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);

    let orphan = get(
        app.clone(),
        &format!("/api/v1/waitlist/{}", entry["id"]),
        &staff_token(),
    )
    .await;
    assert_eq!(orphan.status(), StatusCode::NOT_FOUND);

    let again = delete(app, &uri, &admin_token()).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}
