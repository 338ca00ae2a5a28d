#[path = "../common/memory_store.rs"]
mod memory_store;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tower::ServiceExt;

use memory_store::MemoryStore;
use people_pets_api::{routes::create_router, state::AppState};

fn app_with(store: Arc<MemoryStore>) -> Router {
    create_router(AppState::with_store(store), "public")
}

fn app() -> Router {
    app_with(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_person(app: &Router, name: &str, email: &str, age: i64) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/people",
        Some(json!({ "name": name, "email": email, "age": age })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

async fn create_pet(app: &Router, person_id: i64, name: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/pets",
        Some(json!({ "person_id": person_id, "name": name, "species": "dog", "age": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_non_integer_id_is_rejected_on_every_id_route() {
    let store = Arc::new(MemoryStore::new());
    // Any storage access would fail with a 500
    store.broken.store(true, Ordering::Relaxed);
    let app = app_with(store);

    let routes = [
        (Method::GET, "/people/abc"),
        (Method::PUT, "/people/abc"),
        (Method::DELETE, "/people/abc"),
        (Method::GET, "/people/1.5/pets"),
        (Method::GET, "/pets/abc"),
        (Method::PUT, "/pets/5.0"),
        (Method::DELETE, "/pets/x"),
    ];
    for (method, uri) in routes {
        let body = (method == Method::PUT).then(|| json!({ "name": "Bo" }));
        let (status, error) = send(&app, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(error["code"], "INVALID_ID");
        assert_eq!(error["message"], "Parameter 'id' must be an integer.");
    }
}

#[tokio::test]
async fn test_created_person_echoes_fields_with_new_id() {
    let app = app();
    let first = create_person(&app, "Ada", "ada@example.com", 36).await;
    let second = create_person(&app, "Grace", "grace@example.com", 45).await;

    assert_eq!(first["name"], "Ada");
    assert_eq!(first["email"], "ada@example.com");
    assert_eq!(first["age"], 36);
    assert!(first["id"].is_i64());
    assert_ne!(first["id"], second["id"]);

    let (status, listed) = send(&app, Method::GET, "/people", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_create_person_validation_messages() {
    let app = app();

    let (status, error) = send(&app, Method::POST, "/people", Some(json!({ "name": "Ada" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error["message"],
        "Required parameters were missing from the request: 'email' and 'age'."
    );

    let (status, error) = send(
        &app,
        Method::POST,
        "/people",
        Some(json!({ "name": "Ada", "email": "ada@example.com", "age": 36.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Parameter 'age' must be an integer.");

    for email in ["a@b", "abc", "@b.com"] {
        let (status, error) = send(
            &app,
            Method::POST,
            "/people",
            Some(json!({ "name": "Ada", "email": email, "age": 36 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{email}");
        assert_eq!(error["message"], "Parameter 'email' was invalid.");
    }

    let (status, _) = send(&app, Method::GET, "/people", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_body_must_be_a_json_object() {
    let app = app();
    let (status, error) = send(&app, Method::POST, "/people", Some(json!([1, 2, 3]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_BODY");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/pets")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_partial_put_preserves_unspecified_fields() {
    let app = app();
    let person = create_person(&app, "Ada", "ada@example.com", 30).await;
    let uri = format!("/people/{}", person["id"]);

    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({ "age": 31 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["age"], 31);
    assert_eq!(updated["name"], "Ada");
    assert_eq!(updated["email"], "ada@example.com");

    let (status, error) = send(&app, Method::PUT, &uri, Some(json!({ "email": "nope" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["message"], "Parameter 'email' was invalid.");

    let (_, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_integral_float_age_is_accepted() {
    let app = app();
    let (status, person) = send(
        &app,
        Method::POST,
        "/people",
        Some(json!({ "name": "Bo", "email": "bo@example.de", "age": 5.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{person}");
    assert_eq!(person["age"], 5);

    let (status, error) = send(
        &app,
        Method::POST,
        "/people",
        Some(json!({ "name": "Bo", "email": "bo@example.de", "age": 5.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "NOT_AN_INTEGER");
}

#[tokio::test]
async fn test_bodiless_put_leaves_record_unchanged() {
    let app = app();
    let person = create_person(&app, "Ada", "ada@example.com", 30).await;
    let uri = format!("/people/{}", person["id"]);

    let (status, updated) = send(&app, Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated, person);

    let pet = create_pet(&app, person["id"].as_i64().unwrap(), "Rex").await;
    let (status, updated) = send(&app, Method::PUT, &format!("/pets/{}", pet["id"]), None).await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated, pet);
}

#[tokio::test]
async fn test_bodiless_post_reports_missing_fields() {
    let app = app();
    let (status, error) = send(&app, Method::POST, "/people", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "MISSING_REQUIRED_FIELDS");
    assert_eq!(
        error["message"],
        "Required parameters were missing from the request: 'name', 'email' and 'age'."
    );
}

#[tokio::test]
async fn test_put_missing_person_is_not_found() {
    let app = app();
    let (status, error) = send(&app, Method::PUT, "/people/77", Some(json!({ "age": 1 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "No person was found with the id 77.");
}

#[tokio::test]
async fn test_pet_owner_is_immutable_regardless_of_value() {
    let app = app();
    let person = create_person(&app, "Ada", "ada@example.com", 30).await;
    let pet = create_pet(&app, person["id"].as_i64().unwrap(), "Rex").await;
    let uri = format!("/pets/{}", pet["id"]);

    for owner in [person["id"].clone(), json!(999), json!(null)] {
        let (status, error) = send(
            &app,
            Method::PUT,
            &uri,
            Some(json!({ "name": "Max", "person_id": owner })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error["message"], "The parameter 'person_id' cannot be changed.");
    }

    let (_, unchanged) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(unchanged["name"], "Rex");

    let (status, renamed) = send(&app, Method::PUT, &uri, Some(json!({ "name": "Max" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Max");
    assert_eq!(renamed["species"], "dog");
    assert_eq!(renamed["person_id"], person["id"]);
}

#[tokio::test]
async fn test_pet_for_missing_person_is_not_found() {
    let app = app();
    let (status, error) = send(
        &app,
        Method::POST,
        "/pets",
        Some(json!({ "person_id": 4040, "name": "Rex", "species": "dog", "age": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "OWNER_NOT_FOUND");
    assert_eq!(error["message"], "No person was found with the id 4040.");
}

#[tokio::test]
async fn test_nested_pets_list() {
    let app = app();
    let owner = create_person(&app, "Ada", "ada@example.com", 30).await;
    let loner = create_person(&app, "Bo", "bo@example.com", 40).await;
    create_pet(&app, owner["id"].as_i64().unwrap(), "Rex").await;
    create_pet(&app, owner["id"].as_i64().unwrap(), "Tom").await;

    let (status, pets) = send(&app, Method::GET, &format!("/people/{}/pets", owner["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pets.as_array().map(Vec::len), Some(2));

    let (status, pets) = send(&app, Method::GET, &format!("/people/{}/pets", loner["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pets, json!([]));

    let (status, _) = send(&app, Method::GET, "/people/999/pets", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_person_removes_their_pets() {
    let app = app();
    let person = create_person(&app, "Ada", "ada@example.com", 30).await;
    let pet = create_pet(&app, person["id"].as_i64().unwrap(), "Rex").await;

    let (status, deleted) = send(&app, Method::DELETE, &format!("/people/{}", person["id"]), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, person);

    let (status, _) = send(&app, Method::GET, &format!("/pets/{}", pet["id"]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, pets) = send(&app, Method::GET, "/pets", None).await;
    assert_eq!(pets, json!([]));
    let (status, _) = send(&app, Method::GET, &format!("/people/{}", person["id"]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_pet_returns_deleted_row() {
    let app = app();
    let person = create_person(&app, "Ada", "ada@example.com", 30).await;
    let pet = create_pet(&app, person["id"].as_i64().unwrap(), "Rex").await;
    let uri = format!("/pets/{}", pet["id"]);

    let (status, deleted) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, pet);

    let (status, error) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "PET_NOT_FOUND");
}

#[tokio::test]
async fn test_storage_failure_is_an_opaque_500() {
    let store = Arc::new(MemoryStore::new());
    store.broken.store(true, Ordering::Relaxed);
    let app = app_with(store);

    let (status, body) = send(&app, Method::GET, "/people", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_every_response_carries_a_request_id() {
    let response = app()
        .oneshot(Request::builder().uri("/people").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unrouted_paths_fall_back_to_public_dir() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app()
        .oneshot(Request::builder().uri("/missing.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
