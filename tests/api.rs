use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use library_db::MemoryStore;
use library_kernel::settings::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    library_app::app(Arc::new(MemoryStore::new()), &Settings::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_author(app: &Router, body: Value) -> Value {
    let (status, author) = send(app, Method::POST, "/authors", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{author}");
    author
}

fn victor() -> Value {
    json!({"firstName": "Victor", "lastName": "Berestian", "birthday": "1991-06-14"})
}

#[tokio::test]
async fn health_check_answers_ok() {
    let (status, body) = send(&app(), Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "OK"}));
}

#[tokio::test]
async fn author_without_first_name_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/authors",
        Some(json!({"lastName": "Berestian", "birthday": "1991-06-14"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "First name missing");
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn author_without_last_name_is_rejected() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/authors",
        Some(json!({"firstName": "Victor", "birthday": "1991-06-14"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Last name missing");
}

#[tokio::test]
async fn author_with_invalid_birthday_is_unprocessable() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/authors",
        Some(json!({"firstName": "Victor", "lastName": "Berestian", "birthday": "0808-347-54"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid format for author's birthday");
    assert_eq!(body["details"][0]["field"], "birthday");
    assert_eq!(body["details"][0]["rule"], "isDate");
}

#[tokio::test]
async fn author_with_numeric_first_name_is_unprocessable() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/authors",
        Some(json!({"firstName": 123456, "lastName": "Victor", "birthday": "1991-06-14"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "First name must be a string");
    assert_eq!(body["error"], "Unprocessable Entity");
}

#[tokio::test]
async fn created_author_can_be_fetched_and_listed() {
    let app = app();
    let created = create_author(&app, victor()).await;
    assert_eq!(created["firstName"], "Victor");
    assert_eq!(created["lastName"], "Berestian");
    assert_eq!(created["birthday"], "1991-06-14");

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, Method::GET, &format!("/authors/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["firstName"], created["firstName"]);
    assert_eq!(fetched["lastName"], created["lastName"]);
    assert_eq!(fetched["birthday"], created["birthday"]);

    let (status, listed) = send(&app, Method::GET, "/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([fetched]));
}

#[tokio::test]
async fn patch_changes_only_the_given_field() {
    let app = app();
    let created = create_author(
        &app,
        json!({"firstName": "Joe", "lastName": "Dummy", "birthday": "1961-03-01"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/authors/{id}"),
        Some(json!({"firstName": "Victor"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["firstName"], "Victor");
    assert_eq!(updated["lastName"], "Dummy");
    assert_eq!(updated["birthday"], "1961-03-01");
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn unknown_author_is_not_found() {
    let app = app();
    for id in ["5e887b7cabf57701757a2062", "definitely-not-an-id"] {
        let (status, body) = send(&app, Method::GET, &format!("/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["message"], format!("No author with id '{id}' found"));
        assert!(body["traceId"].is_string());
    }
}

#[tokio::test]
async fn bodiless_patch_on_unknown_author_is_not_found() {
    let (status, _) = send(&app(), Method::PATCH, "/authors/5e887b7cabf57701757a2062", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_author_twice() {
    let app = app();
    let created = create_author(&app, victor()).await;
    let uri = format!("/authors/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn author_without_books_lists_empty() {
    let app = app();
    let created = create_author(&app, victor()).await;
    let uri = format!("/authors/{}/books", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, Method::GET, "/authors/5e887b7cabf57701757a2062/books", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn array_bodies_are_rejected_everywhere() {
    let app = app();
    let author = create_author(&app, victor()).await;
    let author_id = author["id"].as_str().unwrap();
    let (_, book) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({
            "title": "Book title",
            "authorId": author_id,
            "iban": "someIbanNumber",
            "publishedAt": "1993-01-01"
        })),
    )
    .await;
    let book_id = book["id"].as_str().unwrap();

    let cases = [
        (Method::POST, "/authors".to_string()),
        (Method::PATCH, format!("/authors/{author_id}")),
        (Method::POST, "/books".to_string()),
        (Method::PATCH, format!("/books/{book_id}")),
    ];

    for (method, uri) in cases {
        let (status, body) = send(&app, method, &uri, Some(json!([victor()]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], "Body should not be an array");
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/authors")
        .header("content-type", "application/json")
        .body(Body::from("{\"firstName\":"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn book_lifecycle_keeps_unpatched_fields() {
    let app = app();
    let author = create_author(&app, victor()).await;
    let author_id = author["id"].as_str().unwrap();

    let (status, book) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({
            "title": "Book title",
            "authorId": author_id,
            "iban": "someIbanNumber",
            "publishedAt": "1993-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/books/{}", book["id"].as_str().unwrap());

    let (status, patched) = send(&app, Method::PATCH, &uri, Some(json!({"iban": "NEW-IBAN"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["iban"], "NEW-IBAN");
    assert_eq!(patched["title"], "Book title");

    let (_, books) = send(&app, Method::GET, &format!("/authors/{author_id}/books"), None).await;
    assert_eq!(books, json!([patched]));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("No book with id"));
}

#[tokio::test]
async fn book_patch_with_invalid_values_is_unprocessable() {
    let app = app();
    let (status, book) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({
            "title": "Book title",
            "authorId": "5e887b7cabf57701757a2062",
            "iban": "someIbanNumber",
            "publishedAt": "1993-01-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/books/{}", book["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"title": 4333232}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "title must be a string");
    assert_eq!(body["error"], "Unprocessable Entity");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({"publishedAt": "someday"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "publishedAt must be a Date instance");

    let (status, stored) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, book);
}

#[tokio::test]
async fn book_missing_fields_are_listed() {
    let (status, body) = send(
        &app(),
        Method::POST,
        "/books",
        Some(json!({"publishedAt": "1993-01-01"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title is missing, Author is missing, IBAN is missing");
    assert_eq!(body["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn openapi_document_lists_the_routes() {
    let (status, body) = send(&app(), Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].is_object());
}
