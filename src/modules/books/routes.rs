use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use library_http::{json_body, AppError};

use super::models::Book;
use super::service::BookService;

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/books", post(create_book))
        .route(
            "/books/{id}",
            get(get_book).patch(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.get(&id).await?))
}

async fn create_book(
    State(service): State<BookService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let input = json_body(&body)?;
    let book = service.create(&input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Book>, AppError> {
    let input = json_body(&body)?;
    Ok(Json(service.update(&id, &input).await?))
}

async fn delete_book(
    State(service): State<BookService>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
