use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use library_http::{json_body, AppError};

use super::models::Author;
use super::service::AuthorService;
use crate::modules::books::models::Book;

pub fn router(service: AuthorService) -> Router {
    Router::new()
        .route("/authors", get(list_authors).post(create_author))
        .route(
            "/authors/{id}",
            get(get_author).patch(update_author).delete(delete_author),
        )
        .route("/authors/{id}/books", get(list_author_books))
        .with_state(service)
}

async fn list_authors(State(service): State<AuthorService>) -> Result<Json<Vec<Author>>, AppError> {
    Ok(Json(service.list().await?))
}

async fn get_author(
    State(service): State<AuthorService>,
    Path(id): Path<String>,
) -> Result<Json<Author>, AppError> {
    Ok(Json(service.get(&id).await?))
}

async fn create_author(
    State(service): State<AuthorService>,
    body: Bytes,
) -> Result<(StatusCode, Json<Author>), AppError> {
    let input = json_body(&body)?;
    let author = service.create(&input).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

async fn update_author(
    State(service): State<AuthorService>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Author>, AppError> {
    let input = json_body(&body)?;
    Ok(Json(service.update(&id, &input).await?))
}

async fn delete_author(
    State(service): State<AuthorService>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_author_books(
    State(service): State<AuthorService>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.books_of(&id).await?))
}
