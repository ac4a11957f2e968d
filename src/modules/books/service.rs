use serde_json::Value;
use time::OffsetDateTime;

use super::models::{Book, FIELDS, RULES};
use super::repository::BookRepository;
use crate::error::{LibraryError, LibraryResult};
use crate::validation::{self, date, text};

#[derive(Clone)]
pub struct BookService {
    books: BookRepository,
}

fn not_found(id: &str) -> LibraryError {
    LibraryError::NotFound(format!("No book with id '{id}' found"))
}

impl BookService {
    pub fn new(books: BookRepository) -> Self {
        Self { books }
    }

    pub async fn get(&self, id: &str) -> LibraryResult<Book> {
        self.books.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// Validate and store a new book. `authorId` is taken as given.
    pub async fn create(&self, input: &Value) -> LibraryResult<Book> {
        let body = validation::require_object(input)?;
        let candidate = validation::pick(body, FIELDS);
        validation::check(&candidate, RULES)?;

        let now = OffsetDateTime::now_utc();
        let book = Book {
            id: String::new(),
            title: text(&candidate, "title")?,
            author_id: text(&candidate, "authorId")?,
            iban: text(&candidate, "iban")?,
            published_at: date(&candidate, "publishedAt")?,
            created_at: now,
            updated_at: now,
        };
        let book = self.books.save(book).await?;

        tracing::info!(book_id = %book.id, author_id = %book.author_id, "book created");
        Ok(book)
    }

    /// Each field present in `input` replaces its own stored value; absent
    /// fields keep theirs. The merged record must pass the full rule set.
    pub async fn update(&self, id: &str, input: &Value) -> LibraryResult<Book> {
        let body = validation::require_object(input)?;
        let mut book = self.get(id).await?;

        let mut candidate = book.to_document()?;
        validation::overlay(&mut candidate, body, FIELDS);
        validation::check(&candidate, RULES)?;

        book.title = text(&candidate, "title")?;
        book.author_id = text(&candidate, "authorId")?;
        book.iban = text(&candidate, "iban")?;
        book.published_at = date(&candidate, "publishedAt")?;
        book.updated_at = OffsetDateTime::now_utc();

        if !self.books.update(&book.id, &book).await? {
            return Err(not_found(id));
        }

        tracing::info!(book_id = %book.id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: &str) -> LibraryResult<String> {
        let book = self.get(id).await?;
        if !self.books.delete(&book.id).await? {
            return Err(not_found(id));
        }

        tracing::info!(book_id = %book.id, "book deleted");
        Ok(book.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use library_db::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;
    use time::macros::date;

    fn service() -> BookService {
        BookService::new(BookRepository::new(Arc::new(MemoryStore::new())))
    }

    fn book_input() -> Value {
        json!({
            "title": "Book title",
            "authorId": "5e887b7cabf57701757a2062",
            "iban": "someIbanNumber",
            "publishedAt": "1993-01-01"
        })
    }

    #[tokio::test]
    async fn create_stores_all_fields() {
        let books = service();
        let created = books.create(&book_input()).await.unwrap();

        let fetched = books.get(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Book title");
        assert_eq!(fetched.author_id, "5e887b7cabf57701757a2062");
        assert_eq!(fetched.iban, "someIbanNumber");
        assert_eq!(fetched.published_at, date!(1993 - 01 - 01));
    }

    #[tokio::test]
    async fn create_does_not_require_a_known_author() {
        let books = service();
        let mut input = book_input();
        input["authorId"] = json!("nobody");
        assert_eq!(books.create(&input).await.unwrap().author_id, "nobody");
    }

    #[tokio::test]
    async fn create_reports_missing_fields_together() {
        let books = service();
        let err = books
            .create(&json!({"publishedAt": "1993-01-01"}))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::MissingFields { .. }));
        assert_eq!(
            err.to_string(),
            "Title is missing, Author is missing, IBAN is missing"
        );
    }

    #[tokio::test]
    async fn create_rejects_wrong_types_and_bad_dates() {
        let books = service();

        let mut input = book_input();
        input["title"] = json!(42);
        let err = books.create(&input).await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidValue { .. }));
        assert_eq!(err.to_string(), "title must be a string");

        let mut input = book_input();
        input["publishedAt"] = json!("yesterday");
        assert_eq!(
            books.create(&input).await.unwrap_err().to_string(),
            "publishedAt must be a Date instance"
        );
    }

    #[tokio::test]
    async fn patching_iban_leaves_title_alone() {
        let books = service();
        let created = books.create(&book_input()).await.unwrap();

        let updated = books
            .update(&created.id, &json!({"iban": "NEW-IBAN"}))
            .await
            .unwrap();
        assert_eq!(updated.iban, "NEW-IBAN");
        assert_eq!(updated.title, "Book title");
        assert_eq!(updated.author_id, created.author_id);
        assert_eq!(updated.published_at, created.published_at);
    }

    #[tokio::test]
    async fn patching_published_at_only_moves_the_date() {
        let books = service();
        let created = books.create(&book_input()).await.unwrap();

        let updated = books
            .update(&created.id, &json!({"publishedAt": "2001-09-09"}))
            .await
            .unwrap();
        assert_eq!(updated.published_at, date!(2001 - 09 - 09));
        assert_eq!(updated.title, "Book title");
        assert_eq!(updated.iban, "someIbanNumber");
    }

    #[tokio::test]
    async fn patching_with_null_fails_presence() {
        let books = service();
        let created = books.create(&book_input()).await.unwrap();

        let err = books
            .update(&created.id, &json!({"title": null}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Title is missing");
        assert_eq!(books.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn patching_with_invalid_values_is_unprocessable() {
        let books = service();
        let created = books.create(&book_input()).await.unwrap();

        let err = books
            .update(&created.id, &json!({"title": 4333232}))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidValue { .. }));
        assert_eq!(err.to_string(), "title must be a string");

        let err = books
            .update(&created.id, &json!({"publishedAt": "0808-347-54"}))
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidValue { .. }));
        assert_eq!(err.to_string(), "publishedAt must be a Date instance");

        assert_eq!(books.get(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn unknown_book_is_not_found() {
        let books = service();
        let id = "5e887b7cabf57701757a2062";

        let err = books.get(id).await.unwrap_err();
        assert_eq!(err.to_string(), format!("No book with id '{id}' found"));
        assert!(matches!(
            books.update(id, &json!({"title": "x"})).await,
            Err(LibraryError::NotFound(_))
        ));
        assert!(matches!(books.delete(id).await, Err(LibraryError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_the_book() {
        let books = service();
        let created = books.create(&book_input()).await.unwrap();

        assert_eq!(books.delete(&created.id).await.unwrap(), created.id);
        assert!(matches!(
            books.get(&created.id).await,
            Err(LibraryError::NotFound(_))
        ));
    }
}
