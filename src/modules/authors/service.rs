use serde_json::Value;
use time::OffsetDateTime;

use super::models::{Author, FIELDS, RULES};
use super::repository::AuthorRepository;
use crate::error::{LibraryError, LibraryResult};
use crate::modules::books::{models::Book, repository::BookRepository};
use crate::validation::{self, date, text};

/// Author use cases: validation in front of the author repository, plus the
/// author-to-books lookup.
#[derive(Clone)]
pub struct AuthorService {
    authors: AuthorRepository,
    books: BookRepository,
}

fn not_found(id: &str) -> LibraryError {
    LibraryError::NotFound(format!("No author with id '{id}' found"))
}

impl AuthorService {
    pub fn new(authors: AuthorRepository, books: BookRepository) -> Self {
        Self { authors, books }
    }

    pub async fn list(&self) -> LibraryResult<Vec<Author>> {
        self.authors.find_all().await
    }

    pub async fn get(&self, id: &str) -> LibraryResult<Author> {
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, input: &Value) -> LibraryResult<Author> {
        let body = validation::require_object(input)?;
        let candidate = validation::pick(body, FIELDS);
        validation::check(&candidate, RULES)?;

        let author = Author::new(
            text(&candidate, "firstName")?,
            text(&candidate, "lastName")?,
            date(&candidate, "birthday")?,
            OffsetDateTime::now_utc(),
        );
        let author = self.authors.save(author).await?;

        tracing::info!(author_id = %author.id, "author created");
        Ok(author)
    }

    /// Apply the fields present in `input`, re-validate the whole record and
    /// replace it. Concurrent updates are last-write-wins.
    pub async fn update(&self, id: &str, input: &Value) -> LibraryResult<Author> {
        let body = validation::require_object(input)?;
        let mut author = self.get(id).await?;

        let mut candidate = author.to_document()?;
        validation::overlay(&mut candidate, body, FIELDS);
        validation::check(&candidate, RULES)?;

        author.first_name = text(&candidate, "firstName")?;
        author.last_name = text(&candidate, "lastName")?;
        author.birthday = date(&candidate, "birthday")?;
        author.updated_at = OffsetDateTime::now_utc();

        // The record may have been deleted since it was loaded
        if !self.authors.update(&author.id, &author).await? {
            return Err(not_found(id));
        }

        tracing::info!(author_id = %author.id, "author updated");
        Ok(author)
    }

    /// Remove the author and return its id. Its books are left in place.
    pub async fn delete(&self, id: &str) -> LibraryResult<String> {
        let author = self.get(id).await?;
        if !self.authors.delete(&author.id).await? {
            return Err(not_found(id));
        }

        tracing::info!(author_id = %author.id, "author deleted");
        Ok(author.id)
    }

    /// Books whose `authorId` is this author's id
    pub async fn books_of(&self, id: &str) -> LibraryResult<Vec<Book>> {
        let author = self.get(id).await?;
        self.books.find_by_author_id(&author.id).await
    }
}
