use std::sync::Arc;

use library_db::DocumentStore;
use serde_json::Value;

use super::models::Book;
use crate::error::LibraryResult;

pub const COLLECTION: &str = "books";
/// Field linking a book to its author
pub const AUTHOR_FIELD: &str = "authorId";

/// Persistence of [`Book`] records in the `books` collection
#[derive(Clone)]
pub struct BookRepository {
    store: Arc<dyn DocumentStore>,
}

impl BookRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// `None` both for unknown ids and ids the store cannot parse
    pub async fn find_by_id(&self, id: &str) -> LibraryResult<Option<Book>> {
        match self.store.find_by_id(COLLECTION, id).await? {
            Some(document) => Ok(Some(Book::from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Books whose `authorId` equals `author_id`
    pub async fn find_by_author_id(&self, author_id: &str) -> LibraryResult<Vec<Book>> {
        let documents = self
            .store
            .find_by_field(COLLECTION, AUTHOR_FIELD, &Value::from(author_id))
            .await?;
        Ok(documents
            .into_iter()
            .map(Book::from_document)
            .collect::<Result<_, _>>()?)
    }

    /// Insert the book and return it with its assigned id
    pub async fn save(&self, mut book: Book) -> LibraryResult<Book> {
        book.id = self.store.insert(COLLECTION, book.to_document()?).await?;
        Ok(book)
    }

    /// Replace the whole stored document; `false` when the id matched nothing
    pub async fn update(&self, id: &str, book: &Book) -> LibraryResult<bool> {
        Ok(self.store.replace(COLLECTION, id, book.to_document()?).await?)
    }

    pub async fn delete(&self, id: &str) -> LibraryResult<bool> {
        Ok(self.store.delete(COLLECTION, id).await?)
    }
}
