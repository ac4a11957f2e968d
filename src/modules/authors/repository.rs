use std::sync::Arc;

use library_db::DocumentStore;

use super::models::Author;
use crate::error::LibraryResult;

pub const COLLECTION: &str = "authors";

/// Persistence of [`Author`] records in the `authors` collection
#[derive(Clone)]
pub struct AuthorRepository {
    store: Arc<dyn DocumentStore>,
}

impl AuthorRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> LibraryResult<Vec<Author>> {
        let documents = self.store.find_all(COLLECTION).await?;
        Ok(documents
            .into_iter()
            .map(Author::from_document)
            .collect::<Result<_, _>>()?)
    }

    /// `None` both for unknown ids and ids the store cannot parse
    pub async fn find_by_id(&self, id: &str) -> LibraryResult<Option<Author>> {
        match self.store.find_by_id(COLLECTION, id).await? {
            Some(document) => Ok(Some(Author::from_document(document)?)),
            None => Ok(None),
        }
    }

    /// Insert the author and return it with its assigned id
    pub async fn save(&self, mut author: Author) -> LibraryResult<Author> {
        author.id = self.store.insert(COLLECTION, author.to_document()?).await?;
        Ok(author)
    }

    /// Replace the whole stored document; `false` when the id matched nothing
    pub async fn update(&self, id: &str, author: &Author) -> LibraryResult<bool> {
        Ok(self
            .store
            .replace(COLLECTION, id, author.to_document()?)
            .await?)
    }

    pub async fn delete(&self, id: &str) -> LibraryResult<bool> {
        Ok(self.store.delete(COLLECTION, id).await?)
    }
}
