//! Document store facade used by the library repositories.
//!
//! Documents are JSON objects. A store assigns the identifier on insert and
//! exposes it under the [`ID_FIELD`] key of every document it returns; the
//! key is ignored when a document is written.

use std::sync::Arc;

use async_trait::async_trait;
use library_kernel::settings::{DatabaseBackend, DatabaseSettings};
use serde_json::Value;

pub mod error;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;

pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;

/// A single stored record.
pub type Document = serde_json::Map<String, Value>;

/// Key under which stores expose the assigned identifier.
pub const ID_FIELD: &str = "id";

/// Persistence operations shared by every backend.
///
/// Lookups by an id the backend cannot parse behave like lookups of a
/// missing document. Writes replace whole documents; there is no
/// concurrency control, so the last writer wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs
    fn backend(&self) -> &'static str;

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(&self, collection: &str, id: &str)
        -> Result<Option<Document>, StoreError>;

    /// All documents whose `field` equals `value`, in store order
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert a document and return its newly assigned id
    async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Replace the document stored under `id`; `false` when nothing matched
    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<bool, StoreError>;

    /// Remove the document stored under `id`; `false` when nothing matched
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn ensure_index(&self, _collection: &str, _field: &str) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Release connections; the store must not be used afterwards
    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Build the store selected by `settings.backend`.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match settings.backend {
        DatabaseBackend::Memory => Arc::new(MemoryStore::new()),
        DatabaseBackend::Mongodb => connect_mongo(settings).await?,
    };

    tracing::info!(
        target: "library-db",
        backend = store.backend(),
        "document store ready"
    );

    Ok(store)
}

#[cfg(feature = "mongodb")]
async fn connect_mongo(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    use anyhow::Context;

    let store = MongoStore::connect(settings)
        .await
        .context("failed to create MongoDB client")?;
    store
        .ping()
        .await
        .with_context(|| format!("MongoDB at '{}' is unreachable", store.database_name()))?;

    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongo(_settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn DocumentStore>> {
    anyhow::bail!("library-db was built without the `mongodb` feature")
}

/// Drop the id key so it is never persisted as a regular field.
pub(crate) fn strip_id(mut document: Document) -> Document {
    document.remove(ID_FIELD);
    document
}
