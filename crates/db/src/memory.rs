use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{strip_id, Document, DocumentStore, StoreError, ID_FIELD};

/// In-process store keyed by UUIDv7 ids.
///
/// Each collection keeps insertion order, which is what `find_all` returns.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(Uuid, Document)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

fn with_id(id: &Uuid, document: &Document) -> Document {
    let mut document = document.clone();
    document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    document
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|entries| entries.iter().map(|(id, doc)| with_id(id, doc)).collect())
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let collections = self.collections.read().await;
        Ok(collections.get(collection).and_then(|entries| {
            entries
                .iter()
                .find(|(key, _)| *key == id)
                .map(|(key, doc)| with_id(key, doc))
        }))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, doc)| doc.get(field) == Some(value))
                    .map(|(id, doc)| with_id(id, doc))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        let id = Uuid::now_v7();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push((id, strip_id(document)));

        Ok(id.to_string())
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<bool, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };

        let mut collections = self.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|entries| entries.iter_mut().find(|(key, _)| *key == id));

        match slot {
            Some((_, stored)) => {
                *stored = strip_id(document);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };

        let mut collections = self.collections.write().await;
        let Some(entries) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = entries.len();
        entries.retain(|(key, _)| *key != id);
        Ok(entries.len() != before)
    }
}
