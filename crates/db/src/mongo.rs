use async_trait::async_trait;
use futures::TryStreamExt;
use library_kernel::settings::DatabaseSettings;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson},
    Client, Collection, Database, IndexModel,
};
use serde_json::Value;

use crate::{strip_id, Document, DocumentStore, StoreError, ID_FIELD};

const MONGO_ID: &str = "_id";

/// MongoDB-backed store; ids are hex-encoded ObjectIds.
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Create a client from `settings.url`. The driver connects lazily, so
    /// reachability is only known after [`DocumentStore::ping`].
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&settings.url).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&settings.name));

        Ok(Self { client, database })
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    fn collection(&self, name: &str) -> Collection<bson::Document> {
        self.database.collection(name)
    }
}

fn id_filter(id: &str) -> Option<bson::Document> {
    ObjectId::parse_str(id).ok().map(|oid| doc! { "_id": oid })
}

fn to_bson(document: Document) -> Result<bson::Document, StoreError> {
    bson::to_document(&strip_id(document)).map_err(|err| StoreError::Bson(err.to_string()))
}

fn from_bson(mut raw: bson::Document) -> Result<Document, StoreError> {
    let id = match raw.remove(MONGO_ID) {
        Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
        Some(Bson::String(id)) => Some(id),
        Some(other) => Some(other.to_string()),
        None => None,
    };

    let Value::Object(mut document) = Bson::Document(raw).into_relaxed_extjson() else {
        return Err(StoreError::NotAnObject);
    };

    if let Some(id) = id {
        document.insert(ID_FIELD.to_string(), Value::String(id));
    }

    Ok(document)
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        let raw: Vec<bson::Document> = cursor.try_collect().await?;
        raw.into_iter().map(from_bson).collect()
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };

        self.collection(collection)
            .find_one(filter)
            .await?
            .map(from_bson)
            .transpose()
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let value = bson::to_bson(value).map_err(|err| StoreError::Bson(err.to_string()))?;
        let mut filter = bson::Document::new();
        filter.insert(field, value);

        let cursor = self.collection(collection).find(filter).await?;
        let raw: Vec<bson::Document> = cursor.try_collect().await?;
        raw.into_iter().map(from_bson).collect()
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<String, StoreError> {
        let result = self
            .collection(collection)
            .insert_one(to_bson(document)?)
            .await?;

        Ok(match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        })
    }

    async fn replace(
        &self,
        collection: &str,
        id: &str,
        document: Document,
    ) -> Result<bool, StoreError> {
        let Some(filter) = id_filter(id) else {
            return Ok(false);
        };

        let result = self
            .collection(collection)
            .replace_one(filter, to_bson(document)?)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let Some(filter) = id_filter(id) else {
            return Ok(false);
        };

        let result = self.collection(collection).delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut keys = bson::Document::new();
        keys.insert(field, 1i32);

        let index = IndexModel::builder().keys(keys).build();
        self.collection(collection).create_index(index).await?;

        tracing::info!(target: "library-db", collection, field, "index ensured");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_ids_are_mapped_to_hex_strings() {
        let oid = ObjectId::parse_str("5e887b7cabf57701757a2062").unwrap();
        let raw = doc! { "_id": oid, "title": "Dune", "authorId": "abc" };

        let document = from_bson(raw).unwrap();
        assert_eq!(document[ID_FIELD], json!("5e887b7cabf57701757a2062"));
        assert_eq!(document["title"], json!("Dune"));
        assert!(!document.contains_key(MONGO_ID));
    }

    #[test]
    fn writes_never_carry_the_id_key() {
        let mut document = Document::new();
        document.insert(ID_FIELD.to_string(), json!("5e887b7cabf57701757a2062"));
        document.insert("iban".to_string(), json!("X-1"));

        let raw = to_bson(document).unwrap();
        assert!(!raw.contains_key(ID_FIELD));
        assert_eq!(raw.get_str("iban").unwrap(), "X-1");
    }

    #[test]
    fn malformed_ids_produce_no_filter() {
        assert!(id_filter("not-an-object-id").is_none());
        assert!(id_filter("5e887b7cabf57701757a2062").is_some());
    }
}
