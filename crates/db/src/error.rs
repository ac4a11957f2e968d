use thiserror::Error;

/// Failures raised by a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored document is not an object")]
    NotAnObject,

    #[cfg(feature = "mongodb")]
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[cfg(feature = "mongodb")]
    #[error("bson conversion failed: {0}")]
    Bson(String),
}
