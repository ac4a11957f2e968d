use library_db::{Document, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime};

use crate::utils::{self, calendar_date};
use crate::validation::Rule;

/// Fields a client may set on a book
pub const FIELDS: &[&str] = &["title", "authorId", "iban", "publishedAt"];

/// Rules every stored book satisfies
pub const RULES: &[Rule] = &[
    Rule::presence("title", "Title is missing"),
    Rule::string("title", "title must be a string"),
    Rule::presence("authorId", "Author is missing"),
    Rule::string("authorId", "authorId must be a string"),
    Rule::presence("iban", "IBAN is missing"),
    Rule::string("iban", "iban must be a string"),
    Rule::date("publishedAt", "publishedAt must be a Date instance"),
];

/// A book as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier; empty until the book is saved
    pub id: String,
    pub title: String,
    /// Id of the owning author. Not checked against the authors collection.
    pub author_id: String,
    /// Free-form identifier, no checksum validation
    pub iban: String,
    #[serde(with = "calendar_date")]
    pub published_at: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    pub fn to_document(&self) -> Result<Document, StoreError> {
        utils::to_document(self)
    }

    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}
