use library_db::{Document, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime};

use crate::utils::{self, calendar_date};
use crate::validation::Rule;

/// Fields a client may set on an author
pub const FIELDS: &[&str] = &["firstName", "lastName", "birthday"];

/// Rules every stored author satisfies
pub const RULES: &[Rule] = &[
    Rule::presence("firstName", "First name missing"),
    Rule::string("firstName", "First name must be a string"),
    Rule::presence("lastName", "Last name missing"),
    Rule::string("lastName", "Last name must be a string"),
    Rule::date("birthday", "Invalid format for author's birthday"),
];

/// An author as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Store-assigned identifier; empty until the author is saved
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "calendar_date")]
    pub birthday: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Author {
    /// A new, unsaved author stamped with `now`
    pub fn new(first_name: String, last_name: String, birthday: Date, now: OffsetDateTime) -> Self {
        Self {
            id: String::new(),
            first_name,
            last_name,
            birthday,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_document(&self) -> Result<Document, StoreError> {
        utils::to_document(self)
    }

    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}
