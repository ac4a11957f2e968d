use library_db::StoreError;
use library_http::AppError;
use thiserror::Error;

use crate::validation::Violation;

/// Failures of the author and book use cases
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("{0}")]
    NotFound(String),

    /// The body has the wrong shape, e.g. an array where one record is expected
    #[error("{0}")]
    BadRequest(String),

    /// At least one presence rule failed
    #[error("{message}")]
    MissingFields {
        message: String,
        violations: Vec<Violation>,
    },

    /// Type or format rules failed on present values
    #[error("{message}")]
    InvalidValue {
        message: String,
        violations: Vec<Violation>,
    },

    #[error("document store failure: {0}")]
    Store(#[from] StoreError),
}

pub type LibraryResult<T> = Result<T, LibraryError>;

fn details(violations: &[Violation]) -> Vec<serde_json::Value> {
    violations
        .iter()
        .filter_map(|violation| serde_json::to_value(violation).ok())
        .collect()
}

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::NotFound(message) => AppError::not_found(message),
            LibraryError::BadRequest(message) => AppError::bad_request(message),
            LibraryError::MissingFields {
                message,
                violations,
            } => AppError::missing_fields(details(&violations), message),
            LibraryError::InvalidValue {
                message,
                violations,
            } => AppError::validation(details(&violations), message),
            LibraryError::Store(err) => AppError::Internal(err.into()),
        }
    }
}
