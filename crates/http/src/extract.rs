//! Request body parsing shared by the module handlers.

use axum::body::Bytes;
use serde_json::Value;

use crate::error::AppError;

/// Parse a raw request body as JSON.
///
/// Handlers take `Bytes` rather than `Json<T>` so that a missing body or
/// content type does not pre-empt the handler's own checks (a bodiless
/// `PATCH` on an unknown id is a 404), and so that every rejection uses the
/// [`AppError`] envelope. An empty body reads as `{}`.
pub fn json_body(bytes: &Bytes) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_slice(bytes)
        .map_err(|err| AppError::bad_request(format!("Malformed JSON body: {err}")))
}
