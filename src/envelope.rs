//! Decoding of the remote API's `{ success, data, message }` envelope.
//!
//! List endpoints nest the collection under a resource-named field
//! (`data.projects`), item endpoints under the singular name
//! (`data.project`).

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::HttpError;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

impl Envelope {
    fn parse(body: Value) -> Result<Self, HttpError> {
        let envelope: Envelope = serde_json::from_value(body)
            .map_err(|e| HttpError::Shape(format!("not an envelope: {}", e)))?;
        if !envelope.success {
            let reason = envelope
                .message
                .unwrap_or_else(|| "success flag not set".to_string());
            return Err(HttpError::Shape(reason));
        }
        Ok(envelope)
    }
}

/// Pull `data.<field>` out as a list of `T`, in server order.
pub fn collection<T: DeserializeOwned>(body: Value, field: &str) -> Result<Vec<T>, HttpError> {
    let mut envelope = Envelope::parse(body)?;
    let items = envelope
        .data
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| HttpError::Shape(format!("missing data.{}", field)))?;
    if !items.is_array() {
        return Err(HttpError::Shape(format!("data.{} is not a list", field)));
    }
    serde_json::from_value(items)
        .map_err(|e| HttpError::Shape(format!("data.{}: {}", field, e)))
}

/// Pull a single `T` out of `data.<field>`, or out of `data` itself when
/// the server returns the entity unwrapped.
pub fn item<T: DeserializeOwned>(body: Value, field: &str) -> Result<T, HttpError> {
    let mut data = Envelope::parse(body)?.data;
    let value = if data.get(field).map_or(false, Value::is_object) {
        data[field].take()
    } else if data.get("id").is_some() {
        data
    } else {
        return Err(HttpError::Shape(format!("missing data.{}", field)));
    };
    serde_json::from_value(value).map_err(|e| HttpError::Shape(format!("data.{}: {}", field, e)))
}

/// Check a mutation acknowledgement. An empty body counts as success.
pub fn acknowledge(body: Value) -> Result<(), HttpError> {
    if body.is_null() {
        return Ok(());
    }
    Envelope::parse(body).map(|_| ())
}

/// The envelope's `message`, if `bytes` is an envelope carrying one.
pub(crate) fn error_message(bytes: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(bytes).ok()?;
    value.get("message")?.as_str().map(str::to_owned)
}
