//! Error taxonomy for remote resource access.

use std::time::Duration;

use thiserror::Error;

/// Fieldless classification of an [`HttpError`], for matching without
/// caring about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Remote unreachable: connection refused, DNS, reset.
    Network,
    /// Non-2xx status other than 404 on an item endpoint.
    Http,
    /// Response body was not valid JSON.
    Decode,
    /// The request body could not be serialized; nothing was sent.
    Encode,
    /// Valid JSON, but not the envelope shape we expected.
    Shape,
    /// The addressed resource does not exist.
    NotFound,
    /// The configured request bound elapsed.
    Timeout,
}

/// Error returned by the transport, the resource stores and the view models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{}", http_message(.status, .message))]
    Http { status: u16, message: Option<String> },

    #[error("malformed response body: {0}")]
    Decode(String),

    #[error("could not encode request body: {0}")]
    Encode(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
}

fn http_message(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("request failed with status {}: {}", status, message),
        None => format!("request failed with status {}", status),
    }
}

impl HttpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HttpError::Network(_) => ErrorKind::Network,
            HttpError::Http { .. } => ErrorKind::Http,
            HttpError::Decode(_) => ErrorKind::Decode,
            HttpError::Encode(_) => ErrorKind::Encode,
            HttpError::Shape(_) => ErrorKind::Shape,
            HttpError::NotFound(_) => ErrorKind::NotFound,
            HttpError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// The HTTP status this error corresponds to, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Http { status, .. } => Some(*status),
            HttpError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Rewrite a 404 into [`HttpError::NotFound`] naming `what`.
    ///
    /// Item endpoints use this; the transport itself reports every
    /// error status as [`HttpError::Http`].
    pub(crate) fn not_found_as(self, what: impl Into<String>) -> Self {
        match self {
            HttpError::Http { status: 404, .. } => HttpError::NotFound(what.into()),
            other => other,
        }
    }
}
