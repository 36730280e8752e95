use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{debug, warn};

use super::token::TokenSource;
use crate::config::ClientConfig;
use crate::envelope;
use crate::error::HttpError;

/// Per-request body and credentials.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    body: Option<Value>,
    token: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `body` as JSON with `Content-Type: application/json`.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach `Authorization: Bearer <token>`, overriding any token source.
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// JSON-over-HTTP transport bound to one API origin.
///
/// Clone-friendly: clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl HttpTransport {
    /// Build a transport whose requests are bounded by `config.timeout`.
    pub fn new(config: ClientConfig) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HttpError::Network(e.to_string()))?;
        Ok(Self {
            client,
            config,
            tokens: None,
        })
    }

    /// Fall back to `source` for the bearer token when a request carries none.
    pub fn with_token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(source);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue one request and decode the JSON response.
    ///
    /// A 2xx response with an empty body decodes to `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value, HttpError> {
        let url = self.config.resolve(path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(ACCEPT, "application/json");

        let token = options
            .token
            .or_else(|| self.tokens.as_ref().and_then(|source| source.token()));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(&method, &url, e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&method, &url, e))?;

        debug!(%method, %url, status = status.as_u16(), "api response");

        if !status.is_success() {
            return Err(HttpError::Http {
                status: status.as_u16(),
                message: envelope::error_message(&bytes),
            });
        }
        decode_body(&bytes)
    }

    fn transport_error(&self, method: &Method, url: &str, err: reqwest::Error) -> HttpError {
        warn!(%method, %url, error = %err, "api request failed");
        if err.is_timeout() {
            HttpError::Timeout(self.config.timeout)
        } else {
            HttpError::Network(err.to_string())
        }
    }
}

fn decode_body(bytes: &[u8]) -> Result<Value, HttpError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| HttpError::Decode(e.to_string()))
}
