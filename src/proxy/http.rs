use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use reqwest::redirect::Policy;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ProxyConfig;
use crate::error::HttpError;

/// Path the relay is mounted at.
pub const STORAGE_ROUTE: &str = "/api/storage";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Shared state for the relay handler. Cheap to clone.
#[derive(Clone)]
pub struct ProxyState {
    inner: Arc<ProxyInner>,
}

struct ProxyInner {
    client: reqwest::Client,
    config: ProxyConfig,
    cache_control: HeaderValue,
}

impl ProxyState {
    pub fn new(config: ProxyConfig) -> Result<Self, HttpError> {
        // Redirects are relayed as statuses, never followed.
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|e| HttpError::Network(e.to_string()))?;
        Ok(Self::with_client(config, client))
    }

    /// Use an existing client; its timeout applies instead of `upstream_timeout`.
    pub fn with_client(config: ProxyConfig, client: reqwest::Client) -> Self {
        let cache_control =
            HeaderValue::from_str(&format!("public, max-age={}", config.max_age.as_secs()))
                .unwrap_or_else(|_| HeaderValue::from_static("public, max-age=3600"));
        Self {
            inner: Arc::new(ProxyInner {
                client,
                config,
                cache_control,
            }),
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.inner.config
    }
}

#[derive(Debug, Deserialize)]
pub struct StorageParams {
    #[serde(default)]
    pub path: Option<String>,
}

/// Build an axum `Router` serving the relay at [`STORAGE_ROUTE`].
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route(STORAGE_ROUTE, get(storage_handler))
        .with_state(state)
}

/// Serve the relay over HTTP at the given address (e.g. `"0.0.0.0:3000"`).
pub async fn serve(state: ProxyState, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr, "media proxy listening");
    axum::serve(listener, app).await
}

/// Accept only absolute paths under `prefix` with no dot segment, no
/// backslash, and no query or fragment.
pub fn validate_path<'a>(path: Option<&'a str>, prefix: &str) -> Option<&'a str> {
    let path = path?;
    if !path.starts_with(prefix) || path.contains(['\\', '?', '#']) {
        return None;
    }
    if path.split('/').any(is_dot_segment) {
        return None;
    }
    Some(path)
}

// `.` and `..`, including their percent-encoded spellings.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Resolve `path` on the remote. `None` unless the normalized URL stays on
/// the remote origin and under the configured prefix.
pub fn upstream_target(config: &ProxyConfig, path: &str) -> Option<Url> {
    let scope = Url::parse(&config.upstream_url(&config.path_prefix)).ok()?;
    let url = Url::parse(&config.upstream_url(path)).ok()?;
    let contained = url.origin() == scope.origin()
        && url.path().starts_with(scope.path())
        && url.query().is_none()
        && url.fragment().is_none();
    contained.then_some(url)
}

/// `GET /api/storage?path=...` - relay one upstream object.
async fn storage_handler(
    State(state): State<ProxyState>,
    Query(params): Query<StorageParams>,
) -> Response {
    let config = state.config();
    let url = validate_path(params.path.as_deref(), &config.path_prefix)
        .and_then(|path| upstream_target(config, path));
    let Some(url) = url else {
        debug!(path = ?params.path, "rejecting storage path");
        return StatusCode::BAD_REQUEST.into_response();
    };

    let upstream = match state
        .inner
        .client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .await
    {
        Ok(upstream) => upstream,
        Err(err) => {
            warn!(%url, error = %err, "media upstream unreachable");
            return StatusCode::BAD_GATEWAY.into_response();
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        debug!(%url, status = status.as_u16(), "media upstream returned error status");
        return status.into_response();
    }

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));

    (
        status,
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, state.inner.cache_control.clone()),
        ],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response()
}
