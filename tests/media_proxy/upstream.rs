//! Fake remote storage host for the relay to talk to.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use resource_sync::{proxy, ProxyConfig};

pub const LOGO: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-a-png";

#[derive(Clone, Default)]
pub struct Upstream {
    hits: Arc<AtomicUsize>,
    cache_control: Arc<Mutex<Option<String>>>,
}

impl Upstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// `Cache-Control` the relay sent on its last request.
    pub fn cache_control(&self) -> Option<String> {
        self.cache_control.lock().unwrap().clone()
    }

    fn record(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        *self.cache_control.lock().unwrap() = headers
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }
}

async fn logo(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    upstream.record(&headers);
    ([(CONTENT_TYPE, "image/png")], LOGO).into_response()
}

async fn untyped(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    upstream.record(&headers);
    Response::new(Body::from("raw bytes"))
}

async fn missing(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    upstream.record(&headers);
    (StatusCode::NOT_FOUND, "no such object").into_response()
}

async fn slow(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    upstream.record(&headers);
    tokio::time::sleep(Duration::from_secs(3)).await;
    "late".into_response()
}

async fn moved(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    upstream.record(&headers);
    Redirect::temporary("/storage/projects/logo.png").into_response()
}

async fn bind(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn start_upstream(upstream: Upstream) -> String {
    let app = Router::new()
        .route("/storage/projects/logo.png", get(logo))
        .route("/storage/blob", get(untyped))
        .route("/storage/missing.png", get(missing))
        .route("/storage/slow.png", get(slow))
        .route("/storage/moved.png", get(moved))
        .with_state(upstream);
    bind(app).await
}

/// Start a relay in front of `remote_base` and return its base URL.
pub async fn start_proxy(config: ProxyConfig) -> String {
    let state = proxy::ProxyState::new(config).unwrap();
    bind(proxy::router(state)).await
}

/// An address nothing listens on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub async fn fetch(proxy: &str, path: Option<&str>) -> reqwest::Response {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();
    let mut request = client.get(format!("{proxy}{}", proxy::STORAGE_ROUTE));
    if let Some(path) = path {
        request = request.query(&[("path", path)]);
    }
    request.send().await.unwrap()
}
