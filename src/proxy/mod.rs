//! Media proxy - same-origin relay for remote-hosted media.
//!
//! Requires the `proxy` feature. Uses axum for routing and reqwest for the
//! upstream call.
//!
//! ## Routes
//!
//! - `GET /api/storage?path=/storage/<subpath>` - relay `<remote_base><path>`.
//!   400 when `path` is missing or resolves outside the prefix, 502 when
//!   the remote is unreachable, the upstream status otherwise. Upstream
//!   redirects are not followed.
//!
//! ## Example
//!
//! ```ignore
//! use resource_sync::{proxy, ProxyConfig};
//!
//! let state = proxy::ProxyState::new(ProxyConfig::new("http://backend:8000"))?;
//!
//! // Get the router to compose with other axum routes
//! let app = proxy::router(state.clone());
//!
//! // Or serve directly
//! proxy::serve(state, "0.0.0.0:3000").await?;
//! ```

mod http;

pub use http::{
    router, serve, upstream_target, validate_path, ProxyState, StorageParams, STORAGE_ROUTE,
};
