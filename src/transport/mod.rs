//! HTTP transport - base-URL resolution, bearer auth and JSON bodies.
//!
//! The transport never retries. Every failure comes back as an
//! [`HttpError`](crate::HttpError) and the caller decides what to do.
//!
//! ## Example
//!
//! ```ignore
//! use resource_sync::{ClientConfig, HttpTransport, RequestOptions};
//! use reqwest::Method;
//!
//! let transport = HttpTransport::new(ClientConfig::from_env())?;
//! let body = transport
//!     .request(Method::GET, "/api/projects", RequestOptions::new().bearer("t0ken"))
//!     .await?;
//! ```

mod http;
mod token;

pub use http::{HttpTransport, RequestOptions};
pub use token::{StaticToken, TokenSource};
