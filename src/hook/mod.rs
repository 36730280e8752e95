//! View models - bridge a resource store to presentation code.
//!
//! A [`ViewModel`] binds a key (the "dependency": a selected contact id,
//! a project id, or `()` for a plain list) to a [`Query`] and publishes
//! [`FetchState`] over a `tokio::sync::watch` channel.
//!
//! Each `load` takes a fresh generation number. Only the result of the
//! newest generation is applied; an older fetch that resolves late is
//! discarded, so overlapping loads for different keys never flicker.
//!
//! ## Example
//!
//! ```ignore
//! use resource_sync::{ListQuery, ViewModel, Confirmed};
//!
//! let projects = ViewModel::new(ListQuery::new(store.clone()));
//! projects.load(()).await;
//! let mut rx = projects.subscribe();
//!
//! // Re-run the list whenever another view model mutates the store.
//! let _refresh = projects.refresh_on(store.subscribe());
//!
//! projects.remove(7, &Confirmed).await?;
//! ```

mod query;
mod state;
mod view_model;

pub use query::{ItemQuery, ListQuery, Query, ScopedListQuery, StoreBacked};
pub use state::{FetchOutcome, FetchState, FetchStatus};
pub use view_model::{Confirm, Confirmed, RemoveOutcome, ViewModel};
