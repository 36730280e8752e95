//! Resource stores - one cached collection per remote resource type.
//!
//! A store maps CRUD onto REST verbs against the resource's endpoint and
//! keeps the last known-good server state in memory. Only successful
//! responses to the store's own calls write to the cache, in the order
//! they arrive.
//!
//! ## Example
//!
//! ```ignore
//! use resource_sync::{HttpTransport, ClientConfig, ResourceStore, Project, ProjectDraft};
//!
//! let store: ResourceStore<Project> = ResourceStore::new(HttpTransport::new(ClientConfig::from_env())?);
//! let projects = store.list().await?;
//! let created = store.create(&ProjectDraft::new("Harbour walls")).await?;
//! store.remove(created.id).await?;
//! ```

mod collection;
mod resource_store;

use serde::{de::DeserializeOwned, Serialize};

pub use collection::Collection;
pub use resource_store::{ResourceStore, StoreChange};

/// Server-assigned resource identifier.
pub type ResourceId = u64;

/// A server-owned entity exposed over the remote API.
///
/// Values of the implementing type only ever come from server responses
/// and are therefore persisted; unsaved attributes travel as [`Resource::Draft`].
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Envelope field holding the list, e.g. `"projects"` for `data.projects`.
    const COLLECTION: &'static str;

    /// Envelope field holding a single entity, e.g. `"project"`.
    const ITEM: &'static str;

    /// Collection endpoint, e.g. `"/api/projects"`. Items live at `PATH/<id>`.
    const PATH: &'static str;

    /// Attributes submitted on create, before the server assigns an id.
    type Draft: Serialize + Send + Sync;

    fn id(&self) -> ResourceId;
}
