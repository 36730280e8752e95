//! Persisted client state: the auth token and small UI-preference blobs.
//!
//! Values live in a [`KeyValueStorage`] under fixed keys and are written
//! wholesale. Reads merge the stored object over the type's defaults, so a
//! blob saved by an older build still loads when fields are added.
//!
//! Writers publish a [`SettingsChange`]; view models that render settings
//! subscribe and reload instead of polling.
//!
//! ## Example
//!
//! ```ignore
//! use resource_sync::{FileStorage, SettingsStore, SiteSettings};
//!
//! let settings = SettingsStore::new(FileStorage::new("/var/lib/admin"));
//! let mut site: SiteSettings = settings.load()?;
//! site.site_title = "Harbour Works".into();
//! settings.save(&site)?;
//! ```

mod error;
mod storage;
mod store;
mod values;

use serde::{de::DeserializeOwned, Serialize};

pub use error::StorageError;
pub use storage::{FileStorage, InMemoryStorage, KeyValueStorage};
pub use store::{SettingsChange, SettingsStore, AUTH_TOKEN_KEY};
pub use values::{FooterLink, FooterSettings, SiteSettings};

/// A settings blob stored under a fixed key.
pub trait Setting: Serialize + DeserializeOwned + Default + Clone + Send + Sync {
    const KEY: &'static str;
}
