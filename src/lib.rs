pub mod config;
mod envelope;
mod error;
mod hook;
mod resources;
mod settings;
mod store;
mod transport;

#[cfg(feature = "proxy")]
pub mod proxy;

pub use config::{ClientConfig, ProxyConfig};
pub use error::{ErrorKind, HttpError};
pub use hook::{
    Confirm, Confirmed, FetchOutcome, FetchState, FetchStatus, ItemQuery, ListQuery, Query,
    RemoveOutcome, ScopedListQuery, StoreBacked, ViewModel,
};
pub use resources::{
    Attributes, CalendarEvent, CalendarEventDraft, ChatMessage, ChatMessageDraft, Contact,
    ContactDraft, Project, ProjectDraft, Task, TaskDraft, TaskStatus,
};
pub use settings::{
    FileStorage, FooterLink, FooterSettings, InMemoryStorage, KeyValueStorage, Setting,
    SettingsChange, SettingsStore, SiteSettings, StorageError, AUTH_TOKEN_KEY,
};
pub use store::{Collection, Resource, ResourceId, ResourceStore, StoreChange};
pub use transport::{HttpTransport, RequestOptions, StaticToken, TokenSource};

// Re-export the method type used by `HttpTransport::request`.
pub use reqwest::Method;
