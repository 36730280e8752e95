//! The remote resources the admin console syncs.
//!
//! Each type mirrors the server's representation; fields this crate does
//! not name are kept in `attributes` so updates do not drop them.

mod calendar;
mod chat;
mod contact;
mod project;
mod task;

pub use calendar::{CalendarEvent, CalendarEventDraft};
pub use chat::{ChatMessage, ChatMessageDraft};
pub use contact::{Contact, ContactDraft};
pub use project::{Project, ProjectDraft};
pub use task::{Task, TaskDraft, TaskStatus};

/// Unnamed server fields, carried through untouched.
pub type Attributes = serde_json::Map<String, serde_json::Value>;
