use serde::{Deserialize, Serialize};

use super::Attributes;
use crate::store::{Resource, ResourceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: ResourceId,
    pub contact_id: ResourceId,
    pub body: String,
    /// `true` when written by staff, `false` when written by the contact.
    #[serde(default)]
    pub from_staff: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl ChatMessage {
    /// Query-string parameter scoping messages to one contact, for
    /// [`ScopedListQuery`](crate::ScopedListQuery).
    pub const CONTACT_PARAM: &'static str = "contact_id";
}

impl Resource for ChatMessage {
    const COLLECTION: &'static str = "messages";
    const ITEM: &'static str = "message";
    const PATH: &'static str = "/api/chat/messages";
    type Draft = ChatMessageDraft;

    fn id(&self) -> ResourceId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageDraft {
    pub contact_id: ResourceId,
    pub body: String,
    pub from_staff: bool,
}

impl ChatMessageDraft {
    /// A staff reply to `contact_id`.
    pub fn reply(contact_id: ResourceId, body: impl Into<String>) -> Self {
        Self {
            contact_id,
            body: body.into(),
            from_staff: true,
        }
    }
}
