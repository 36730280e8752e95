use serde::{Deserialize, Serialize};

use super::Attributes;
use crate::store::{Resource, ResourceId};

/// Someone who reached out through the site; chat threads hang off contacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ResourceId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Resource for Contact {
    const COLLECTION: &'static str = "contacts";
    const ITEM: &'static str = "contact";
    const PATH: &'static str = "/api/contacts";
    type Draft = ContactDraft;

    fn id(&self) -> ResourceId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
