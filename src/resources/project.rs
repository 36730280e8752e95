use serde::{Deserialize, Serialize};

use super::Attributes;
use crate::store::{Resource, ResourceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Storage path of the cover image, e.g. `/storage/projects/12.jpg`.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Resource for Project {
    const COLLECTION: &'static str = "projects";
    const ITEM: &'static str = "project";
    const PATH: &'static str = "/api/projects";
    type Draft = ProjectDraft;

    fn id(&self) -> ResourceId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
