use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Attributes;
use crate::store::{Resource, ResourceId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub project_id: Option<ResourceId>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

impl Resource for Task {
    const COLLECTION: &'static str = "tasks";
    const ITEM: &'static str = "task";
    const PATH: &'static str = "/api/tasks";
    type Draft = TaskDraft;

    fn id(&self) -> ResourceId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ResourceId>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn in_project(mut self, project_id: ResourceId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }
}
