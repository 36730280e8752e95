use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Attributes;
use crate::store::{Resource, ResourceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: ResourceId,
    pub title: String,
    pub date: NaiveDate,
    /// `HH:MM`, as the server sends it. Absent for all-day events.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl CalendarEvent {
    /// Ascending by date, all-day events first, then by start time.
    pub fn chronological(a: &Self, b: &Self) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| a.start_time.cmp(&b.start_time))
    }
}

impl Resource for CalendarEvent {
    const COLLECTION: &'static str = "events";
    const ITEM: &'static str = "event";
    const PATH: &'static str = "/api/calendar/events";
    type Draft = CalendarEventDraft;

    fn id(&self) -> ResourceId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEventDraft {
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}
