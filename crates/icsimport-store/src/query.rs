//! Lookups for records that already exist in a store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::EventRecord;

/// A stored event found by a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExistingRecord {
    pub calendar_id: String,
    pub id: String,
}

impl ExistingRecord {
    pub fn new(calendar_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            id: id.into(),
        }
    }
}

/// Criteria for finding stored events that duplicate an incoming one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventQuery {
    /// Same UID, optionally restricted to one calendar.
    ByUid {
        uid: String,
        calendar_id: Option<String>,
    },
    /// Same calendar, same start and same title (or both untitled).
    ByStartAndTitle {
        calendar_id: String,
        dtstart: DateTime<Utc>,
        title: Option<String>,
    },
}

impl EventQuery {
    /// Returns `true` if the stored record satisfies this query.
    pub fn matches(&self, record: &EventRecord) -> bool {
        match self {
            Self::ByUid { uid, calendar_id } => {
                record.uid.as_deref() == Some(uid.as_str())
                    && calendar_id
                        .as_deref()
                        .is_none_or(|id| id == record.calendar_id)
            }
            Self::ByStartAndTitle {
                calendar_id,
                dtstart,
                title,
            } => {
                record.calendar_id == *calendar_id
                    && record.dtstart == *dtstart
                    && record.title == *title
            }
        }
    }
}
