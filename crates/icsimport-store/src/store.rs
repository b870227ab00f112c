//! CalendarStore trait definition.
//!
//! [`CalendarStore`] is the seam between the import engine and wherever the
//! events end up. The engine never assumes more than this trait offers:
//! optional schema features are advertised through [`StoreCapabilities`].

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::query::{EventQuery, ExistingRecord};
use crate::record::{EventRecord, ReminderRecord};

/// Information about a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
    /// Number of events the calendar holds.
    #[serde(default)]
    pub entry_count: u64,
}

impl CalendarInfo {
    /// Creates an empty calendar.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            entry_count: 0,
        }
    }
}

/// Optional schema features of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreCapabilities {
    /// The store has an availability (busy/free/tentative) column.
    pub availability: bool,
    /// The store persists event UIDs and can query by them.
    pub uid: bool,
}

impl Default for StoreCapabilities {
    fn default() -> Self {
        Self {
            availability: true,
            uid: true,
        }
    }
}

/// A persistent calendar store.
///
/// Calls are blocking and made from a single thread, one event at a time.
pub trait CalendarStore {
    /// Returns the name of this store (e.g., "memory", "json").
    fn name(&self) -> &str;

    /// Returns the optional features this store supports.
    fn capabilities(&self) -> StoreCapabilities;

    /// Lists the calendars in the store.
    fn list_calendars(&self) -> StoreResult<Vec<CalendarInfo>>;

    /// Finds stored events matching the query.
    fn query_events(&self, query: &EventQuery) -> StoreResult<Vec<ExistingRecord>>;

    /// Inserts an event and returns its new id.
    ///
    /// # Errors
    ///
    /// Fails if the record's calendar does not exist or the write fails.
    fn insert_event(&mut self, record: &EventRecord) -> StoreResult<String>;

    /// Deletes an event by id.
    fn delete_event(&mut self, id: &str) -> StoreResult<()>;

    /// Attaches a reminder to a stored event.
    fn insert_reminder(&mut self, reminder: &ReminderRecord) -> StoreResult<()>;

    /// Deletes every reminder of an event, returning how many were removed.
    fn delete_reminders(&mut self, event_id: &str) -> StoreResult<usize>;

    /// Adds `delta` to a calendar's entry count, saturating at zero.
    fn adjust_entry_count(&mut self, calendar_id: &str, delta: i64) -> StoreResult<()>;
}
