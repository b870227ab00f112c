//! In-memory calendar store.
//!
//! [`MemoryStore`] keeps calendars, events and reminders in plain vectors.
//! It is the reference [`CalendarStore`] implementation and the backing
//! state of [`crate::JsonFileStore`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::query::{EventQuery, ExistingRecord};
use crate::record::{EventRecord, ReminderRecord};
use crate::store::{CalendarInfo, CalendarStore, StoreCapabilities};

/// An event as persisted, with its store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: String,
    #[serde(flatten)]
    pub record: EventRecord,
}

/// Everything a store holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub calendars: Vec<CalendarInfo>,
    #[serde(default)]
    pub events: Vec<StoredEvent>,
    #[serde(default)]
    pub reminders: Vec<ReminderRecord>,
    #[serde(default)]
    pub next_id: u64,
}

/// A store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    capabilities: StoreCapabilities,
    data: StoreData,
}

impl MemoryStore {
    /// Creates an empty store supporting every optional feature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from previously saved data.
    pub fn from_data(data: StoreData) -> Self {
        Self {
            capabilities: StoreCapabilities::default(),
            data,
        }
    }

    /// Builder method to set the advertised capabilities.
    pub fn with_capabilities(mut self, capabilities: StoreCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Builder method to add a calendar.
    pub fn with_calendar(mut self, calendar: CalendarInfo) -> Self {
        self.add_calendar(calendar);
        self
    }

    /// Adds a calendar, replacing one with the same id.
    pub fn add_calendar(&mut self, calendar: CalendarInfo) {
        self.data.calendars.retain(|c| c.id != calendar.id);
        self.data.calendars.push(calendar);
    }

    /// Returns a calendar by id.
    pub fn calendar(&self, id: &str) -> Option<&CalendarInfo> {
        self.data.calendars.iter().find(|c| c.id == id)
    }

    /// Returns every stored event in insertion order.
    pub fn events(&self) -> &[StoredEvent] {
        &self.data.events
    }

    /// Returns a stored event by id.
    pub fn event(&self, id: &str) -> Option<&EventRecord> {
        self.data
            .events
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.record)
    }

    /// Returns the reminders attached to an event.
    pub fn reminders_for(&self, event_id: &str) -> Vec<&ReminderRecord> {
        self.data
            .reminders
            .iter()
            .filter(|r| r.event_id == event_id)
            .collect()
    }

    /// Returns the raw store contents.
    pub fn data(&self) -> &StoreData {
        &self.data
    }

    fn has_event(&self, id: &str) -> bool {
        self.data.events.iter().any(|e| e.id == id)
    }
}

impl CalendarStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn capabilities(&self) -> StoreCapabilities {
        self.capabilities
    }

    fn list_calendars(&self) -> StoreResult<Vec<CalendarInfo>> {
        Ok(self.data.calendars.clone())
    }

    fn query_events(&self, query: &EventQuery) -> StoreResult<Vec<ExistingRecord>> {
        if matches!(query, EventQuery::ByUid { .. }) && !self.capabilities.uid {
            return Err(StoreError::unsupported("store has no uid column").with_store(self.name()));
        }

        Ok(self
            .data
            .events
            .iter()
            .filter(|e| query.matches(&e.record))
            .map(|e| ExistingRecord::new(&e.record.calendar_id, &e.id))
            .collect())
    }

    fn insert_event(&mut self, record: &EventRecord) -> StoreResult<String> {
        if self.calendar(&record.calendar_id).is_none() {
            return Err(StoreError::invalid_record(format!(
                "unknown calendar {}",
                record.calendar_id
            ))
            .with_store(self.name()));
        }

        self.data.next_id += 1;
        let id = self.data.next_id.to_string();
        self.data.events.push(StoredEvent {
            id: id.clone(),
            record: record.clone(),
        });
        debug!(id = %id, calendar = %record.calendar_id, "Stored event");
        Ok(id)
    }

    fn delete_event(&mut self, id: &str) -> StoreResult<()> {
        let before = self.data.events.len();
        self.data.events.retain(|e| e.id != id);
        if self.data.events.len() == before {
            return Err(StoreError::not_found(format!("event {id}")).with_store(self.name()));
        }
        Ok(())
    }

    fn insert_reminder(&mut self, reminder: &ReminderRecord) -> StoreResult<()> {
        if !self.has_event(&reminder.event_id) {
            return Err(
                StoreError::not_found(format!("event {}", reminder.event_id))
                    .with_store(self.name()),
            );
        }
        self.data.reminders.push(reminder.clone());
        Ok(())
    }

    fn delete_reminders(&mut self, event_id: &str) -> StoreResult<usize> {
        let before = self.data.reminders.len();
        self.data.reminders.retain(|r| r.event_id != event_id);
        Ok(before - self.data.reminders.len())
    }

    fn adjust_entry_count(&mut self, calendar_id: &str, delta: i64) -> StoreResult<()> {
        let calendar = self
            .data
            .calendars
            .iter_mut()
            .find(|c| c.id == calendar_id)
            .ok_or_else(|| StoreError::not_found(format!("calendar {calendar_id}")))?;
        calendar.entry_count = calendar.entry_count.saturating_add_signed(delta);
        Ok(())
    }
}
