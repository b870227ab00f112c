//! JSON-file backed calendar store.
//!
//! The whole store is one pretty-printed JSON document. It is loaded once,
//! mutated in memory, and written back after every change through a
//! temporary file and a rename. A change whose save fails is rolled back,
//! so memory never holds state the file does not.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::memory::{MemoryStore, StoreData};
use crate::query::{EventQuery, ExistingRecord};
use crate::record::{EventRecord, ReminderRecord};
use crate::store::{CalendarInfo, CalendarStore, StoreCapabilities};

/// A store persisted to a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        if !path.exists() {
            debug!("no store file at {:?}", path);
            return Ok(Self {
                path,
                inner: MemoryStore::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            StoreError::storage(format!("failed to read store file {}", path.display()))
                .with_store("json")
                .with_source(e)
        })?;
        let data: StoreData = serde_json::from_str(&content).map_err(|e| {
            StoreError::storage(format!("failed to parse store file {}", path.display()))
                .with_store("json")
                .with_source(e)
        })?;

        info!(
            calendars = data.calendars.len(),
            events = data.events.len(),
            "loaded store from {:?}",
            path
        );
        Ok(Self {
            path,
            inner: MemoryStore::from_data(data),
        })
    }

    /// Adds a calendar and saves.
    pub fn add_calendar(&mut self, calendar: CalendarInfo) -> StoreResult<()> {
        self.commit(|inner| {
            inner.add_calendar(calendar);
            Ok(())
        })
    }

    /// Applies `change` and saves, restoring the previous state if either fails.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut MemoryStore) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let snapshot = self.inner.clone();
        let value = change(&mut self.inner)?;
        if let Err(e) = self.save() {
            warn!(error = %e, "rolling back unsaved store change");
            self.inner = snapshot;
            return Err(e);
        }
        Ok(value)
    }

    /// Writes the store to disk.
    pub fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::storage("failed to create store directory")
                    .with_store("json")
                    .with_source(e)
            })?;
        }

        let content = serde_json::to_string_pretty(self.inner.data()).map_err(|e| {
            StoreError::internal("failed to serialize store")
                .with_store("json")
                .with_source(e)
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content).map_err(|e| {
            StoreError::storage("failed to write store file")
                .with_store("json")
                .with_source(e)
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            StoreError::storage("failed to rename store file")
                .with_store("json")
                .with_source(e)
        })?;

        debug!("saved store to {:?}", self.path);
        Ok(())
    }

    /// Returns the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory view of the store.
    pub fn contents(&self) -> &MemoryStore {
        &self.inner
    }
}

impl CalendarStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    fn capabilities(&self) -> StoreCapabilities {
        self.inner.capabilities()
    }

    fn list_calendars(&self) -> StoreResult<Vec<CalendarInfo>> {
        self.inner.list_calendars()
    }

    fn query_events(&self, query: &EventQuery) -> StoreResult<Vec<ExistingRecord>> {
        self.inner.query_events(query)
    }

    fn insert_event(&mut self, record: &EventRecord) -> StoreResult<String> {
        self.commit(|inner| inner.insert_event(record))
    }

    fn delete_event(&mut self, id: &str) -> StoreResult<()> {
        self.commit(|inner| inner.delete_event(id))
    }

    fn insert_reminder(&mut self, reminder: &ReminderRecord) -> StoreResult<()> {
        self.commit(|inner| inner.insert_reminder(reminder))
    }

    fn delete_reminders(&mut self, event_id: &str) -> StoreResult<usize> {
        if self.inner.reminders_for(event_id).is_empty() {
            return Ok(0);
        }
        self.commit(|inner| inner.delete_reminders(event_id))
    }

    fn adjust_entry_count(&mut self, calendar_id: &str, delta: i64) -> StoreResult<()> {
        self.commit(|inner| inner.adjust_entry_count(calendar_id, delta))
    }
}
