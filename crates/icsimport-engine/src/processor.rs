//! The import run.
//!
//! [`ImportProcessor`] walks the events of a document in order and, for
//! each one, normalizes it, maps it onto the store schema, resolves
//! duplicates, and applies the resulting deletions and insert. Nothing that
//! happens to a single event stops the run.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use icsimport_core::{SourceEvent, normalize_event};
use icsimport_store::{CalendarStore, EventRecord, ReminderRecord, StoreCapabilities};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::mapping::map_event;
use crate::options::{ImportOptions, RunMode};
use crate::resolver::{DuplicateResolver, Resolution};

/// Suffix of generated UIDs.
pub const GENERATED_UID_SUFFIX: &str = "@icsimport";

/// What happened to one source event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event was stored, after deleting `replaced` older copies.
    Inserted {
        id: String,
        calendar_id: String,
        replaced: usize,
    },
    /// A copy already exists and duplicates are ignored.
    Duplicate,
    /// Delete mode: this many stored copies were removed.
    Deleted { count: usize },
    /// Edited instances of recurring events are not imported.
    SkippedInstance,
    /// The store rejected the insert; `replaced` copies were deleted first.
    InsertFailed { replaced: usize, error: String },
}

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub deleted: usize,
    pub duplicates: usize,
    pub skipped_instances: usize,
    pub failed: usize,
    /// The run stopped before reaching the last event.
    pub cancelled: bool,
}

impl ImportSummary {
    /// Folds one outcome into the counters.
    pub fn record(&mut self, outcome: &EventOutcome) {
        match outcome {
            EventOutcome::Inserted { replaced, .. } => {
                self.inserted += 1;
                self.deleted += replaced;
            }
            EventOutcome::Duplicate => self.duplicates += 1,
            EventOutcome::Deleted { count } => self.deleted += count,
            EventOutcome::SkippedInstance => self.skipped_instances += 1,
            EventOutcome::InsertFailed { replaced, .. } => {
                self.failed += 1;
                self.deleted += replaced;
            }
        }
    }

    /// Net change in the number of stored events.
    pub fn entry_delta(&self) -> i64 {
        let inserted = i64::try_from(self.inserted).unwrap_or(i64::MAX);
        let deleted = i64::try_from(self.deleted).unwrap_or(i64::MAX);
        inserted.saturating_sub(deleted)
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} deleted, {} duplicates, {} skipped, {} failed",
            self.inserted, self.deleted, self.duplicates, self.skipped_instances, self.failed
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

/// The result of a run: counters plus one outcome per processed event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub summary: ImportSummary,
    pub outcomes: Vec<EventOutcome>,
}

/// Imports events into one destination calendar of a store.
pub struct ImportProcessor<'s> {
    store: &'s mut dyn CalendarStore,
    calendar_id: String,
    options: ImportOptions,
    mode: RunMode,
    capabilities: StoreCapabilities,
    resolver: DuplicateResolver,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'s> ImportProcessor<'s> {
    /// Creates an insert-mode processor for `calendar_id`.
    pub fn new(
        store: &'s mut dyn CalendarStore,
        calendar_id: impl Into<String>,
        options: ImportOptions,
    ) -> Self {
        let capabilities = store.capabilities();
        let resolver = DuplicateResolver::new(&options, RunMode::Insert, capabilities);
        Self {
            store,
            calendar_id: calendar_id.into(),
            options,
            mode: RunMode::Insert,
            capabilities,
            resolver,
            cancel: None,
        }
    }

    /// Builder method to set the run mode.
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self.resolver = DuplicateResolver::new(&self.options, mode, self.capabilities);
        self
    }

    /// Builder method to set a cancellation flag, checked between events.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Processes every event in order and returns the report.
    pub fn run(&mut self, events: &[SourceEvent]) -> ImportReport {
        info!(
            calendar = %self.calendar_id,
            store = self.store.name(),
            mode = ?self.mode,
            duplicate_handling = ?self.options.duplicate_handling,
            events = events.len(),
            "Starting import"
        );

        let mut report = ImportReport::default();
        for event in events {
            if self.is_cancelled() {
                info!(
                    processed = report.outcomes.len(),
                    "Import cancelled, keeping changes made so far"
                );
                report.summary.cancelled = true;
                break;
            }
            let outcome = self.process_event(event);
            report.summary.record(&outcome);
            report.outcomes.push(outcome);
        }

        let delta = report.summary.entry_delta();
        if delta != 0 {
            if let Err(e) = self.store.adjust_entry_count(&self.calendar_id, delta) {
                warn!(error = %e, delta, "Failed to update calendar entry count");
            }
        }

        info!(summary = %report.summary, "Import finished");
        report
    }

    /// Processes a single event.
    pub fn process_event(&mut self, source: &SourceEvent) -> EventOutcome {
        if source.is_recurrence_instance() {
            debug!(uid = ?source.uid, "Skipping edited recurrence instance");
            return EventOutcome::SkippedInstance;
        }

        let capabilities = self.capabilities;
        let event = normalize_event(source);
        let reminders = self.options.effective_reminders(&event.reminders());
        let mut record = map_event(&event, &self.calendar_id, &reminders, capabilities);

        let Resolution {
            skip,
            delete_ids,
            insert_calendar_id,
        } = self.resolver.resolve(&*self.store, &record);

        let replaced = self.delete_events(&delete_ids);

        if skip {
            return match self.mode {
                RunMode::Delete => EventOutcome::Deleted { count: replaced },
                RunMode::Insert => {
                    debug!(uid = ?record.uid, title = ?record.title, "Ignoring duplicate");
                    EventOutcome::Duplicate
                }
            };
        }

        record.calendar_id = insert_calendar_id;
        if capabilities.uid && record.uid.is_none() {
            record.uid = Some(generate_uid(&record));
        }
        self.insert_event(&record, &reminders, replaced)
    }

    fn insert_event(
        &mut self,
        record: &EventRecord,
        reminders: &[u32],
        replaced: usize,
    ) -> EventOutcome {
        let id = match self.store.insert_event(record) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, uid = ?record.uid, title = ?record.title, "Failed to insert event");
                return EventOutcome::InsertFailed {
                    replaced,
                    error: e.to_string(),
                };
            }
        };

        for &minutes in reminders {
            if let Err(e) = self.store.insert_reminder(&ReminderRecord::alert(&id, minutes)) {
                warn!(error = %e, event_id = %id, minutes, "Failed to insert reminder");
            }
        }

        debug!(
            id = %id,
            calendar = %record.calendar_id,
            reminders = reminders.len(),
            replaced,
            "Inserted event"
        );
        EventOutcome::Inserted {
            id,
            calendar_id: record.calendar_id.clone(),
            replaced,
        }
    }

    /// Deletes events and their reminders, returning how many events went.
    fn delete_events(&mut self, ids: &[String]) -> usize {
        let mut deleted = 0;
        for id in ids {
            if let Err(e) = self.store.delete_event(id) {
                warn!(error = %e, event_id = %id, "Failed to delete event");
                continue;
            }
            deleted += 1;
            if let Err(e) = self.store.delete_reminders(id) {
                warn!(error = %e, event_id = %id, "Failed to delete reminders");
            }
        }
        deleted
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Derives a stable UID from the record content, ignoring its calendar.
///
/// Importing the same event twice yields the same UID, so later imports
/// can find it.
pub fn generate_uid(record: &EventRecord) -> String {
    let mut content = record.clone();
    content.calendar_id.clear();
    content.uid = None;
    let bytes = serde_json::to_vec(&content).unwrap_or_else(|_| format!("{content:?}").into_bytes());
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, &bytes);
    format!("{uuid}{GENERATED_UID_SUFFIX}")
}
