//! Duplicate detection and resolution.
//!
//! For each mapped record the resolver asks the store for events that look
//! like the same event, then decides, according to the configured
//! [`DuplicateHandling`], which of them to delete, whether to skip the
//! insert, and which calendar the insert goes to.

use icsimport_store::{CalendarStore, EventQuery, EventRecord, ExistingRecord, StoreCapabilities};
use tracing::{debug, warn};

use crate::options::{DuplicateHandling, ImportOptions, RunMode};

/// What to do with one incoming record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Do not insert the record.
    pub skip: bool,
    /// Stored events to delete, in the order they were found.
    pub delete_ids: Vec<String>,
    /// The calendar the record is inserted into.
    pub insert_calendar_id: String,
}

impl Resolution {
    fn insert_into(calendar_id: &str) -> Self {
        Self {
            skip: false,
            delete_ids: Vec::new(),
            insert_calendar_id: calendar_id.to_string(),
        }
    }
}

/// Resolves duplicates for one run.
#[derive(Debug, Clone)]
pub struct DuplicateResolver {
    handling: DuplicateHandling,
    match_uids: bool,
    global_uids: bool,
    mode: RunMode,
    capabilities: StoreCapabilities,
}

impl DuplicateResolver {
    pub fn new(options: &ImportOptions, mode: RunMode, capabilities: StoreCapabilities) -> Self {
        Self {
            handling: options.duplicate_handling,
            match_uids: options.match_uids,
            global_uids: options.global_uids,
            mode,
            capabilities,
        }
    }

    /// Builds the query that finds stored copies of `record`.
    ///
    /// UIDs are used when matching by UID is on, the store keeps UIDs, and
    /// the record has one; otherwise the start time and title decide.
    pub fn build_query(&self, record: &EventRecord) -> EventQuery {
        match record.uid.as_deref() {
            Some(uid) if self.match_uids && self.capabilities.uid => EventQuery::ByUid {
                uid: uid.to_string(),
                calendar_id: (!self.global_uids).then(|| record.calendar_id.clone()),
            },
            _ => EventQuery::ByStartAndTitle {
                calendar_id: record.calendar_id.clone(),
                dtstart: record.dtstart,
                title: record.title.clone(),
            },
        }
    }

    /// Queries the store and decides what to do with `record`.
    ///
    /// A failed query counts as no match.
    pub fn resolve(&self, store: &dyn CalendarStore, record: &EventRecord) -> Resolution {
        let calendar_id = record.calendar_id.as_str();
        if self.mode == RunMode::Insert && !self.handling.checks_duplicates() {
            return Resolution::insert_into(calendar_id);
        }

        let query = self.build_query(record);
        let matches = match store.query_events(&query) {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, ?query, "Duplicate lookup failed, assuming no match");
                Vec::new()
            }
        };
        debug!(?query, matches = matches.len(), "Looked up duplicates");

        decide(&matches, calendar_id, self.handling, self.mode)
    }
}

/// Decides the fate of a record given the stored events that match it.
pub fn decide(
    matches: &[ExistingRecord],
    calendar_id: &str,
    handling: DuplicateHandling,
    mode: RunMode,
) -> Resolution {
    let mut resolution = Resolution::insert_into(calendar_id);

    match (mode, handling) {
        (RunMode::Delete, DuplicateHandling::Replace) => {
            resolution.skip = true;
            resolution.delete_ids = ids_in(matches, |m| m.calendar_id == calendar_id);
        }
        (RunMode::Delete, _) => {
            resolution.skip = true;
            resolution.delete_ids = ids_in(matches, |_| true);
        }
        (RunMode::Insert, DuplicateHandling::DontCheck) => {}
        (RunMode::Insert, DuplicateHandling::Ignore) => {
            resolution.skip = !matches.is_empty();
        }
        (RunMode::Insert, DuplicateHandling::Replace) => {
            resolution.delete_ids = ids_in(matches, |m| m.calendar_id == calendar_id);
        }
        (RunMode::Insert, DuplicateHandling::ReplaceAny) => {
            resolution.delete_ids = ids_in(matches, |_| true);
            if let Some(other) = matches.iter().rev().find(|m| m.calendar_id != calendar_id) {
                resolution.insert_calendar_id = other.calendar_id.clone();
            }
        }
    }

    resolution
}

fn ids_in(matches: &[ExistingRecord], keep: impl Fn(&ExistingRecord) -> bool) -> Vec<String> {
    matches
        .iter()
        .filter(|m| keep(m))
        .map(|m| m.id.clone())
        .collect()
}
