//! The icsimport engine.
//!
//! Takes parsed [`icsimport_core::SourceEvent`]s and writes them into a
//! [`icsimport_store::CalendarStore`]:
//!
//! 1. [`icsimport_core::normalize_event`] reshapes each event
//! 2. [`map_event`] translates it to the store schema
//! 3. [`DuplicateResolver`] finds stored copies and decides what to do
//! 4. [`ImportProcessor`] applies deletions and inserts, one event at a time

pub mod mapping;
pub mod options;
pub mod processor;
pub mod resolver;

pub use mapping::map_event;
pub use options::{DuplicateHandling, ImportOptions, RunMode};
pub use processor::{
    EventOutcome, GENERATED_UID_SUFFIX, ImportProcessor, ImportReport, ImportSummary,
    generate_uid,
};
pub use resolver::{DuplicateResolver, Resolution, decide};
