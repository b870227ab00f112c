//! Calendar stores for icsimport.
//!
//! - [`CalendarStore`]: the trait the import engine writes through
//! - [`EventRecord`] / [`ReminderRecord`]: the target schema
//! - [`MemoryStore`] and [`JsonFileStore`]: the bundled backends

pub mod error;
pub mod json_file;
pub mod memory;
pub mod query;
pub mod record;
pub mod store;

pub use error::{StoreError, StoreErrorCode, StoreResult};
pub use json_file::JsonFileStore;
pub use memory::{MemoryStore, StoreData, StoredEvent};
pub use query::{EventQuery, ExistingRecord};
pub use record::{AccessLevel, Availability, EventRecord, RecordStatus, ReminderMethod, ReminderRecord};
pub use store::{CalendarInfo, CalendarStore, StoreCapabilities};
