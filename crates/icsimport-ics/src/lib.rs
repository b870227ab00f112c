//! Reads iCalendar documents into [`icsimport_core::SourceEvent`]s.

pub mod error;
pub mod parse;

pub use error::{IcsError, IcsResult};
pub use parse::{parse_duration, parse_ics_content, parse_ics_file, parse_time_value};
