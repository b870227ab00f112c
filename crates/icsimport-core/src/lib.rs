//! Core types: time values, source events, reminders, normalization

pub mod event;
pub mod normalize;
pub mod reminders;
pub mod time;
pub mod tracing;

pub use event::{
    Alarm, AlarmAction, Classification, EventStatus, FreeBusyType, SourceEvent, Transparency,
    Trigger, TriggerAnchor,
};
pub use normalize::{CanonicalEvent, EventSpan, normalize_event};
pub use reminders::extract_reminders;
pub use time::{EventTime, UTC_TIMEZONE, format_duration, resolve_timezone};
pub use crate::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
