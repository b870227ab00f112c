//! SourceEvent to CanonicalEvent normalization.
//!
//! Calendar stores are stricter than RFC 5545: an event must carry either an
//! end or a duration, never both, and which one depends on whether the
//! event recurs. The normalization process:
//! 1. Pure-date starts become all-day events lasting one day from midnight UTC
//! 2. Events with neither end nor duration last zero seconds and are free
//! 3. Recurring events keep only a duration, others keep only an end

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::event::{SourceEvent, Transparency};
use crate::reminders::extract_reminders;
use crate::time::EventTime;

/// How long a canonical event lasts.
///
/// Exactly one of end or duration survives normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSpan {
    /// Non-recurring events are stored with an end.
    End(EventTime),
    /// Recurring events are stored with a duration.
    Duration(Duration),
}

/// An event in the shape the target store accepts.
///
/// Built by [`normalize_event`]; fields not touched by normalization are
/// read through [`CanonicalEvent::source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEvent<'a> {
    source: &'a SourceEvent,
    start: EventTime,
    span: EventSpan,
    all_day: bool,
    transparency: Option<Transparency>,
}

impl<'a> CanonicalEvent<'a> {
    /// Returns the event this was normalized from.
    pub fn source(&self) -> &'a SourceEvent {
        self.source
    }

    /// Returns the normalized start.
    pub fn start(&self) -> &EventTime {
        &self.start
    }

    /// Returns the normalized span.
    pub fn span(&self) -> &EventSpan {
        &self.span
    }

    /// Returns the end, for non-recurring events.
    pub fn end(&self) -> Option<&EventTime> {
        match &self.span {
            EventSpan::End(end) => Some(end),
            EventSpan::Duration(_) => None,
        }
    }

    /// Returns the duration, for recurring events.
    pub fn duration(&self) -> Option<Duration> {
        match self.span {
            EventSpan::Duration(duration) => Some(duration),
            EventSpan::End(_) => None,
        }
    }

    /// Returns `true` for all-day events.
    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// Returns the effective transparency.
    pub fn transparency(&self) -> Option<Transparency> {
        self.transparency
    }

    /// Returns the instant the (first occurrence of the) event ends.
    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        match &self.span {
            EventSpan::End(end) => Some(end.to_utc()),
            EventSpan::Duration(duration) => self.start.to_utc().checked_add_signed(*duration),
        }
    }

    /// Derives reminder offsets from the source alarms.
    pub fn reminders(&self) -> Vec<u32> {
        extract_reminders(
            &self.source.alarms,
            self.start.to_utc(),
            self.end_instant(),
        )
    }
}

/// Converts a [`SourceEvent`] to a [`CanonicalEvent`].
///
/// The source is left untouched.
pub fn normalize_event(source: &SourceEvent) -> CanonicalEvent<'_> {
    // EventTime::Date is already anchored to midnight UTC.
    let start = source.start.clone();
    let mut end = source.end.clone();
    let mut duration = source.duration;
    let mut transparency = source.transparency;

    // A DATE start means midnight to midnight (RFC 5545). Replacing the end
    // with a day-long duration also repairs ends at 23:59:59 or ends that
    // roll over because of a timezone.
    let all_day = start.is_date();
    if all_day {
        duration = Some(Duration::days(1));
        end = None;
    }

    // A DATE-TIME start with neither end nor duration takes no time at all,
    // and zero-length events are always free.
    if end.is_none() && duration.is_none() {
        duration = Some(Duration::zero());
        transparency = Some(Transparency::Transparent);
    }

    let span = if source.is_recurring() {
        let duration = match (duration, &end) {
            (Some(duration), _) => duration,
            (None, Some(end)) => start.duration_until(end),
            (None, None) => Duration::zero(),
        };
        EventSpan::Duration(duration)
    } else {
        let end = match (end, duration) {
            (Some(end), _) => end,
            (None, Some(duration)) => start.checked_add(duration).unwrap_or_else(|| {
                warn!(?duration, "Event duration overflows, using the start as end");
                start.clone()
            }),
            (None, None) => start.clone(),
        };
        EventSpan::End(end)
    };

    debug!(
        uid = ?source.uid,
        all_day,
        recurring = source.is_recurring(),
        span = ?span,
        "Normalized event"
    );

    CanonicalEvent {
        source,
        start,
        span,
        all_day,
        transparency,
    }
}
