//! Source event types.
//!
//! [`SourceEvent`] is the read-only view of a `VEVENT` as it came out of an
//! interchange document, before any normalization. The enumerations in this
//! module are closed: each parses from its iCalendar token with `from_ics`
//! and anything unrecognized is reported as `None` or an `Other` variant.

use chrono::{DateTime, Duration, Utc};

use crate::time::EventTime;

/// The `STATUS` of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

impl EventStatus {
    /// Parses an iCalendar status token.
    pub fn from_ics(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TENTATIVE" => Some(Self::Tentative),
            "CONFIRMED" => Some(Self::Confirmed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// The access `CLASS` of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Public,
    Private,
    Confidential,
    /// An experimental or IANA token this importer does not know.
    Other,
}

impl Classification {
    /// Parses an iCalendar class token.
    pub fn from_ics(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "PUBLIC" => Self::Public,
            "PRIVATE" => Self::Private,
            "CONFIDENTIAL" => Self::Confidential,
            _ => Self::Other,
        }
    }
}

/// The `TRANSP` property: whether the event blocks time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transparency {
    Opaque,
    Transparent,
}

impl Transparency {
    /// Parses an iCalendar transparency token. Anything but `TRANSPARENT`
    /// blocks time.
    pub fn from_ics(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("TRANSPARENT") {
            Self::Transparent
        } else {
            Self::Opaque
        }
    }
}

/// The `FBTYPE` of a `FREEBUSY` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FreeBusyType {
    Free,
    Busy,
    BusyUnavailable,
    BusyTentative,
}

impl FreeBusyType {
    /// Parses an `FBTYPE` parameter value.
    ///
    /// RFC 5545 says unknown types are to be treated as `BUSY`.
    pub fn from_ics(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "FREE" => Self::Free,
            "BUSY-UNAVAILABLE" => Self::BusyUnavailable,
            "BUSY-TENTATIVE" => Self::BusyTentative,
            _ => Self::Busy,
        }
    }
}

/// The `ACTION` of a `VALARM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmAction {
    Audio,
    Display,
    Email,
    Procedure,
    Other,
}

impl AlarmAction {
    /// Parses an iCalendar alarm action token.
    pub fn from_ics(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "AUDIO" => Self::Audio,
            "DISPLAY" => Self::Display,
            "EMAIL" => Self::Email,
            "PROCEDURE" => Self::Procedure,
            _ => Self::Other,
        }
    }

    /// Returns `true` for actions that can become a device reminder.
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Audio | Self::Display)
    }
}

/// Which edge of the event a relative trigger is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriggerAnchor {
    #[default]
    Start,
    End,
}

/// When an alarm fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A fixed instant (`VALUE=DATE-TIME`).
    Absolute(DateTime<Utc>),
    /// An offset from the start or end of the event.
    Relative {
        offset: Duration,
        anchor: TriggerAnchor,
    },
}

/// A `VALARM` sub-component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alarm {
    pub action: AlarmAction,
    /// `None` when the trigger was missing or could not be parsed.
    pub trigger: Option<Trigger>,
}

impl Alarm {
    /// Creates an alarm with the given action and trigger.
    pub fn new(action: AlarmAction, trigger: Trigger) -> Self {
        Self {
            action,
            trigger: Some(trigger),
        }
    }

    /// Creates a display alarm firing `minutes` before the start.
    pub fn display_before_start(minutes: i64) -> Self {
        Self::new(
            AlarmAction::Display,
            Trigger::Relative {
                offset: -Duration::minutes(minutes),
                anchor: TriggerAnchor::Start,
            },
        )
    }
}

/// A `VEVENT` read from an interchange document.
///
/// Nothing downstream mutates a source event; normalization produces a new
/// [`CanonicalEvent`](crate::normalize::CanonicalEvent) that borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEvent {
    /// `DTSTART`.
    pub start: EventTime,
    /// `DTEND`.
    pub end: Option<EventTime>,
    /// `DURATION`.
    pub duration: Option<Duration>,

    pub uid: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// `ORGANIZER` value, usually a `mailto:` URI.
    pub organizer: Option<String>,
    /// `URL`.
    pub url: Option<String>,

    pub rrule: Option<String>,
    pub rdate: Option<String>,
    pub exrule: Option<String>,
    pub exdate: Option<String>,

    pub status: Option<EventStatus>,
    pub classification: Option<Classification>,
    pub transparency: Option<Transparency>,
    /// `FBTYPE` of the first `FREEBUSY` property, if any.
    pub free_busy: Option<FreeBusyType>,

    pub alarms: Vec<Alarm>,

    /// `RECURRENCE-ID`; present on edited instances of a recurring event.
    pub recurrence_id: Option<EventTime>,
}

impl SourceEvent {
    /// Creates a source event with only a start time.
    pub fn new(start: EventTime) -> Self {
        Self {
            start,
            end: None,
            duration: None,
            uid: None,
            summary: None,
            description: None,
            location: None,
            organizer: None,
            url: None,
            rrule: None,
            rdate: None,
            exrule: None,
            exdate: None,
            status: None,
            classification: None,
            transparency: None,
            free_busy: None,
            alarms: Vec::new(),
            recurrence_id: None,
        }
    }

    /// Returns `true` if the event carries a recurrence rule or dates.
    pub fn is_recurring(&self) -> bool {
        self.rrule.is_some() || self.rdate.is_some()
    }

    /// Returns `true` if this is an edited instance of a recurring event.
    pub fn is_recurrence_instance(&self) -> bool {
        self.recurrence_id.is_some()
    }

    /// Builder method to set the end.
    pub fn with_end(mut self, end: EventTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Builder method to set the UID.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    /// Builder method to set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_rrule(mut self, rrule: impl Into<String>) -> Self {
        self.rrule = Some(rrule.into());
        self
    }

    /// Builder method to set the recurrence dates.
    pub fn with_rdate(mut self, rdate: impl Into<String>) -> Self {
        self.rdate = Some(rdate.into());
        self
    }

    /// Builder method to set the exception dates.
    pub fn with_exdate(mut self, exdate: impl Into<String>) -> Self {
        self.exdate = Some(exdate.into());
        self
    }

    /// Builder method to set the status.
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builder method to set the access class.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    /// Builder method to set the transparency.
    pub fn with_transparency(mut self, transparency: Transparency) -> Self {
        self.transparency = Some(transparency);
        self
    }

    /// Builder method to set the free/busy hint.
    pub fn with_free_busy(mut self, free_busy: FreeBusyType) -> Self {
        self.free_busy = Some(free_busy);
        self
    }

    /// Builder method to add an alarm.
    pub fn with_alarm(mut self, alarm: Alarm) -> Self {
        self.alarms.push(alarm);
        self
    }

    /// Builder method to mark the event as an edited recurrence instance.
    pub fn with_recurrence_id(mut self, recurrence_id: EventTime) -> Self {
        self.recurrence_id = Some(recurrence_id);
        self
    }
}
