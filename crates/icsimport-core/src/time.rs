//! Time types for imported calendar events.
//!
//! This module provides [`EventTime`], which keeps the shape an iCalendar
//! date or date-time value was written in (pure date, UTC, floating or bound
//! to a TZID), and helpers for rendering RFC 5545 durations.
//!
//! The shape matters: a pure date marks an all-day event, and the timezone
//! name reported to the store depends on whether the value carried a TZID.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Timezone name reported for dates, UTC values and floating values.
pub const UTC_TIMEZONE: &str = "UTC";

const SECONDS_PER_DAY: i64 = 86_400;

/// A start, end or trigger time as written in an iCalendar document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A pure date (`VALUE=DATE`), anchored to midnight UTC.
    Date(NaiveDate),
    /// A date-time with the `Z` suffix.
    Utc(DateTime<Utc>),
    /// A date-time without timezone information.
    Floating(NaiveDateTime),
    /// A date-time qualified by a `TZID` parameter.
    Zoned {
        date_time: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    /// Creates a pure date value.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::Date(date)
    }

    /// Creates a UTC date-time value.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::Utc(dt)
    }

    /// Creates a floating date-time value.
    pub fn floating(date_time: NaiveDateTime) -> Self {
        Self::Floating(date_time)
    }

    /// Creates a date-time bound to a timezone identifier.
    pub fn zoned(date_time: NaiveDateTime, tzid: impl Into<String>) -> Self {
        Self::Zoned {
            date_time,
            tzid: tzid.into(),
        }
    }

    /// Returns `true` if this value has no time-of-day component.
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the instant this value denotes.
    ///
    /// Dates resolve to midnight UTC. Floating values and values whose TZID
    /// is not a known IANA zone are read as UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            Self::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            Self::Utc(dt) => *dt,
            Self::Floating(naive) => naive.and_utc(),
            Self::Zoned { date_time, tzid } => match resolve_timezone(tzid) {
                Some(tz) => local_to_utc(&tz, *date_time),
                None => date_time.and_utc(),
            },
        }
    }

    /// Returns the timezone name a store should record alongside this value.
    pub fn timezone_name(&self) -> &str {
        match self {
            Self::Zoned { tzid, .. } => tzid,
            Self::Date(_) | Self::Utc(_) | Self::Floating(_) => UTC_TIMEZONE,
        }
    }

    /// Returns `true` if the TZID of a zoned value cannot be resolved.
    pub fn has_unknown_timezone(&self) -> bool {
        match self {
            Self::Zoned { tzid, .. } => resolve_timezone(tzid).is_none(),
            _ => false,
        }
    }

    /// Returns the signed duration from this value to `end`.
    pub fn duration_until(&self, end: &EventTime) -> Duration {
        end.to_utc() - self.to_utc()
    }

    /// Adds a duration, keeping the shape of the value where possible.
    ///
    /// A date stays a date when the duration is a whole number of days and
    /// becomes a UTC date-time otherwise. Zoned values are advanced on the
    /// timeline and re-expressed in their zone. Returns `None` on overflow.
    pub fn checked_add(&self, delta: Duration) -> Option<Self> {
        match self {
            Self::Date(date) if delta.num_seconds() % SECONDS_PER_DAY == 0 => {
                date.checked_add_signed(delta).map(Self::Date)
            }
            Self::Date(_) => self.to_utc().checked_add_signed(delta).map(Self::Utc),
            Self::Utc(dt) => dt.checked_add_signed(delta).map(Self::Utc),
            Self::Floating(naive) => naive.checked_add_signed(delta).map(Self::Floating),
            Self::Zoned { date_time, tzid } => {
                let date_time = match resolve_timezone(tzid) {
                    Some(tz) => self
                        .to_utc()
                        .checked_add_signed(delta)?
                        .with_timezone(&tz)
                        .naive_local(),
                    None => date_time.checked_add_signed(delta)?,
                };
                Some(Self::zoned(date_time, tzid.clone()))
            }
        }
    }
}

/// Resolves a TZID to an IANA timezone.
///
/// Some producers prefix the identifier with a `/`; that prefix is ignored.
pub fn resolve_timezone(tzid: &str) -> Option<Tz> {
    tzid.trim().trim_start_matches('/').parse::<Tz>().ok()
}

/// Maps a local wall-clock time to UTC.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times that fall
/// in a DST gap are shifted forward by an hour.
fn local_to_utc(tz: &Tz, local: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}

/// Renders a duration in RFC 5545 form (`P1D`, `PT1H30M`, `-PT15M`, `PT0S`).
///
/// Sub-second precision is dropped.
pub fn format_duration(delta: Duration) -> String {
    let total = delta.num_seconds();
    if total == 0 {
        return "PT0S".to_string();
    }

    let mut out = String::new();
    if total < 0 {
        out.push('-');
    }
    out.push('P');

    let mut rest = total.unsigned_abs();
    let days = rest / SECONDS_PER_DAY as u64;
    rest %= SECONDS_PER_DAY as u64;
    let hours = rest / 3_600;
    rest %= 3_600;
    let minutes = rest / 60;
    let seconds = rest % 60;

    if days > 0 {
        let _ = write!(out, "{days}D");
    }
    if hours > 0 || minutes > 0 || seconds > 0 {
        out.push('T');
        if hours > 0 {
            let _ = write!(out, "{hours}H");
        }
        if minutes > 0 {
            let _ = write!(out, "{minutes}M");
        }
        if seconds > 0 {
            let _ = write!(out, "{seconds}S");
        }
    }
    out
}
