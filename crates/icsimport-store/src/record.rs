//! Target-schema records.
//!
//! [`EventRecord`] is the flat shape a calendar store persists: one row per
//! event, instants in UTC plus the zone name they were written in, and
//! either an end (one-off events) or an RFC 5545 duration (recurring ones).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event status as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Tentative,
    Confirmed,
    Canceled,
}

/// Who may see the event details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    /// The calendar's default visibility.
    Default,
    Confidential,
    Private,
    Public,
}

/// Whether the event blocks time in free/busy lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Busy,
    Free,
    Tentative,
}

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    #[default]
    Alert,
}

/// A normalized event ready for insertion into a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub calendar_id: String,
    pub dtstart: DateTime<Utc>,
    /// `UTC` for dates, UTC and floating values; the TZID otherwise.
    pub event_timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtend: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_end_timezone: Option<String>,
    /// RFC 5545 duration, set for recurring events only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default)]
    pub guests_can_modify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_level: Option<AccessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exrule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_app_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub has_alarm: bool,
}

impl EventRecord {
    /// Creates a record with only the required fields set.
    pub fn new(calendar_id: impl Into<String>, dtstart: DateTime<Utc>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            dtstart,
            event_timezone: "UTC".to_string(),
            dtend: None,
            event_end_timezone: None,
            duration: None,
            all_day: false,
            title: None,
            description: None,
            location: None,
            organizer: None,
            guests_can_modify: false,
            status: None,
            access_level: None,
            availability: None,
            rrule: None,
            rdate: None,
            exrule: None,
            exdate: None,
            custom_app_uri: None,
            uid: None,
            has_alarm: false,
        }
    }

    /// Builder method to set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder method to set the UID.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }
}

/// A reminder attached to a stored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRecord {
    pub event_id: String,
    /// Minutes before the start.
    pub minutes: u32,
    #[serde(default)]
    pub method: ReminderMethod,
}

impl ReminderRecord {
    /// Creates an alert reminder.
    pub fn alert(event_id: impl Into<String>, minutes: u32) -> Self {
        Self {
            event_id: event_id.into(),
            minutes,
            method: ReminderMethod::Alert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn record_skips_absent_fields() {
        let record = EventRecord::new("cal-1", start()).with_title("Standup");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["calendar_id"], "cal-1");
        assert_eq!(json["title"], "Standup");
        assert_eq!(json["event_timezone"], "UTC");
        assert!(json.get("dtend").is_none());
        assert!(json.get("uid").is_none());
    }

    #[test]
    fn record_enums_use_schema_tokens() {
        let mut record = EventRecord::new("cal-1", start());
        record.status = Some(RecordStatus::Canceled);
        record.access_level = Some(AccessLevel::Default);
        record.availability = Some(Availability::Tentative);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "canceled");
        assert_eq!(json["access_level"], "default");
        assert_eq!(json["availability"], "tentative");
    }

    #[test]
    fn record_deserializes_with_defaults() {
        let json = r#"{"calendar_id":"c","dtstart":"2024-03-10T09:00:00Z","event_timezone":"UTC"}"#;
        let record: EventRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, EventRecord::new("c", start()));
    }

    #[test]
    fn reminder_alert() {
        let reminder = ReminderRecord::alert("7", 15);
        assert_eq!(reminder.method, ReminderMethod::Alert);
        let json = serde_json::to_value(&reminder).unwrap();
        assert_eq!(json["method"], "alert");
    }
}
