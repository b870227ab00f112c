//! ICS/iCalendar parsing.
//!
//! This module reads iCalendar (RFC 5545) data with the `icalendar` crate's
//! tokenizer and converts every `VEVENT` into a [`SourceEvent`]. Values are
//! kept as written: dates stay dates, TZIDs stay attached, and nothing is
//! normalized here.

use std::path::Path;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use icalendar::parser::{Component, Property, read_calendar, unfold};
use icsimport_core::{
    Alarm, AlarmAction, Classification, EventStatus, EventTime, FreeBusyType, SourceEvent,
    Transparency, Trigger, TriggerAnchor,
};
use tracing::{debug, warn};

use crate::error::{IcsError, IcsResult};

/// Reads an `.ics` file and extracts its events.
pub fn parse_ics_file(path: impl AsRef<Path>) -> IcsResult<Vec<SourceEvent>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| IcsError::io(path, e))?;
    let events = parse_ics_content(&content)?;
    debug!(path = %path.display(), count = events.len(), "Read ICS file");
    Ok(events)
}

/// Parses ICS content and extracts events in document order.
///
/// `VEVENT`s without a usable `DTSTART` are skipped with a warning.
pub fn parse_ics_content(ics: &str) -> IcsResult<Vec<SourceEvent>> {
    let unfolded = unfold(ics);
    let calendar = read_calendar(&unfolded).map_err(IcsError::syntax)?;

    let mut events = Vec::new();
    collect_events(&calendar.components, &mut events);
    Ok(events)
}

/// Walks the component tree, parsing every `VEVENT` found.
fn collect_events(components: &[Component<'_>], events: &mut Vec<SourceEvent>) {
    for component in components {
        if is_named(component, "VEVENT") {
            if let Some(event) = parse_event(component) {
                events.push(event);
            }
        } else if is_named(component, "VCALENDAR") {
            collect_events(&component.components, events);
        }
    }
}

/// Parses a single VEVENT component into a SourceEvent.
fn parse_event(vevent: &Component<'_>) -> Option<SourceEvent> {
    let Some(start) = first_prop(vevent, "DTSTART").and_then(parse_time_property) else {
        warn!(uid = ?first_text(vevent, "UID"), "Skipping VEVENT without a valid DTSTART");
        return None;
    };
    if start.has_unknown_timezone() {
        warn!(tzid = start.timezone_name(), "Unknown TZID, reading DTSTART as UTC");
    }

    let mut event = SourceEvent::new(start);

    event.end = first_prop(vevent, "DTEND").and_then(parse_time_property);
    event.duration = first_value(vevent, "DURATION").and_then(|v| parse_duration(&v));

    event.uid = first_value(vevent, "UID");
    event.summary = first_text(vevent, "SUMMARY");
    event.description = first_text(vevent, "DESCRIPTION");
    event.location = first_text(vevent, "LOCATION");
    event.organizer = first_value(vevent, "ORGANIZER");
    event.url = first_value(vevent, "URL");

    event.rrule = first_value(vevent, "RRULE");
    event.rdate = joined_values(vevent, "RDATE");
    event.exrule = first_value(vevent, "EXRULE");
    event.exdate = joined_values(vevent, "EXDATE");

    event.status = first_value(vevent, "STATUS").and_then(|v| EventStatus::from_ics(&v));
    event.classification = first_value(vevent, "CLASS").map(|v| Classification::from_ics(&v));
    event.transparency = first_value(vevent, "TRANSP").map(|v| Transparency::from_ics(&v));
    event.free_busy = first_prop(vevent, "FREEBUSY").map(|prop| {
        param(prop, "FBTYPE")
            .map(|fb| FreeBusyType::from_ics(&fb))
            .unwrap_or(FreeBusyType::Busy)
    });

    if let Some(prop) = first_prop(vevent, "RECURRENCE-ID") {
        // The value only matters as a marker; keep it even if unparseable.
        event.recurrence_id =
            Some(parse_time_property(prop).unwrap_or_else(|| event.start.clone()));
    }

    event.alarms = vevent
        .components
        .iter()
        .filter(|c| is_named(c, "VALARM"))
        .map(parse_alarm)
        .collect();

    debug!(
        uid = ?event.uid,
        summary = ?event.summary,
        start = ?event.start,
        alarms = event.alarms.len(),
        "Parsed event from ICS"
    );

    Some(event)
}

/// Parses a VALARM component.
fn parse_alarm(valarm: &Component<'_>) -> Alarm {
    let action = first_value(valarm, "ACTION")
        .map(|v| AlarmAction::from_ics(&v))
        .unwrap_or(AlarmAction::Other);
    let trigger = first_prop(valarm, "TRIGGER").and_then(parse_trigger);
    Alarm { action, trigger }
}

/// Parses a TRIGGER property.
///
/// Absolute triggers are `VALUE=DATE-TIME` (always UTC per RFC 5545);
/// anything else is a duration relative to the start, or to the end with
/// `RELATED=END`.
fn parse_trigger(prop: &Property<'_>) -> Option<Trigger> {
    let value: &str = prop.val.as_ref();
    let absolute = param(prop, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE-TIME"))
        || value.trim().starts_with(|c: char| c.is_ascii_digit());

    if absolute {
        return parse_time_value(value, false, None).map(|t| Trigger::Absolute(t.to_utc()));
    }

    let anchor = match param(prop, "RELATED") {
        Some(related) if related.eq_ignore_ascii_case("END") => TriggerAnchor::End,
        _ => TriggerAnchor::Start,
    };
    parse_duration(value).map(|offset| Trigger::Relative { offset, anchor })
}

/// Parses a DTSTART/DTEND/RECURRENCE-ID style property.
fn parse_time_property(prop: &Property<'_>) -> Option<EventTime> {
    let is_date = param(prop, "VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"));
    let tzid = param(prop, "TZID");
    parse_time_value(prop.val.as_ref(), is_date, tzid.as_deref())
}

/// Parses an iCalendar date or date-time value.
///
/// Handles formats like:
/// - 20250205T100000Z (UTC)
/// - 20250205T100000 (floating, or zoned when a TZID is given)
/// - 20250205 (date only)
pub fn parse_time_value(value: &str, is_date: bool, tzid: Option<&str>) -> Option<EventTime> {
    let value = value.trim();

    if is_date || (value.len() == 8 && value.chars().all(|c| c.is_ascii_digit())) {
        let date = NaiveDate::parse_from_str(value, "%Y%m%d").ok()?;
        return Some(EventTime::from_date(date));
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let dt = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        return Some(EventTime::from_utc(dt.and_utc()));
    }

    let dt = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
    Some(match tzid {
        Some(tzid) => EventTime::zoned(dt, tzid),
        None => EventTime::floating(dt),
    })
}

/// Parses an RFC 5545 duration such as `PT15M`, `-P1D` or `+PT1H30M`.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (negative, unsigned) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };

    let parsed = iso8601::duration(unsigned).ok()?;
    let std_duration: std::time::Duration = parsed.into();
    let delta = Duration::from_std(std_duration).ok()?;

    Some(if negative { -delta } else { delta })
}

/// Reverses RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn is_named(component: &Component<'_>, name: &str) -> bool {
    let component_name: &str = component.name.as_ref();
    component_name.eq_ignore_ascii_case(name)
}

fn prop_named(prop: &Property<'_>, name: &str) -> bool {
    let prop_name: &str = prop.name.as_ref();
    prop_name.eq_ignore_ascii_case(name)
}

fn first_prop<'c, 'a>(component: &'c Component<'a>, name: &str) -> Option<&'c Property<'a>> {
    component.properties.iter().find(|p| prop_named(p, name))
}

/// Returns the raw value of the first property with this name.
fn first_value(component: &Component<'_>, name: &str) -> Option<String> {
    first_prop(component, name).map(|p| {
        let value: &str = p.val.as_ref();
        value.to_string()
    })
}

/// Returns the unescaped TEXT value of the first property with this name.
fn first_text(component: &Component<'_>, name: &str) -> Option<String> {
    first_value(component, name).map(|v| unescape_text(&v))
}

/// Joins the values of every property with this name with commas.
fn joined_values(component: &Component<'_>, name: &str) -> Option<String> {
    let values: Vec<&str> = component
        .properties
        .iter()
        .filter(|p| prop_named(p, name))
        .map(|p| p.val.as_ref())
        .filter(|v: &&str| !v.trim().is_empty())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

fn param(prop: &Property<'_>, key: &str) -> Option<String> {
    prop.params
        .iter()
        .find(|p| {
            let param_key: &str = p.key.as_ref();
            param_key.eq_ignore_ascii_case(key)
        })
        .and_then(|p| p.val.as_ref())
        .map(|v| {
            let value: &str = v.as_ref();
            value.trim_matches('"').to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_ics() -> &'static str {
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Test//Test//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:test-event-1@example.com\r\n\
         DTSTART:20250205T100000Z\r\n\
         DTEND:20250205T110000Z\r\n\
         SUMMARY:Team Meeting\\, weekly\r\n\
         DESCRIPTION:Weekly sync meeting\r\n\
         LOCATION:Conference Room A\r\n\
         ORGANIZER;CN=Jane:mailto:jane@example.com\r\n\
         URL:https://example.com/meeting\r\n\
         STATUS:CONFIRMED\r\n\
         CLASS:PRIVATE\r\n\
         TRANSP:OPAQUE\r\n\
         BEGIN:VALARM\r\n\
         ACTION:DISPLAY\r\n\
         TRIGGER:-PT15M\r\n\
         END:VALARM\r\n\
         BEGIN:VALARM\r\n\
         ACTION:AUDIO\r\n\
         TRIGGER;RELATED=END:-PT30M\r\n\
         END:VALARM\r\n\
         BEGIN:VALARM\r\n\
         ACTION:EMAIL\r\n\
         TRIGGER;VALUE=DATE-TIME:20250205T090000Z\r\n\
         END:VALARM\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR"
    }

    fn wrap(body: &str) -> String {
        format!(
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\n{body}END:VEVENT\r\nEND:VCALENDAR\r\n"
        )
    }

    mod events {
        use super::*;

        #[test]
        fn parse_basic_event() {
            let events = parse_ics_content(sample_ics()).unwrap();

            assert_eq!(events.len(), 1);
            let event = &events[0];

            assert_eq!(event.uid.as_deref(), Some("test-event-1@example.com"));
            assert_eq!(event.summary.as_deref(), Some("Team Meeting, weekly"));
            assert_eq!(event.description.as_deref(), Some("Weekly sync meeting"));
            assert_eq!(event.location.as_deref(), Some("Conference Room A"));
            assert_eq!(event.organizer.as_deref(), Some("mailto:jane@example.com"));
            assert_eq!(event.url.as_deref(), Some("https://example.com/meeting"));
            assert_eq!(event.status, Some(EventStatus::Confirmed));
            assert_eq!(event.classification, Some(Classification::Private));
            assert_eq!(event.transparency, Some(Transparency::Opaque));
            assert_eq!(
                event.start,
                EventTime::from_utc(Utc.with_ymd_and_hms(2025, 2, 5, 10, 0, 0).unwrap())
            );
            assert_eq!(
                event.end,
                Some(EventTime::from_utc(
                    Utc.with_ymd_and_hms(2025, 2, 5, 11, 0, 0).unwrap()
                ))
            );
            assert!(event.duration.is_none());
            assert!(!event.is_recurring());
            assert!(!event.is_recurrence_instance());
        }

        #[test]
        fn parse_alarms() {
            let events = parse_ics_content(sample_ics()).unwrap();
            let alarms = &events[0].alarms;

            assert_eq!(alarms.len(), 3);
            assert_eq!(alarms[0], Alarm::display_before_start(15));
            assert_eq!(alarms[1].action, AlarmAction::Audio);
            assert_eq!(
                alarms[1].trigger,
                Some(Trigger::Relative {
                    offset: -Duration::minutes(30),
                    anchor: TriggerAnchor::End,
                })
            );
            assert_eq!(alarms[2].action, AlarmAction::Email);
            assert_eq!(
                alarms[2].trigger,
                Some(Trigger::Absolute(
                    Utc.with_ymd_and_hms(2025, 2, 5, 9, 0, 0).unwrap()
                ))
            );
        }

        #[test]
        fn parse_all_day_event() {
            let ics = wrap("UID:all-day-1\r\nDTSTART;VALUE=DATE:20250210\r\nDTEND;VALUE=DATE:20250211\r\nSUMMARY:Company Holiday\r\n");
            let events = parse_ics_content(&ics).unwrap();

            assert_eq!(events.len(), 1);
            assert!(events[0].start.is_date());
            assert_eq!(
                events[0].end,
                Some(EventTime::from_date(
                    NaiveDate::from_ymd_opt(2025, 2, 11).unwrap()
                ))
            );
        }

        #[test]
        fn parse_zoned_start_and_duration() {
            let ics = wrap(
                "UID:zoned\r\nDTSTART;TZID=Europe/Berlin:20250210T090000\r\nDURATION:PT1H30M\r\n",
            );
            let events = parse_ics_content(&ics).unwrap();

            let naive = NaiveDate::from_ymd_opt(2025, 2, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap();
            assert_eq!(events[0].start, EventTime::zoned(naive, "Europe/Berlin"));
            assert_eq!(events[0].duration, Some(Duration::minutes(90)));
        }

        #[test]
        fn parse_recurrence_fields() {
            let ics = wrap(
                "UID:weekly\r\n\
                 DTSTART:20250210T090000Z\r\n\
                 DTEND:20250210T100000Z\r\n\
                 RRULE:FREQ=WEEKLY;BYDAY=MO\r\n\
                 EXDATE:20250217T090000Z\r\n\
                 EXDATE:20250224T090000Z\r\n",
            );
            let events = parse_ics_content(&ics).unwrap();

            assert_eq!(events[0].rrule.as_deref(), Some("FREQ=WEEKLY;BYDAY=MO"));
            assert_eq!(
                events[0].exdate.as_deref(),
                Some("20250217T090000Z,20250224T090000Z")
            );
            assert!(events[0].is_recurring());
        }

        #[test]
        fn parse_edited_instance() {
            let ics = wrap(
                "UID:weekly\r\nRECURRENCE-ID:20250217T090000Z\r\nDTSTART:20250217T100000Z\r\n",
            );
            let events = parse_ics_content(&ics).unwrap();
            assert!(events[0].is_recurrence_instance());
        }

        #[test]
        fn parse_free_busy_type() {
            let ics = wrap(
                "UID:fb\r\nDTSTART:20250210T090000Z\r\nFREEBUSY;FBTYPE=BUSY-TENTATIVE:20250210T090000Z/PT1H\r\n",
            );
            let events = parse_ics_content(&ics).unwrap();
            assert_eq!(events[0].free_busy, Some(FreeBusyType::BusyTentative));
        }

        #[test]
        fn free_busy_without_type_is_busy() {
            let ics = wrap("UID:fb\r\nDTSTART:20250210T090000Z\r\nFREEBUSY:20250210T090000Z/PT1H\r\n");
            let events = parse_ics_content(&ics).unwrap();
            assert_eq!(events[0].free_busy, Some(FreeBusyType::Busy));
        }

        #[test]
        fn unknown_transparency_blocks_time() {
            let ics = wrap(
                "UID:tr\r\nDTSTART:20250210T090000Z\r\nTRANSP:X-SOMETIMES\r\nFREEBUSY;FBTYPE=FREE:20250210T090000Z/PT1H\r\n",
            );
            let events = parse_ics_content(&ics).unwrap();
            assert_eq!(events[0].transparency, Some(Transparency::Opaque));
        }

        #[test]
        fn skips_event_without_start() {
            let ics = wrap("UID:nostart\r\nSUMMARY:Broken\r\n");
            let events = parse_ics_content(&ics).unwrap();
            assert!(events.is_empty());
        }

        #[test]
        fn keeps_document_order() {
            let ics = "BEGIN:VCALENDAR\r\n\
                       BEGIN:VEVENT\r\nUID:first\r\nDTSTART:20250210T090000Z\r\nEND:VEVENT\r\n\
                       BEGIN:VTODO\r\nUID:todo\r\nEND:VTODO\r\n\
                       BEGIN:VEVENT\r\nUID:second\r\nDTSTART:20250211T090000Z\r\nEND:VEVENT\r\n\
                       END:VCALENDAR\r\n";
            let events = parse_ics_content(ics).unwrap();
            let uids: Vec<_> = events.iter().filter_map(|e| e.uid.as_deref()).collect();
            assert_eq!(uids, vec!["first", "second"]);
        }

        #[test]
        fn reads_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("calendar.ics");
            std::fs::write(&path, sample_ics()).unwrap();

            let events = parse_ics_file(&path).unwrap();
            assert_eq!(events.len(), 1);
        }

        #[test]
        fn missing_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            let result = parse_ics_file(dir.path().join("missing.ics"));
            assert!(matches!(result, Err(IcsError::Io { .. })));
        }
    }

    mod values {
        use super::*;

        #[test]
        fn time_value_utc() {
            let result = parse_time_value("20250205T143000Z", false, None).unwrap();
            assert_eq!(
                result,
                EventTime::from_utc(Utc.with_ymd_and_hms(2025, 2, 5, 14, 30, 0).unwrap())
            );
        }

        #[test]
        fn time_value_date_only() {
            let result = parse_time_value("20250210", false, None).unwrap();
            assert_eq!(
                result,
                EventTime::from_date(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap())
            );
        }

        #[test]
        fn time_value_floating() {
            let result = parse_time_value("20250205T143000", false, None).unwrap();
            assert!(matches!(result, EventTime::Floating(_)));
        }

        #[test]
        fn time_value_garbage() {
            assert!(parse_time_value("tomorrow", false, None).is_none());
        }

        #[test]
        fn durations() {
            assert_eq!(parse_duration("PT15M"), Some(Duration::minutes(15)));
            assert_eq!(parse_duration("-PT15M"), Some(-Duration::minutes(15)));
            assert_eq!(parse_duration("+PT1H"), Some(Duration::hours(1)));
            assert_eq!(parse_duration("P1D"), Some(Duration::days(1)));
            assert_eq!(parse_duration("-P1W"), Some(-Duration::weeks(1)));
            assert_eq!(parse_duration("PT0S"), Some(Duration::zero()));
            assert_eq!(parse_duration("soon"), None);
        }

        #[test]
        fn unescapes_text() {
            assert_eq!(unescape_text("a\\,b\\;c"), "a,b;c");
            assert_eq!(unescape_text("line\\nbreak"), "line\nbreak");
            assert_eq!(unescape_text("back\\\\slash"), "back\\slash");
        }
    }
}
