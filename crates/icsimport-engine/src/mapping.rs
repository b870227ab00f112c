//! CanonicalEvent to EventRecord field mapping.
//!
//! Most fields are copied as-is. Enumerations are translated through fixed
//! tables, and availability is only filled in for stores that have the
//! column.

use icsimport_core::{
    CanonicalEvent, Classification, EventSpan, EventStatus, FreeBusyType, Transparency,
    format_duration,
};
use icsimport_store::{AccessLevel, Availability, EventRecord, RecordStatus, StoreCapabilities};

/// Maps a normalized event onto the store schema.
///
/// `reminders` is the effective reminder set; it only decides `has_alarm`.
pub fn map_event(
    event: &CanonicalEvent<'_>,
    calendar_id: &str,
    reminders: &[u32],
    capabilities: StoreCapabilities,
) -> EventRecord {
    let source = event.source();
    let start = event.start();

    let mut record = EventRecord::new(calendar_id, start.to_utc());
    record.event_timezone = start.timezone_name().to_string();
    record.all_day = event.is_all_day();

    match event.span() {
        EventSpan::End(end) => {
            record.dtend = Some(end.to_utc());
            record.event_end_timezone = Some(end.timezone_name().to_string());
        }
        EventSpan::Duration(duration) => {
            record.duration = Some(format_duration(*duration));
        }
    }

    record.title = source.summary.clone();
    record.description = source.description.clone();
    record.location = source.location.clone();
    record.organizer = source.organizer.clone();
    record.guests_can_modify = source.organizer.is_some();

    record.status = source.status.map(map_status);
    record.access_level = source.classification.map(map_access_level);
    if capabilities.availability {
        record.availability = Some(map_availability(
            event.transparency(),
            source.free_busy,
        ));
    }

    record.rrule = source.rrule.clone();
    record.rdate = source.rdate.clone();
    record.exrule = source.exrule.clone();
    record.exdate = source.exdate.clone();

    record.uid = source
        .uid
        .clone()
        .filter(|uid| !uid.trim().is_empty());
    record.custom_app_uri = source.url.clone();
    record.has_alarm = !reminders.is_empty();

    record
}

fn map_status(status: EventStatus) -> RecordStatus {
    match status {
        EventStatus::Tentative => RecordStatus::Tentative,
        EventStatus::Confirmed => RecordStatus::Confirmed,
        EventStatus::Cancelled => RecordStatus::Canceled,
    }
}

fn map_access_level(class: Classification) -> AccessLevel {
    match class {
        Classification::Confidential => AccessLevel::Confidential,
        Classification::Private => AccessLevel::Private,
        Classification::Public => AccessLevel::Public,
        Classification::Other => AccessLevel::Default,
    }
}

/// TRANSP decides when present, then the FREEBUSY hint, then busy.
fn map_availability(
    transparency: Option<Transparency>,
    free_busy: Option<FreeBusyType>,
) -> Availability {
    match (transparency, free_busy) {
        (Some(Transparency::Transparent), _) => Availability::Free,
        (Some(Transparency::Opaque), _) => Availability::Busy,
        (None, Some(FreeBusyType::Free)) => Availability::Free,
        (None, Some(FreeBusyType::BusyTentative)) => Availability::Tentative,
        (None, _) => Availability::Busy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use icsimport_core::{EventTime, SourceEvent, normalize_event};

    fn utc(h: u32, m: u32) -> EventTime {
        EventTime::from_utc(Utc.with_ymd_and_hms(2024, 3, 10, h, m, 0).unwrap())
    }

    fn map(source: &SourceEvent) -> EventRecord {
        map_event(
            &normalize_event(source),
            "work",
            &[],
            StoreCapabilities::default(),
        )
    }

    mod copies {
        use super::*;

        #[test]
        fn text_fields() {
            let source = SourceEvent::new(utc(9, 0))
                .with_end(utc(10, 0))
                .with_summary("Planning")
                .with_description("Quarterly")
                .with_location("Room 4")
                .with_url("https://example.com/e/1")
                .with_rrule("FREQ=MONTHLY")
                .with_exdate("20240410T090000Z");
            let record = map(&source);

            assert_eq!(record.calendar_id, "work");
            assert_eq!(record.title.as_deref(), Some("Planning"));
            assert_eq!(record.description.as_deref(), Some("Quarterly"));
            assert_eq!(record.location.as_deref(), Some("Room 4"));
            assert_eq!(record.custom_app_uri.as_deref(), Some("https://example.com/e/1"));
            assert_eq!(record.rrule.as_deref(), Some("FREQ=MONTHLY"));
            assert_eq!(record.exdate.as_deref(), Some("20240410T090000Z"));
        }

        #[test]
        fn organizer_lets_guests_modify() {
            let record = map(&SourceEvent::new(utc(9, 0)).with_organizer("mailto:a@b.c"));
            assert_eq!(record.organizer.as_deref(), Some("mailto:a@b.c"));
            assert!(record.guests_can_modify);

            assert!(!map(&SourceEvent::new(utc(9, 0))).guests_can_modify);
        }

        #[test]
        fn blank_uid_dropped() {
            assert_eq!(map(&SourceEvent::new(utc(9, 0)).with_uid("  ")).uid, None);
            assert_eq!(
                map(&SourceEvent::new(utc(9, 0)).with_uid("abc")).uid.as_deref(),
                Some("abc")
            );
        }

        #[test]
        fn uid_kept_verbatim() {
            assert_eq!(
                map(&SourceEvent::new(utc(9, 0)).with_uid(" abc ")).uid.as_deref(),
                Some(" abc ")
            );
        }

        #[test]
        fn has_alarm_follows_reminders() {
            let source = SourceEvent::new(utc(9, 0));
            let event = normalize_event(&source);
            let caps = StoreCapabilities::default();

            assert!(map_event(&event, "work", &[10], caps).has_alarm);
            assert!(!map_event(&event, "work", &[], caps).has_alarm);
        }
    }

    mod times {
        use super::*;

        #[test]
        fn utc_start_and_end() {
            let record = map(&SourceEvent::new(utc(9, 0)).with_end(utc(10, 30)));

            assert_eq!(record.dtstart, utc(9, 0).to_utc());
            assert_eq!(record.event_timezone, "UTC");
            assert_eq!(record.dtend, Some(utc(10, 30).to_utc()));
            assert_eq!(record.event_end_timezone.as_deref(), Some("UTC"));
            assert_eq!(record.duration, None);
        }

        #[test]
        fn zoned_start_keeps_tzid() {
            let naive = NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap();
            let record = map(
                &SourceEvent::new(EventTime::zoned(naive, "America/New_York"))
                    .with_duration(Duration::hours(1)),
            );

            assert_eq!(record.event_timezone, "America/New_York");
            assert_eq!(
                record.dtstart,
                Utc.with_ymd_and_hms(2024, 7, 1, 13, 0, 0).unwrap()
            );
            assert_eq!(record.event_end_timezone.as_deref(), Some("America/New_York"));
        }

        #[test]
        fn recurring_duration_rendered() {
            let record = map(
                &SourceEvent::new(utc(9, 0))
                    .with_end(utc(10, 30))
                    .with_rrule("FREQ=DAILY"),
            );
            assert_eq!(record.duration.as_deref(), Some("PT1H30M"));
            assert_eq!(record.dtend, None);
        }

        #[test]
        fn all_day_flag() {
            let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
            let record = map(&SourceEvent::new(EventTime::from_date(date)));
            assert!(record.all_day);
            assert_eq!(record.event_timezone, "UTC");
        }
    }

    mod tables {
        use super::*;

        #[test]
        fn status() {
            let cases = [
                (EventStatus::Tentative, RecordStatus::Tentative),
                (EventStatus::Confirmed, RecordStatus::Confirmed),
                (EventStatus::Cancelled, RecordStatus::Canceled),
            ];
            for (status, expected) in cases {
                let record = map(&SourceEvent::new(utc(9, 0)).with_status(status));
                assert_eq!(record.status, Some(expected));
            }
            assert_eq!(map(&SourceEvent::new(utc(9, 0))).status, None);
        }

        #[test]
        fn access_level() {
            let cases = [
                (Classification::Confidential, AccessLevel::Confidential),
                (Classification::Private, AccessLevel::Private),
                (Classification::Public, AccessLevel::Public),
                (Classification::Other, AccessLevel::Default),
            ];
            for (class, expected) in cases {
                let record = map(&SourceEvent::new(utc(9, 0)).with_classification(class));
                assert_eq!(record.access_level, Some(expected));
            }
            assert_eq!(map(&SourceEvent::new(utc(9, 0))).access_level, None);
        }

        #[test]
        fn availability_from_transparency() {
            let transparent = SourceEvent::new(utc(9, 0))
                .with_end(utc(10, 0))
                .with_transparency(Transparency::Transparent)
                .with_free_busy(FreeBusyType::BusyTentative);
            assert_eq!(map(&transparent).availability, Some(Availability::Free));

            let opaque = SourceEvent::new(utc(9, 0))
                .with_end(utc(10, 0))
                .with_transparency(Transparency::Opaque)
                .with_free_busy(FreeBusyType::Free);
            assert_eq!(map(&opaque).availability, Some(Availability::Busy));
        }

        #[test]
        fn availability_from_free_busy() {
            let cases = [
                (FreeBusyType::Free, Availability::Free),
                (FreeBusyType::BusyTentative, Availability::Tentative),
                (FreeBusyType::BusyUnavailable, Availability::Busy),
                (FreeBusyType::Busy, Availability::Busy),
            ];
            for (fb, expected) in cases {
                let source = SourceEvent::new(utc(9, 0))
                    .with_end(utc(10, 0))
                    .with_free_busy(fb);
                assert_eq!(map(&source).availability, Some(expected));
            }
        }

        #[test]
        fn availability_defaults_to_busy() {
            let source = SourceEvent::new(utc(9, 0)).with_end(utc(10, 0));
            assert_eq!(map(&source).availability, Some(Availability::Busy));
        }

        #[test]
        fn zero_length_event_is_free() {
            assert_eq!(
                map(&SourceEvent::new(utc(9, 0))).availability,
                Some(Availability::Free)
            );
        }

        #[test]
        fn availability_omitted_without_capability() {
            let source = SourceEvent::new(utc(9, 0)).with_end(utc(10, 0));
            let record = map_event(
                &normalize_event(&source),
                "work",
                &[],
                StoreCapabilities {
                    availability: false,
                    uid: true,
                },
            );
            assert_eq!(record.availability, None);
        }
    }
}
