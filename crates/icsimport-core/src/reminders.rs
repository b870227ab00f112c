//! Reminder offsets derived from `VALARM` components.
//!
//! A reminder is the number of whole minutes before the event start at
//! which an alert fires. Only audible and display alarms qualify.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::event::{Alarm, Trigger, TriggerAnchor};

/// Derives reminder offsets from an event's alarms.
///
/// `end` is the instant relative `RELATED=END` triggers are measured from;
/// when it is `None` such triggers are skipped.
///
/// The result holds distinct, non-negative offsets in alarm order.
pub fn extract_reminders(
    alarms: &[Alarm],
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Vec<u32> {
    let mut reminders = Vec::new();

    for alarm in alarms {
        if !alarm.action.is_alert() {
            debug!(action = ?alarm.action, "Skipping alarm with unsupported action");
            continue;
        }

        let Some(minutes) = alarm
            .trigger
            .and_then(|trigger| reminder_minutes(trigger, start, end))
        else {
            debug!(trigger = ?alarm.trigger, "Skipping alarm with unsupported trigger");
            continue;
        };

        // Alarms after the start cannot be expressed as minutes before it.
        let Ok(minutes) = u32::try_from(minutes) else {
            debug!(minutes, "Skipping alarm outside the reminder range");
            continue;
        };

        if !reminders.contains(&minutes) {
            reminders.push(minutes);
        }
    }

    reminders
}

/// Returns the signed number of minutes before the start at which the
/// trigger fires, or `None` if the trigger shape is not supported.
fn reminder_minutes(
    trigger: Trigger,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
) -> Option<i64> {
    match trigger {
        Trigger::Absolute(at) => Some((start - at).num_minutes()),
        Trigger::Relative { offset, anchor } if offset < Duration::zero() => {
            let anchor = match anchor {
                TriggerAnchor::Start => start,
                TriggerAnchor::End => end?,
            };
            let fires_at = anchor.checked_add_signed(offset)?;
            Some((anchor - fires_at).num_minutes())
        }
        Trigger::Relative { .. } => None,
    }
}
