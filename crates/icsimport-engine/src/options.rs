//! Import options.

use serde::{Deserialize, Serialize};

/// What to do when an incoming event already exists in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateHandling {
    /// Insert without looking for duplicates.
    DontCheck,
    /// Skip events that already exist anywhere.
    Ignore,
    /// Replace duplicates in the destination calendar.
    #[default]
    Replace,
    /// Replace duplicates in any calendar, inserting into the calendar the
    /// duplicate lived in.
    ReplaceAny,
}

impl DuplicateHandling {
    /// Returns `true` if the store must be queried for duplicates on insert.
    pub fn checks_duplicates(&self) -> bool {
        !matches!(self, Self::DontCheck)
    }
}

/// Whether a run adds events or removes previously imported ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    #[default]
    Insert,
    /// Delete the stored events matching the document; insert nothing.
    Delete,
}

/// Per-run configuration of the importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub duplicate_handling: DuplicateHandling,
    /// Look duplicates up by UID when both sides have one.
    pub match_uids: bool,
    /// UIDs are unique across calendars, not just within one.
    pub global_uids: bool,
    /// Keep the alarms of imported events.
    pub import_reminders: bool,
    /// Reminder minutes used when an event brings none of its own.
    pub default_reminders: Vec<u32>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            duplicate_handling: DuplicateHandling::default(),
            match_uids: true,
            global_uids: false,
            import_reminders: true,
            default_reminders: Vec::new(),
        }
    }
}

impl ImportOptions {
    /// Builder method to set the duplicate policy.
    pub fn with_duplicate_handling(mut self, handling: DuplicateHandling) -> Self {
        self.duplicate_handling = handling;
        self
    }

    /// Builder method to enable or disable UID matching.
    pub fn with_match_uids(mut self, match_uids: bool) -> Self {
        self.match_uids = match_uids;
        self
    }

    /// Builder method to treat UIDs as global.
    pub fn with_global_uids(mut self, global_uids: bool) -> Self {
        self.global_uids = global_uids;
        self
    }

    /// Builder method to enable or disable reminder import.
    pub fn with_import_reminders(mut self, import_reminders: bool) -> Self {
        self.import_reminders = import_reminders;
        self
    }

    /// Builder method to set the default reminders.
    pub fn with_default_reminders(mut self, minutes: Vec<u32>) -> Self {
        self.default_reminders = minutes;
        self
    }

    /// Picks the reminders to attach to an event.
    ///
    /// The event's own offsets win when reminder import is on and it has
    /// any; otherwise the configured defaults apply. The two are never
    /// merged. Duplicate defaults are dropped.
    pub fn effective_reminders(&self, own: &[u32]) -> Vec<u32> {
        let source = if self.import_reminders && !own.is_empty() {
            own
        } else {
            &self.default_reminders
        };

        let mut reminders = Vec::with_capacity(source.len());
        for &minutes in source {
            if !reminders.contains(&minutes) {
                reminders.push(minutes);
            }
        }
        reminders
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ImportOptions::default();
        assert_eq!(options.duplicate_handling, DuplicateHandling::Replace);
        assert!(options.match_uids);
        assert!(!options.global_uids);
        assert!(options.import_reminders);
        assert!(options.default_reminders.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let options: ImportOptions = toml::from_str(
            r#"
            duplicate_handling = "replace_any"
            default_reminders = [10, 60]
            "#,
        )
        .unwrap();

        assert_eq!(options.duplicate_handling, DuplicateHandling::ReplaceAny);
        assert_eq!(options.default_reminders, vec![10, 60]);
        assert!(options.match_uids);
    }

    #[test]
    fn dont_check_skips_lookups() {
        assert!(!DuplicateHandling::DontCheck.checks_duplicates());
        assert!(DuplicateHandling::Ignore.checks_duplicates());
        assert!(DuplicateHandling::ReplaceAny.checks_duplicates());
    }

    mod effective_reminders {
        use super::*;

        #[test]
        fn own_reminders_win() {
            let options = ImportOptions::default().with_default_reminders(vec![30]);
            assert_eq!(options.effective_reminders(&[5, 10]), vec![5, 10]);
        }

        #[test]
        fn defaults_when_event_has_none() {
            let options = ImportOptions::default().with_default_reminders(vec![30]);
            assert_eq!(options.effective_reminders(&[]), vec![30]);
        }

        #[test]
        fn defaults_when_import_disabled() {
            let options = ImportOptions::default()
                .with_import_reminders(false)
                .with_default_reminders(vec![30]);
            assert_eq!(options.effective_reminders(&[5]), vec![30]);
        }

        #[test]
        fn empty_when_nothing_configured() {
            let options = ImportOptions::default().with_import_reminders(false);
            assert!(options.effective_reminders(&[5]).is_empty());
        }

        #[test]
        fn duplicate_defaults_collapse() {
            let options = ImportOptions::default().with_default_reminders(vec![10, 10, 5]);
            assert_eq!(options.effective_reminders(&[]), vec![10, 5]);
        }
    }
}
