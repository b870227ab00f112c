//! `import` and `delete` commands.

use icsimport_engine::{ImportOptions, ImportProcessor, ImportReport, RunMode};
use icsimport_ics::parse_ics_file;
use icsimport_store::CalendarStore;
use tracing::info;

use crate::cli::ImportArgs;
use crate::error::{CliError, CliResult};

/// Reads the file named in `args` and runs it through the importer.
pub fn run(
    args: &ImportArgs,
    defaults: &ImportOptions,
    store: &mut dyn CalendarStore,
    mode: RunMode,
) -> CliResult<ImportReport> {
    let calendars = store.list_calendars()?;
    if !calendars.iter().any(|c| c.id == args.calendar) {
        return Err(CliError::UnknownCalendar(args.calendar.clone()));
    }

    let events = parse_ics_file(&args.file)?;
    info!(file = %args.file.display(), events = events.len(), "Read calendar file");

    let options = args.apply_to(defaults.clone());
    let report = ImportProcessor::new(store, args.calendar.as_str(), options)
        .with_mode(mode)
        .run(&events);

    println!("{}: {}", args.file.display(), report.summary);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use icsimport_store::{CalendarInfo, MemoryStore};
    use std::path::PathBuf;

    const ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:review@example.com\r\n\
DTSTART:20240310T140000Z\r\n\
DTEND:20240310T150000Z\r\n\
SUMMARY:Review\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    fn args(file: PathBuf, calendar: &str) -> ImportArgs {
        ImportArgs {
            file,
            calendar: calendar.to_string(),
            duplicates: None,
            match_uids: None,
            global_uids: None,
            import_reminders: None,
            default_reminders: Vec::new(),
        }
    }

    fn write_ics(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("review.ics");
        std::fs::write(&path, ICS).unwrap();
        path
    }

    #[test]
    fn imports_then_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_ics(&dir);
        let mut store = MemoryStore::new().with_calendar(CalendarInfo::new("work", "Work"));
        let defaults = ImportOptions::default();

        let report = run(&args(file.clone(), "work"), &defaults, &mut store, RunMode::Insert).unwrap();
        assert_eq!(report.summary.inserted, 1);
        assert_eq!(store.events().len(), 1);

        let report = run(&args(file, "work"), &defaults, &mut store, RunMode::Delete).unwrap();
        assert_eq!(report.summary.deleted, 1);
        assert!(store.events().is_empty());
    }

    #[test]
    fn unknown_calendar_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_ics(&dir);
        let mut store = MemoryStore::new();

        let err = run(&args(file, "work"), &ImportOptions::default(), &mut store, RunMode::Insert)
            .unwrap_err();
        assert!(matches!(err, CliError::UnknownCalendar(id) if id == "work"));
    }

    #[test]
    fn missing_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MemoryStore::new().with_calendar(CalendarInfo::new("work", "Work"));

        let err = run(
            &args(dir.path().join("missing.ics"), "work"),
            &ImportOptions::default(),
            &mut store,
            RunMode::Insert,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Ics(_)));
    }
}
