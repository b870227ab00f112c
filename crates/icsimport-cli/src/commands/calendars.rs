//! Calendar commands.

use icsimport_store::{CalendarInfo, CalendarStore, JsonFileStore};

use crate::error::CliResult;

/// Print every calendar with its entry count.
pub fn list(store: &JsonFileStore) -> CliResult<()> {
    let calendars = store.list_calendars()?;
    if calendars.is_empty() {
        println!("No calendars. Create one with `icsimport calendars add <ID> <NAME>`.");
        return Ok(());
    }
    for calendar in calendars {
        println!(
            "{}\t{}\t{} events",
            calendar.id, calendar.name, calendar.entry_count
        );
    }
    Ok(())
}

/// Create a calendar (or rename an existing one).
pub fn add(store: &mut JsonFileStore, id: String, name: String) -> CliResult<()> {
    let existing = store
        .list_calendars()?
        .into_iter()
        .find(|c| c.id == id)
        .map(|c| c.entry_count)
        .unwrap_or(0);
    store.add_calendar(CalendarInfo {
        id: id.clone(),
        name,
        entry_count: existing,
    })?;
    println!("Calendar '{}' saved to {}", id, store.path().display());
    Ok(())
}
