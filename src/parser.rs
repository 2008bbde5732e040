use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::error::{Result, RosterError};
use crate::schedule::{Day, Preference, PreferenceRegistry, Registration, ShiftKind, WeeklyPreferences};

/// Header row used when the tool itself writes a preferences CSV:
/// `timestamp,name,Monday primary,Monday secondary,...,Sunday secondary`
pub fn preference_headers() -> Vec<String> {
    let mut headers = vec!["timestamp".to_string(), "name".to_string()];
    for day in Day::ALL {
        headers.push(format!("{} primary", day));
        headers.push(format!("{} secondary", day));
    }
    headers
}

/// Column indices of one day's two choices; either may be absent
#[derive(Debug, Clone, Copy)]
struct DayColumns {
    primary: Option<usize>,
    secondary: Option<usize>,
}

fn find_column(headers: &StringRecord, day: Day, choice: &str) -> Option<usize> {
    let day = day.name().to_lowercase();
    headers.iter().position(|h| {
        let h = h.to_lowercase();
        h.contains(&day) && h.contains(choice)
    })
}

fn parse_cell(record: &StringRecord, column: Option<usize>, header: &str) -> Result<ShiftKind> {
    let value = column.and_then(|c| record.get(c)).unwrap_or("");
    value.parse::<ShiftKind>().map_err(|_| {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        RosterError::invalid_input(format!(
            "line {}, column '{}': '{}' is not one of none/morning/afternoon/evening",
            line, header, value
        ))
    })
}

/// Loads a preferences CSV from disk into a fresh registry
pub fn load_preferences<P: AsRef<Path>>(csv_path: P) -> Result<PreferenceRegistry> {
    let path = csv_path.as_ref();
    info!(path = %path.display(), "loading preferences");
    let reader = ReaderBuilder::new().flexible(true).trim(Trim::All).from_path(path)?;
    read_records(reader)
}

/// Same as `load_preferences` for any reader, e.g. an uploaded body
pub fn read_preferences<R: Read>(source: R) -> Result<PreferenceRegistry> {
    let reader = ReaderBuilder::new().flexible(true).trim(Trim::All).from_reader(source);
    read_records(reader)
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> Result<PreferenceRegistry> {
    let headers = reader.headers()?.clone();

    let name_col = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("name") || h.to_lowercase().contains("employee name"))
        .ok_or_else(|| RosterError::invalid_input("preferences CSV has no 'name' column"))?;

    let day_columns: Vec<(Day, DayColumns)> = Day::ALL
        .into_iter()
        .map(|day| {
            let columns = DayColumns {
                primary: find_column(&headers, day, "primary"),
                secondary: find_column(&headers, day, "secondary"),
            };
            if columns.primary.is_none() && columns.secondary.is_none() {
                debug!(%day, "no columns for day, treating as not available");
            }
            (day, columns)
        })
        .collect();

    let mut registry = PreferenceRegistry::new();
    let mut resubmissions = 0;

    for result in reader.records() {
        let record = result?;

        let name = record.get(name_col).unwrap_or("").trim();
        if name.is_empty() {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            warn!(line, "skipping row without an employee name");
            continue;
        }

        let mut weekly = WeeklyPreferences::new();
        for (day, columns) in &day_columns {
            let primary = parse_cell(&record, columns.primary, &format!("{} primary", day))?;
            let secondary = parse_cell(&record, columns.secondary, &format!("{} secondary", day))?;
            weekly.set(*day, Preference::new(primary, secondary));
        }

        if registry.add_or_replace(name, weekly)? == Registration::Replaced {
            resubmissions += 1;
        }
    }

    info!(
        employees = registry.len(),
        resubmissions, "loaded preferences (resubmissions merged)"
    );
    Ok(registry)
}
