use std::fs::{self, OpenOptions};
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use tracing::info;

use crate::error::Result;
use crate::form::submission::FormSubmission;
use crate::parser::preference_headers;
use crate::schedule::{Day, PreferenceRegistry, WeeklyPreferences};

/// One CSV row in the `preference_headers` layout
fn preference_record(timestamp: DateTime<Utc>, name: &str, preferences: &WeeklyPreferences) -> Vec<String> {
    let mut record = vec![timestamp.to_rfc3339(), name.to_string()];
    for day in Day::ALL {
        let preference = preferences.get(day);
        record.push(preference.primary.to_string());
        record.push(preference.secondary.to_string());
    }
    record
}

fn ensure_parent(csv_path: &Path) -> Result<()> {
    if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Appends a submission to the preferences CSV, writing the header first if
/// the file is new or empty. The layout is the one `parser::load_preferences` reads.
///
/// Not safe against concurrent writers to the same file; callers serialize.
pub fn export_submission_to_csv(submission: &FormSubmission, csv_path: &Path) -> Result<()> {
    ensure_parent(csv_path)?;

    let file = OpenOptions::new().create(true).append(true).open(csv_path)?;
    let needs_header = file.metadata()?.len() == 0;
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);

    if needs_header {
        wtr.write_record(preference_headers())?;
    }
    wtr.write_record(preference_record(submission.timestamp, &submission.name, &submission.preferences))?;

    wtr.flush()?;
    Ok(())
}

/// Rewrites the preferences CSV so it holds exactly `registry`, in registry order.
/// Written to a sibling file first and renamed over the old one.
pub fn write_registry_to_csv(registry: &PreferenceRegistry, csv_path: &Path) -> Result<()> {
    ensure_parent(csv_path)?;

    let mut staging = csv_path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging_path = Path::new(&staging);

    let mut wtr = WriterBuilder::new().has_headers(false).from_path(staging_path)?;
    wtr.write_record(preference_headers())?;
    let now = Utc::now();
    for employee in registry.snapshot().employees() {
        wtr.write_record(preference_record(now, &employee.name, &employee.preferences))?;
    }
    wtr.flush()?;
    drop(wtr);

    fs::rename(staging_path, csv_path)?;
    info!(path = %csv_path.display(), employees = registry.len(), "preferences file rewritten");
    Ok(())
}
