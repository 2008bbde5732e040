use std::fs;
use std::path::Path;

use tracing::{error, info};

use crate::error::{Result, RosterError};
use crate::schedule::Schedule;

/// Where the schedule document goes unless configured otherwise
pub const DEFAULT_OUTPUT_PATH: &str = "weekly_schedule_output.json";

/// Persists the schedule as `{ day: { shift: [employee, ..] } }`.
///
/// A failed write is returned to the caller; the schedule itself is untouched
/// and nothing is retried.
pub fn write_schedule_json<P: AsRef<Path>>(schedule: &Schedule, path: P) -> Result<()> {
    let path = path.as_ref();
    let document = serde_json::to_string_pretty(schedule)?;

    match fs::write(path, document) {
        Ok(()) => {
            info!(path = %path.display(), "schedule saved");
            Ok(())
        }
        Err(source) => {
            error!(path = %path.display(), error = %source, "failed to save schedule");
            Err(RosterError::Persistence {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

pub fn read_schedule_json<P: AsRef<Path>>(path: P) -> Result<Schedule> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{AssignmentEngine, Day, PreferenceRegistry, ShiftKind, WeeklyPreferences};

    fn sample_schedule() -> Schedule {
        let mut registry = PreferenceRegistry::new();
        for name in ["Alice", "Bob", "Carol", "Dan"] {
            let weekly = WeeklyPreferences::new().with(Day::Tuesday, ShiftKind::Evening, ShiftKind::Morning);
            registry.add_or_replace(name, weekly).unwrap();
        }
        AssignmentEngine::seeded(3).generate(&registry.snapshot())
    }

    #[test]
    fn persisted_document_reads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_PATH);
        let schedule = sample_schedule();

        write_schedule_json(&schedule, &path).unwrap();
        let restored = read_schedule_json(&path).unwrap();

        assert_eq!(restored, schedule);
        assert_eq!(
            restored.shift(Day::Tuesday, ShiftKind::Evening),
            schedule.shift(Day::Tuesday, ShiftKind::Evening)
        );
    }

    #[test]
    fn document_has_seven_days_of_three_shifts() {
        let value = serde_json::to_value(sample_schedule()).unwrap();
        let days = value.as_object().unwrap();
        assert_eq!(days.len(), 7);
        for (_, shifts) in days {
            let shifts = shifts.as_object().unwrap();
            assert_eq!(shifts.len(), 3);
            assert!(shifts.contains_key("morning"));
            assert!(!shifts.contains_key("none"));
        }
        assert_eq!(value["Tuesday"]["evening"], serde_json::json!(["Alice", "Bob"]));
    }

    #[test]
    fn unwritable_location_reports_persistence_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("schedule.json");
        let schedule = sample_schedule();

        let err = write_schedule_json(&schedule, &path).unwrap_err();

        assert!(matches!(err, RosterError::Persistence { .. }));
        assert_eq!(schedule.total_assignments(), sample_schedule().total_assignments());
    }
}
