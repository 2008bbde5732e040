use std::fs;
use std::path::Path;

use crate::error::{Result, RosterError};
use crate::schedule::{Day, Schedule};

/// Renders the schedule as plain text: a heading per day and one line per
/// shift listing the assigned employees in assignment order
pub fn render_schedule(schedule: &Schedule) -> String {
    let mut out = String::from("Generated Weekly Schedule:\n\n");
    for day in Day::ALL {
        out.push_str(&format!("{}:\n", day));
        for (shift, employees) in schedule.day(day) {
            out.push_str(&format!("  {}: {}\n", shift, employees.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// Writes the text rendering to a file
pub fn write_schedule_to_file<P: AsRef<Path>>(schedule: &Schedule, path: P) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_schedule(schedule)).map_err(|source| RosterError::Persistence {
        path: path.to_path_buf(),
        source,
    })
}

/// Prints the schedule in a readable format, followed by any understaffed shifts
pub fn print_schedule(schedule: &Schedule) {
    print!("{}", render_schedule(schedule));
    println!("Total assignments: {}", schedule.total_assignments());

    let understaffed = schedule.understaffed();
    if !understaffed.is_empty() {
        println!("⚠️  Understaffed shifts ({}):", understaffed.len());
        for (day, shift, count) in understaffed {
            println!("  - {} {} ({} assigned)", day, shift, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ShiftKind;

    #[test]
    fn renders_days_and_shifts_in_order() {
        let mut schedule = Schedule::new();
        schedule.push(Day::Monday, ShiftKind::Morning, "Alice");
        schedule.push(Day::Monday, ShiftKind::Morning, "Bob");
        schedule.push(Day::Sunday, ShiftKind::Evening, "Carol");

        let text = render_schedule(&schedule);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Generated Weekly Schedule:");
        assert_eq!(lines[2], "Monday:");
        assert_eq!(lines[3], "  morning: Alice, Bob");
        assert_eq!(lines[4], "  afternoon: ");
        assert_eq!(lines[5], "  evening: ");
        assert!(text.contains("Sunday:\n  morning: \n  afternoon: \n  evening: Carol\n"));
        assert_eq!(text.matches(':').count(), 1 + 7 + 21);
    }

    #[test]
    fn writes_rendering_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        write_schedule_to_file(&Schedule::new(), &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("Generated Weekly Schedule:"));
    }
}
