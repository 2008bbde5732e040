use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{Day, ShiftKind, SHIFT_COVERAGE};

type ScheduleDocument = BTreeMap<Day, BTreeMap<ShiftKind, Vec<String>>>;

/// Generated week: day -> working shift -> employees in assignment order.
///
/// Serializes as `{ "Monday": { "morning": [..], "afternoon": [..], "evening": [..] }, .. }`
/// with days in week order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "ScheduleDocument", try_from = "ScheduleDocument")]
pub struct Schedule {
    shifts: [[Vec<String>; 3]; 7],
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Employees on `shift` for `day`; always empty for `ShiftKind::None`
    pub fn shift(&self, day: Day, shift: ShiftKind) -> &[String] {
        match shift.working_index() {
            Some(i) => &self.shifts[day.index()][i],
            None => &[],
        }
    }

    pub(crate) fn push(&mut self, day: Day, shift: ShiftKind, employee: &str) {
        if let Some(i) = shift.working_index() {
            self.shifts[day.index()][i].push(employee.to_string());
        }
    }

    pub fn day(&self, day: Day) -> impl Iterator<Item = (ShiftKind, &[String])> + '_ {
        ShiftKind::WORKING
            .into_iter()
            .map(move |shift| (shift, self.shift(day, shift)))
    }

    /// Every (day, shift) pair in week order, then shift order
    pub fn iter(&self) -> impl Iterator<Item = (Day, ShiftKind, &[String])> + '_ {
        Day::ALL.into_iter().flat_map(move |day| {
            self.day(day).map(move |(shift, employees)| (day, shift, employees))
        })
    }

    /// Shifts holding fewer than the coverage level, with their head count
    pub fn understaffed(&self) -> Vec<(Day, ShiftKind, usize)> {
        self.iter()
            .filter(|(_, _, employees)| employees.len() < SHIFT_COVERAGE)
            .map(|(day, shift, employees)| (day, shift, employees.len()))
            .collect()
    }

    pub fn assignments_for(&self, name: &str) -> Vec<(Day, ShiftKind)> {
        self.iter()
            .filter(|(_, _, employees)| employees.iter().any(|e| e == name))
            .map(|(day, shift, _)| (day, shift))
            .collect()
    }

    pub fn total_assignments(&self) -> usize {
        self.iter().map(|(_, _, employees)| employees.len()).sum()
    }
}

impl From<Schedule> for ScheduleDocument {
    fn from(schedule: Schedule) -> Self {
        let mut document = ScheduleDocument::new();
        for (day, shifts) in Day::ALL.into_iter().zip(schedule.shifts) {
            let by_shift = ShiftKind::WORKING.into_iter().zip(shifts).collect();
            document.insert(day, by_shift);
        }
        document
    }
}

impl TryFrom<ScheduleDocument> for Schedule {
    type Error = String;

    fn try_from(mut document: ScheduleDocument) -> Result<Self, Self::Error> {
        let mut schedule = Schedule::new();
        for day in Day::ALL {
            let mut by_shift = document
                .remove(&day)
                .ok_or_else(|| format!("schedule is missing {}", day))?;
            if by_shift.contains_key(&ShiftKind::None) {
                return Err(format!("{} lists a 'none' shift", day));
            }
            for shift in ShiftKind::WORKING {
                let employees = by_shift
                    .remove(&shift)
                    .ok_or_else(|| format!("{} is missing the {} shift", day, shift))?;
                for employee in &employees {
                    schedule.push(day, shift, employee);
                }
            }
        }
        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_shift_is_always_empty() {
        let mut schedule = Schedule::new();
        schedule.push(Day::Monday, ShiftKind::None, "Alice");
        assert!(schedule.shift(Day::Monday, ShiftKind::None).is_empty());
        assert_eq!(schedule.total_assignments(), 0);
    }

    #[test]
    fn iterates_in_day_then_shift_order() {
        let schedule = Schedule::new();
        let order: Vec<(Day, ShiftKind)> = schedule.iter().map(|(d, s, _)| (d, s)).take(4).collect();
        assert_eq!(
            order,
            vec![
                (Day::Monday, ShiftKind::Morning),
                (Day::Monday, ShiftKind::Afternoon),
                (Day::Monday, ShiftKind::Evening),
                (Day::Tuesday, ShiftKind::Morning),
            ]
        );
        assert_eq!(schedule.iter().count(), 21);
    }

    #[test]
    fn understaffed_reports_short_shifts() {
        let mut schedule = Schedule::new();
        for (day, shift, _) in Schedule::new().iter() {
            schedule.push(day, shift, "A");
            schedule.push(day, shift, "B");
        }
        assert!(schedule.understaffed().is_empty());

        let mut short = Schedule::new();
        short.push(Day::Sunday, ShiftKind::Evening, "A");
        let understaffed = short.understaffed();
        assert_eq!(understaffed.len(), 21);
        assert!(understaffed.contains(&(Day::Sunday, ShiftKind::Evening, 1)));
    }

    #[test]
    fn document_lists_days_in_week_order() {
        let mut schedule = Schedule::new();
        schedule.push(Day::Monday, ShiftKind::Morning, "Alice");
        let json = serde_json::to_string(&schedule).unwrap();

        assert!(json.starts_with(r#"{"Monday":{"morning":["Alice"],"afternoon":[],"evening":[]}"#));
        assert!(json.find("Saturday").unwrap() < json.find("Sunday").unwrap());
    }

    #[test]
    fn rejects_incomplete_documents() {
        let missing_day = r#"{"Monday":{"morning":[],"afternoon":[],"evening":[]}}"#;
        assert!(serde_json::from_str::<Schedule>(missing_day).is_err());

        let mut value = serde_json::to_value(Schedule::new()).unwrap();
        value["Friday"]["none"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Schedule>(value).is_err());
    }
}
