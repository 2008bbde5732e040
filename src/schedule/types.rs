use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Minimum staffing per shift, also the most either phase will place in one shift
pub const SHIFT_COVERAGE: usize = 2;

/// Maximum number of days an employee may work in one week
pub const MAX_WORKING_DAYS: usize = 5;

/// Day of the week, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Position in the week, Monday = 0
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Day::ALL
            .into_iter()
            .find(|day| day.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RosterError::invalid_input(format!("unknown day '{}'", wanted)))
    }
}

/// Shift choice for a day; `None` means no preference / not working
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftKind {
    #[default]
    None,
    Morning,
    Afternoon,
    Evening,
}

impl ShiftKind {
    /// The shifts that can actually be staffed, in fallback and backfill order
    pub const WORKING: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Evening];

    pub fn is_working(self) -> bool {
        self != ShiftKind::None
    }

    /// Position within `WORKING`; `None` has no slot in a schedule
    pub fn working_index(self) -> Option<usize> {
        match self {
            ShiftKind::None => None,
            ShiftKind::Morning => Some(0),
            ShiftKind::Afternoon => Some(1),
            ShiftKind::Evening => Some(2),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShiftKind::None => "none",
            ShiftKind::Morning => "morning",
            ShiftKind::Afternoon => "afternoon",
            ShiftKind::Evening => "evening",
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShiftKind {
    type Err = RosterError;

    /// Case-insensitive; an empty cell reads as `None`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Ok(ShiftKind::None);
        }
        [ShiftKind::None, ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::Evening]
            .into_iter()
            .find(|shift| shift.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RosterError::invalid_input(format!("unknown shift '{}'", wanted)))
    }
}

/// Primary and secondary shift wish for one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default)]
    pub primary: ShiftKind,
    #[serde(default)]
    pub secondary: ShiftKind,
}

impl Preference {
    pub fn new(primary: ShiftKind, secondary: ShiftKind) -> Self {
        Self { primary, secondary }
    }

    /// Both choices are `None`: the employee is not offering to work this day
    pub fn is_unavailable(&self) -> bool {
        !self.primary.is_working() && !self.secondary.is_working()
    }
}

/// One preference per day of the week; days never set stay `(none, none)`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Day, Preference>", into = "BTreeMap<Day, Preference>")]
pub struct WeeklyPreferences {
    days: [Preference; 7],
}

impl WeeklyPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, day: Day, primary: ShiftKind, secondary: ShiftKind) -> Self {
        self.set(day, Preference::new(primary, secondary));
        self
    }

    pub fn set(&mut self, day: Day, preference: Preference) {
        self.days[day.index()] = preference;
    }

    pub fn get(&self, day: Day) -> Preference {
        self.days[day.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, Preference)> + '_ {
        Day::ALL.into_iter().map(move |day| (day, self.get(day)))
    }
}

impl From<BTreeMap<Day, Preference>> for WeeklyPreferences {
    fn from(map: BTreeMap<Day, Preference>) -> Self {
        let mut weekly = WeeklyPreferences::new();
        for (day, preference) in map {
            weekly.set(day, preference);
        }
        weekly
    }
}

impl From<WeeklyPreferences> for BTreeMap<Day, Preference> {
    fn from(weekly: WeeklyPreferences) -> Self {
        weekly.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_are_ordered_monday_first() {
        assert_eq!(Day::ALL[0], Day::Monday);
        assert_eq!(Day::ALL[6], Day::Sunday);
        assert!(Day::Tuesday < Day::Wednesday);
        assert_eq!(Day::Friday.index(), 4);
    }

    #[test]
    fn parses_day_and_shift_names_case_insensitively() {
        assert_eq!("thursday".parse::<Day>().unwrap(), Day::Thursday);
        assert_eq!(" Evening ".parse::<ShiftKind>().unwrap(), ShiftKind::Evening);
        assert_eq!("".parse::<ShiftKind>().unwrap(), ShiftKind::None);
        assert!("night".parse::<ShiftKind>().is_err());
        assert!("Funday".parse::<Day>().is_err());
    }

    #[test]
    fn working_shifts_exclude_none() {
        assert_eq!(ShiftKind::WORKING.len(), 3);
        assert!(!ShiftKind::WORKING.contains(&ShiftKind::None));
        assert_eq!(ShiftKind::None.working_index(), None);
        assert_eq!(ShiftKind::Evening.working_index(), Some(2));
    }

    #[test]
    fn weekly_preferences_default_to_unavailable() {
        let weekly = WeeklyPreferences::new().with(Day::Monday, ShiftKind::Morning, ShiftKind::None);
        assert!(!weekly.get(Day::Monday).is_unavailable());
        assert!(weekly.get(Day::Tuesday).is_unavailable());
        assert_eq!(weekly.iter().count(), 7);
    }

    #[test]
    fn weekly_preferences_accept_partial_json() {
        let weekly: WeeklyPreferences =
            serde_json::from_str(r#"{"Wednesday": {"primary": "afternoon"}}"#).unwrap();
        assert_eq!(
            weekly.get(Day::Wednesday),
            Preference::new(ShiftKind::Afternoon, ShiftKind::None)
        );
        assert_eq!(weekly.get(Day::Monday), Preference::default());
    }
}
