use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::registry::{EmployeePreferences, RegistrySnapshot};
use super::roster::Schedule;
use super::types::{Day, ShiftKind, SHIFT_COVERAGE};
use super::workload::WorkloadTracker;

/// Builds a weekly schedule from a registry snapshot.
///
/// Phase 1 places employees by preference, greedily, in registry order.
/// Phase 2 walks every shift still below coverage and fills it with
/// randomly chosen free employees. The random source is the only
/// nondeterminism, so a seeded engine reproduces its schedules exactly.
pub struct AssignmentEngine<R: Rng> {
    rng: R,
}

impl AssignmentEngine<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> AssignmentEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, snapshot: &RegistrySnapshot) -> Schedule {
        let employees = snapshot.employees();
        let mut schedule = Schedule::new();
        let mut workload = WorkloadTracker::new(employees.len());

        let placed = place_by_preference(employees, &mut schedule, &mut workload);
        let backfilled = self.backfill(employees, &mut schedule, &mut workload);

        let understaffed = schedule.understaffed();
        for (day, shift, count) in &understaffed {
            warn!(%day, %shift, staffed = count, required = SHIFT_COVERAGE, "shift left understaffed");
        }
        info!(
            employees = employees.len(),
            by_preference = placed,
            backfilled,
            understaffed = understaffed.len(),
            "schedule generated"
        );

        schedule
    }

    fn backfill(
        &mut self,
        employees: &[EmployeePreferences],
        schedule: &mut Schedule,
        workload: &mut WorkloadTracker,
    ) -> usize {
        let mut assigned = 0;

        for day in Day::ALL {
            for shift in ShiftKind::WORKING {
                while schedule.shift(day, shift).len() < SHIFT_COVERAGE {
                    let candidates = workload.available_on(day);
                    if candidates.is_empty() {
                        break;
                    }
                    let chosen = candidates[self.rng.gen_range(0..candidates.len())];
                    let name = &employees[chosen].name;

                    schedule.push(day, shift, name);
                    workload.record(chosen, day);
                    assigned += 1;
                    debug!(employee = %name, %day, %shift, pool = candidates.len(), "backfilled");
                }
            }
        }

        assigned
    }
}

/// Phase 1. Returns the number of assignments made.
fn place_by_preference(
    employees: &[EmployeePreferences],
    schedule: &mut Schedule,
    workload: &mut WorkloadTracker,
) -> usize {
    let mut assigned = 0;

    for (index, employee) in employees.iter().enumerate() {
        for day in Day::ALL {
            if workload.at_limit(index) {
                break;
            }
            if workload.works_on(index, day) {
                continue;
            }

            let preference = employee.preferences.get(day);
            if preference.is_unavailable() {
                continue;
            }

            if let Some(shift) = pick_shift(schedule, day, preference.primary, preference.secondary) {
                schedule.push(day, shift, &employee.name);
                workload.record(index, day);
                assigned += 1;
                debug!(employee = %employee.name, %day, %shift, "placed by preference");
            } else {
                debug!(employee = %employee.name, %day, "no open shift");
            }
        }
    }

    assigned
}

/// Primary, then secondary, then the first working shift with room
fn pick_shift(schedule: &Schedule, day: Day, primary: ShiftKind, secondary: ShiftKind) -> Option<ShiftKind> {
    let has_room = |shift: ShiftKind| schedule.shift(day, shift).len() < SHIFT_COVERAGE;

    if primary.is_working() && has_room(primary) {
        return Some(primary);
    }
    if secondary.is_working() && secondary != primary && has_room(secondary) {
        return Some(secondary);
    }
    ShiftKind::WORKING.into_iter().find(|&shift| has_room(shift))
}
