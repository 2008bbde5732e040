use super::types::{Day, MAX_WORKING_DAYS};

/// Per-run bookkeeping of which days each employee already works.
/// Indexed by the employee's position in the registry snapshot.
#[derive(Debug, Clone)]
pub struct WorkloadTracker {
    consumed: Vec<[bool; 7]>,
    day_counts: Vec<usize>,
}

impl WorkloadTracker {
    pub fn new(employee_count: usize) -> Self {
        Self {
            consumed: vec![[false; 7]; employee_count],
            day_counts: vec![0; employee_count],
        }
    }

    pub fn works_on(&self, employee: usize, day: Day) -> bool {
        self.consumed[employee][day.index()]
    }

    pub fn at_limit(&self, employee: usize) -> bool {
        self.day_counts[employee] >= MAX_WORKING_DAYS
    }

    /// Under the weekly limit and still free on `day`
    pub fn is_available(&self, employee: usize, day: Day) -> bool {
        !self.at_limit(employee) && !self.works_on(employee, day)
    }

    pub fn record(&mut self, employee: usize, day: Day) {
        debug_assert!(self.is_available(employee, day));
        self.consumed[employee][day.index()] = true;
        self.day_counts[employee] += 1;
    }

    /// Employees free on `day`, in snapshot order
    pub fn available_on(&self, day: Day) -> Vec<usize> {
        (0..self.day_counts.len())
            .filter(|&employee| self.is_available(employee, day))
            .collect()
    }
}
