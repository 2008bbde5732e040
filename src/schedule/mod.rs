pub mod types;
pub mod registry;
pub mod workload;
pub mod roster;
pub mod engine;

pub use types::{Day, Preference, ShiftKind, WeeklyPreferences};
pub use registry::{PreferenceRegistry, Registration};
pub use roster::Schedule;
pub use engine::AssignmentEngine;
