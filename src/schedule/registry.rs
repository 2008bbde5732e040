use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::WeeklyPreferences;
use crate::error::{Result, RosterError};

/// An employee and their wishes for the week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePreferences {
    pub name: String,
    pub preferences: WeeklyPreferences,
}

/// Outcome of a registration; a replacement is not an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    Replaced,
}

/// Ordered employee store. Re-registering a name overwrites its preferences
/// in place, so iteration order is first-registration order.
#[derive(Debug, Clone, Default)]
pub struct PreferenceRegistry {
    employees: Vec<EmployeePreferences>,
}

impl PreferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_or_replace(&mut self, name: &str, preferences: WeeklyPreferences) -> Result<Registration> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::invalid_input("employee name must not be empty"));
        }

        if let Some(existing) = self.employees.iter_mut().find(|e| e.name == name) {
            existing.preferences = preferences;
            debug!(employee = name, "replaced preferences of existing employee");
            return Ok(Registration::Replaced);
        }

        self.employees.push(EmployeePreferences {
            name: name.to_string(),
            preferences,
        });
        debug!(employee = name, position = self.employees.len() - 1, "registered employee");
        Ok(Registration::Added)
    }

    pub fn get(&self, name: &str) -> Option<&WeeklyPreferences> {
        let name = name.trim();
        self.employees
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.preferences)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.employees.iter().map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Owned, read-only copy for the assignment engine
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            employees: self.employees.clone(),
        }
    }
}

/// Immutable view of the registry taken at generation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    employees: Vec<EmployeePreferences>,
}

impl RegistrySnapshot {
    pub fn employees(&self) -> &[EmployeePreferences] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
