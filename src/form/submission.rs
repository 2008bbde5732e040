use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};
use crate::schedule::WeeklyPreferences;

/// Employee registration as received from the frontend.
/// Days left out of `preferences` mean "not available".
#[derive(Debug, Clone, Deserialize)]
pub struct FormSubmissionRequest {
    pub name: String,
    #[serde(default)]
    pub preferences: WeeklyPreferences,
}

/// Validated submission, stamped on arrival
#[derive(Debug, Clone, Serialize)]
pub struct FormSubmission {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub preferences: WeeklyPreferences,
}

impl FormSubmission {
    pub fn from_request(req: FormSubmissionRequest) -> Result<Self> {
        validate_submission(&req)?;
        Ok(FormSubmission {
            timestamp: Utc::now(),
            name: req.name.trim().to_string(),
            preferences: req.preferences,
        })
    }
}

/// Validates a form submission
pub fn validate_submission(req: &FormSubmissionRequest) -> Result<()> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(RosterError::invalid_input("employee name is required"));
    }
    if name.chars().any(char::is_control) {
        return Err(RosterError::invalid_input("employee name must not contain control characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Day, ShiftKind};

    #[test]
    fn parses_frontend_payload() {
        let req: FormSubmissionRequest = serde_json::from_str(
            r#"{"name": " Erin ", "preferences": {"Monday": {"primary": "morning", "secondary": "evening"}}}"#,
        )
        .unwrap();
        let submission = FormSubmission::from_request(req).unwrap();

        assert_eq!(submission.name, "Erin");
        assert_eq!(submission.preferences.get(Day::Monday).secondary, ShiftKind::Evening);
        assert!(submission.preferences.get(Day::Friday).is_unavailable());
    }

    #[test]
    fn unknown_shift_names_fail_to_parse() {
        let parsed = serde_json::from_str::<FormSubmissionRequest>(
            r#"{"name": "Erin", "preferences": {"Monday": {"primary": "night"}}}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn rejects_blank_or_multiline_names() {
        for name in ["", "   ", "Erin\nEvans"] {
            let req = FormSubmissionRequest {
                name: name.to_string(),
                preferences: WeeklyPreferences::new(),
            };
            assert!(matches!(validate_submission(&req), Err(RosterError::InvalidInput(_))));
        }
    }
}
