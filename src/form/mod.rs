pub mod submission;
pub mod export;

pub use submission::{FormSubmission, FormSubmissionRequest};
pub use export::{export_submission_to_csv, write_registry_to_csv};
