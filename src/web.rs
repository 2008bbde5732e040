use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, ResponseError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::display::render_schedule;
use crate::error::RosterError;
use crate::export::write_schedule_json;
use crate::form::{export_submission_to_csv, write_registry_to_csv, FormSubmission, FormSubmissionRequest};
use crate::parser::read_preferences;
use crate::schedule::registry::EmployeePreferences;
use crate::schedule::{AssignmentEngine, Day, PreferenceRegistry, Registration, Schedule, ShiftKind};

/// Shared server state. The registry lock also guards the submissions CSV:
/// every write to that file happens while it is held. Generation works on a
/// snapshot so it never holds the lock.
pub struct AppState {
    pub registry: Mutex<PreferenceRegistry>,
    pub latest: Mutex<Option<GeneratedSchedule>>,
    pub seed: Option<u64>,
    pub output_path: PathBuf,
    pub submissions_path: PathBuf,
    pub admin_password: String,
}

impl AppState {
    pub fn new(config: &AppConfig, registry: PreferenceRegistry) -> Self {
        AppState {
            registry: Mutex::new(registry),
            latest: Mutex::new(None),
            seed: config.seed,
            output_path: config.output_path.clone(),
            submissions_path: config.submissions_path.clone(),
            admin_password: config.admin_password.clone(),
        }
    }

    /// Registers the submission and appends it to the submissions CSV as one
    /// step. Returns the registration outcome and whether the row was saved.
    pub fn record_submission(&self, submission: &FormSubmission) -> Result<(Registration, bool), RosterError> {
        let mut registry = lock(&self.registry)?;
        let outcome = registry.add_or_replace(&submission.name, submission.preferences.clone())?;

        let saved = match export_submission_to_csv(submission, &self.submissions_path) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, path = %self.submissions_path.display(), "could not record submission");
                false
            }
        };
        Ok((outcome, saved))
    }

    /// Swaps in a new registry after rewriting the submissions CSV to match it,
    /// so a restart reloads the same roster. On a write failure nothing changes.
    pub fn replace_registry(&self, registry: PreferenceRegistry) -> Result<(), RosterError> {
        let mut current = lock(&self.registry)?;
        write_registry_to_csv(&registry, &self.submissions_path)?;
        *current = registry;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSchedule {
    generated_at: DateTime<Utc>,
    schedule: Schedule,
    understaffed: Vec<UnderstaffedShift>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnderstaffedShift {
    day: Day,
    shift: ShiftKind,
    assigned: usize,
}

#[derive(Serialize)]
struct SubmitResponse {
    success: bool,
    replaced: bool,
    saved: bool,
}

#[derive(Serialize)]
struct GenerateResponse<'a> {
    success: bool,
    persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    persist_error: Option<String>,
    #[serde(flatten)]
    result: &'a GeneratedSchedule,
}

impl ResponseError for RosterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RosterError::InvalidInput(_) | RosterError::Csv(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RosterError> {
    mutex
        .lock()
        .map_err(|_| RosterError::Io(std::io::Error::new(std::io::ErrorKind::Other, "state lock poisoned")))
}

// Register or update one employee
async fn submit_employee(
    req: web::Json<FormSubmissionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, RosterError> {
    let submission = FormSubmission::from_request(req.into_inner())?;

    let (outcome, saved) = state.record_submission(&submission)?;
    info!(employee = %submission.name, ?outcome, saved, "employee submitted");

    Ok(HttpResponse::Ok().json(SubmitResponse {
        success: true,
        replaced: outcome == Registration::Replaced,
        saved,
    }))
}

async fn list_employees(state: web::Data<AppState>) -> Result<HttpResponse, RosterError> {
    let snapshot = lock(&state.registry)?.snapshot();
    let employees: &[EmployeePreferences] = snapshot.employees();
    Ok(HttpResponse::Ok().json(employees))
}

// Admin CSV upload: replaces the whole registry
async fn admin_upload(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse, RosterError> {
    let password = req
        .headers()
        .get("X-Admin-Password")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if password != state.admin_password {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"})));
    }

    let registry = read_preferences(&body[..])?;
    let count = registry.len();
    state.replace_registry(registry)?;
    info!(employees = count, "registry replaced from upload");

    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "employees": count})))
}

async fn generate_schedule(state: web::Data<AppState>) -> Result<HttpResponse, RosterError> {
    let snapshot = lock(&state.registry)?.snapshot();

    let schedule = match state.seed {
        Some(seed) => AssignmentEngine::seeded(seed).generate(&snapshot),
        None => AssignmentEngine::from_entropy().generate(&snapshot),
    };

    // a failed write is reported but the schedule is still served
    let persist_error = write_schedule_json(&schedule, &state.output_path)
        .err()
        .map(|e| e.to_string());

    let understaffed = schedule
        .understaffed()
        .into_iter()
        .map(|(day, shift, assigned)| UnderstaffedShift { day, shift, assigned })
        .collect();
    let result = GeneratedSchedule {
        generated_at: Utc::now(),
        schedule,
        understaffed,
    };

    let body = serde_json::to_value(GenerateResponse {
        success: true,
        persisted: persist_error.is_none(),
        persist_error,
        result: &result,
    })?;
    *lock(&state.latest)? = Some(result);

    Ok(HttpResponse::Ok().json(body))
}

async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse, RosterError> {
    match lock(&state.latest)?.as_ref() {
        Some(latest) => Ok(HttpResponse::Ok().json(latest)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Schedule not available"}))),
    }
}

async fn get_schedule_text(state: web::Data<AppState>) -> Result<HttpResponse, RosterError> {
    match lock(&state.latest)?.as_ref() {
        Some(latest) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body(render_schedule(&latest.schedule))),
        None => Ok(HttpResponse::NotFound().body("Schedule not available")),
    }
}

/// Route table, shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/employees", web::post().to(submit_employee))
        .route("/api/employees", web::get().to(list_employees))
        .route("/api/upload", web::post().to(admin_upload))
        .route("/api/schedule/generate", web::post().to(generate_schedule))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/schedule/text", web::get().to(get_schedule_text));
}

pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
