use std::path::Path;

use tracing::{error, info, warn};

use shift_roster::config::{AppConfig, Command, USAGE};
use shift_roster::display::{print_schedule, write_schedule_to_file};
use shift_roster::error::RosterError;
use shift_roster::export::write_schedule_json;
use shift_roster::parser::load_preferences;
use shift_roster::schedule::{AssignmentEngine, PreferenceRegistry};
use shift_roster::{logging, web};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    match &config.command {
        Command::Web { port } => run_web(*port, &config).await?,
        Command::Generate { preferences } => run_generate(preferences, &config)?,
    }

    Ok(())
}

async fn run_web(port: u16, config: &AppConfig) -> Result<(), RosterError> {
    if config.default_password {
        warn!("ADMIN_PASSWORD not set, using the built-in default password");
    }

    // pick up earlier submissions so a restart keeps the roster
    let registry = if config.submissions_path.exists() {
        load_preferences(&config.submissions_path)?
    } else {
        PreferenceRegistry::new()
    };

    println!("Starting web server on port {}...", port);
    println!("Access the API at http://localhost:{}/api/employees", port);

    web::start_server(port, web::AppState::new(config, registry)).await?;
    Ok(())
}

fn run_generate(preferences: &Path, config: &AppConfig) -> Result<(), RosterError> {
    println!("Loading preferences from {}...", preferences.display());
    let registry = load_preferences(preferences)?;
    println!("Loaded {} employees (resubmissions merged)", registry.len());

    let snapshot = registry.snapshot();
    let schedule = match config.seed {
        Some(seed) => {
            info!(seed, "using seeded backfill");
            AssignmentEngine::seeded(seed).generate(&snapshot)
        }
        None => AssignmentEngine::from_entropy().generate(&snapshot),
    };

    println!();
    print_schedule(&schedule);

    // the schedule is already computed and printed; a failed save is reported, not retried
    println!("\n=== Writing Schedule ===");
    match write_schedule_json(&schedule, &config.output_path) {
        Ok(()) => println!("Schedule saved to {}", config.output_path.display()),
        Err(e) => {
            error!(error = %e, "schedule was generated but not saved");
            return Err(e);
        }
    }
    if let Some(text_path) = &config.text_path {
        write_schedule_to_file(&schedule, text_path)?;
        println!("Text rendering saved to {}", text_path.display());
    }

    Ok(())
}
