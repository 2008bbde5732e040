use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber
///
/// The filter comes from `RUST_LOG` and falls back to `info`,
/// e.g. `RUST_LOG=shift_roster=debug` to see every assignment decision.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Test variant: debug level, captured by the test harness, safe to call repeatedly
#[cfg(test)]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
