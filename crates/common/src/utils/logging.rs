use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter: `RUST_LOG` wins, otherwise the configured level with
/// tower_http request spans kept at info.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},tower_http=info,sqlx=warn")))
}

/// Initialize tracing subscriber with compact, human-readable output on stdout.
/// Intended for local development (`server --dev`).
pub fn init_logging_default(level: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(level))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// Initialize tracing subscriber with JSON structured output.
/// - Respects `RUST_LOG` if set, otherwise uses `level`
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_json(level: &str) {
    let _ = fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
