use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Set up the tracing subscriber for the CLI.
///
/// Diagnostics go to stderr so stdout stays reserved for the generated commit
/// message. `RUST_LOG` overrides the default filter.
pub fn setup_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smart_commit=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
