//! Structured logging setup.
//!
//! `RUST_LOG` wins when set. Otherwise `--verbose` selects `debug`, and the
//! configured level applies. Logs go to stderr so command output on stdout
//! stays clean.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive to use when `RUST_LOG` is absent.
pub fn default_directive(config_level: &str, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config_level.to_string()
    }
}

pub fn init_logging(config_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config_level, verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .try_init();
}
