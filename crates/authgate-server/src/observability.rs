//! Log setup for the server.
//!
//! Tracing starts at `info` before the configuration is read, then switches to
//! `logging.level` once it is known. The level applies to the AuthGate crates
//! and to request spans. Everything else stays at `warn`. A `RUST_LOG`
//! variable replaces the whole filter and disables the switch.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use crate::config::LoggingConfig;

/// Targets that follow the configured level.
const APP_TARGETS: &[&str] = &["authgate_authorize", "authgate_server", "tower_http"];

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

pub fn init_tracing() {
    init_tracing_with_level(&LoggingConfig::default().level);
}

pub fn init_tracing_with_level(level: &str) {
    let filter = if rust_log_set() {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(level))
    } else {
        level_filter(level)
    };

    let (reload_layer, handle) = reload::Layer::new(filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer())
        .try_init();
}

/// Switches to the configured level. Returns `false` when `RUST_LOG` is set
/// or tracing has not been initialised.
pub fn apply_logging_level(logging: &LoggingConfig) -> bool {
    if rust_log_set() {
        tracing::debug!(level = %logging.level, "RUST_LOG is set, keeping its filter");
        return false;
    }
    let Some(handle) = LOG_RELOAD_HANDLE.get() else {
        return false;
    };
    match handle.modify(|f| *f = level_filter(&logging.level)) {
        Ok(()) => {
            tracing::info!(level = %logging.level, "Log level applied");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to apply log level");
            false
        }
    }
}

fn rust_log_set() -> bool {
    std::env::var_os("RUST_LOG").is_some()
}

fn level_filter(level: &str) -> EnvFilter {
    let level = level.to_ascii_lowercase();
    let directives: Vec<String> = std::iter::once("warn".to_string())
        .chain(APP_TARGETS.iter().map(|target| format!("{target}={level}")))
        .collect();
    EnvFilter::new(directives.join(","))
}
