//! Tracing installation.
//!
//! The renderer only emits `tracing` events; embedders that have no
//! subscriber of their own can call [`install_tracing`].

use std::str::FromStr;
use std::sync::{Mutex, Once, OnceLock};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;

static TRACING_INSTALLED: Once = Once::new();
static LOG_LEVEL: OnceLock<Mutex<LevelFilter>> = OnceLock::new();

fn log_level() -> &'static Mutex<LevelFilter> {
    LOG_LEVEL.get_or_init(|| Mutex::new(DEFAULT_LOG_LEVEL))
}

/// Sets the level used when `RUST_LOG` is unset. Unknown levels fall back to
/// `info`. Has no effect after [`install_tracing`] ran.
pub fn set_default_level(level: &str) {
    let parsed = LevelFilter::from_str(level).unwrap_or(DEFAULT_LOG_LEVEL);
    if let Ok(mut guard) = log_level().lock() {
        *guard = parsed;
    }
}

/// The level used when `RUST_LOG` is unset.
#[must_use]
pub fn default_level() -> LevelFilter {
    log_level()
        .lock()
        .map_or(DEFAULT_LOG_LEVEL, |guard| *guard)
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (idempotent).
pub fn install_tracing() {
    TRACING_INSTALLED.call_once(|| {
        let fallback = default_level();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback.to_string()));

        let console = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter);

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            eprintln!("waterui-reconcile: a global tracing subscriber is already installed");
        }
    });
}
