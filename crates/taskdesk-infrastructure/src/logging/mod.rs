//! Logging bootstrap.
//!
//! - One-line JSON records in a daily-rotated file under the log directory
//! - Coloured human-readable output on stdout in debug builds
//! - `log` crate records are forwarded into `tracing`
//!
//! Filters come from `RUST_LOG` when set, otherwise from the configured
//! level for `taskdesk*` targets.

use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

pub const LOG_FILE_PREFIX: &str = "taskdesk.log";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

static LOG_DIR: OnceLock<PathBuf> = OnceLock::new();
static LOGGER_READY: OnceLock<()> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialise the global subscriber. Later calls are no-ops.
///
/// `level` (e.g. `"debug"`) replaces the build-profile default for our own
/// crates; `RUST_LOG` still wins over both.
pub fn init_logger(log_dir: &Path, level: Option<&str>) -> anyhow::Result<()> {
    if LOGGER_READY.get().is_some() {
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)?;
    let _ = LOG_DIR.set(log_dir.to_path_buf());

    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init();

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::daily(log_dir, LOG_FILE_PREFIX));
    let _ = FILE_GUARD.set(guard);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_current_span(false)
        .with_span_list(false)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_timer(fmt::time::ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_filter(file_filter(level));

    let stdout_layer = cfg!(debug_assertions).then(|| {
        fmt::layer()
            .with_target(true)
            .with_ansi(true)
            .with_timer(fmt::time::ChronoLocal::new(
                "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            ))
            .with_filter(stdout_filter(level))
    });

    let subscriber = Registry::default().with(file_layer).with(stdout_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    let _ = LOGGER_READY.set(());

    tracing::info!(
        target: "taskdesk::logging",
        log_dir = %log_dir.display(),
        version = env!("CARGO_PKG_VERSION"),
        profile = if cfg!(debug_assertions) { "Debug" } else { "Release" },
        "Logger initialized"
    );

    Ok(())
}

fn file_filter(level: Option<&str>) -> EnvFilter {
    let default_level = match level {
        Some(level) => format!("warn,taskdesk={}", level),
        None if cfg!(debug_assertions) => "info,taskdesk=debug".to_string(),
        None => "warn,taskdesk=info".to_string(),
    };

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn stdout_filter(level: Option<&str>) -> EnvFilter {
    let default_level = format!("warn,taskdesk={}", level.unwrap_or("info"));

    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Directory passed to [`init_logger`], once initialised.
pub fn get_log_dir() -> Option<PathBuf> {
    LOG_DIR.get().cloned()
}
