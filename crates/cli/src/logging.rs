//! Logging to stderr and a per-session file.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "gear.log";

/// Platform cache directory for logs, e.g. `~/.cache/gear-engine/logs`.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "gear-engine")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("gear-engine"))
        .join("logs")
}

pub fn session_name(session_id: Option<&str>) -> String {
    session_id.map(str::to_string).unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{timestamp}")
    })
}

/// Installs the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn setup_logging(log_dir: &Path, session_id: Option<&str>) -> Result<()> {
    let session_id = session_name(session_id);
    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir).map_err(|e| {
        anyhow::anyhow!(
            "Failed to create log directory {}: {}",
            session_log_dir.display(),
            e
        )
    })?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // The writer flushes on drop; keep it for the life of the process.
    std::mem::forget(guard);

    tracing::info!(session = %session_id, "logging initialized");
    tracing::debug!("log file: {}", session_log_dir.join(LOG_FILE).display());
    Ok(())
}
