//! Observability: tracing init and the JSONL install audit log.
//!
//! Uses config::ObservabilityConfig for GOINST_QUIET, LOG_LEVEL, LOG_JSON, AUDIT_LOG.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize tracing. Call at process startup.
///
/// Logs go to stderr; stdout is reserved for the operator report and the
/// forwarded fetch tool output. When GOINST_QUIET=1 only WARN and above are logged.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "goinst=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn audit_path() -> Option<PathBuf> {
    let path = PathBuf::from(ObservabilityConfig::from_env().audit_log.as_ref()?);
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    Some(path)
}

/// Append one JSON record as a line. Audit failures never abort an install.
pub fn append_jsonl(path: &Path, record: &serde_json::Value) {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut f) => {
            if let Ok(line) = serde_json::to_string(record) {
                if let Err(e) = writeln!(f, "{}", line) {
                    tracing::debug!(path = %path.display(), "audit write failed: {}", e);
                }
            }
        }
        Err(e) => tracing::debug!(path = %path.display(), "audit log unavailable: {}", e),
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Audit: install_started (at pipeline start, before preconditions are checked)
pub fn audit_install_started(package: &str, bin_dir: &Path, go_program: &str) {
    if let Some(path) = audit_path() {
        let record = json!({
            "ts": now(),
            "event": "install_started",
            "package": package,
            "bin_dir": bin_dir.display().to_string(),
            "go": go_program,
        });
        append_jsonl(&path, &record);
    }
}

/// Audit: install_completed (after reclaim, success or failure)
pub fn audit_install_completed(
    package: &str,
    installed: &[PathBuf],
    duration_ms: u64,
    error: Option<&str>,
) {
    if let Some(path) = audit_path() {
        let installed: Vec<String> = installed.iter().map(|p| p.display().to_string()).collect();
        let record = json!({
            "ts": now(),
            "event": "install_completed",
            "package": package,
            "success": error.is_none(),
            "installed": installed,
            "duration_ms": duration_ms,
            "error": error,
        });
        append_jsonl(&path, &record);
    }
}
