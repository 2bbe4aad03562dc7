use std::{
    env, fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result, anyhow};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use uuid::Uuid;

use crate::config::{LoggingConfig, LoggingRotation};

const LOG_FILE_PREFIX: &str = "gazette.log";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Keeps the non-blocking writer alive; dropping it flushes buffered events.
pub struct LoggingGuard {
    _worker_guard: WorkerGuard,
    run_id: String,
}

impl LoggingGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

/// Installs the global subscriber: JSON lines to a rolling file under
/// `logging.dir`, WARN and up mirrored to stderr when enabled, span traces
/// via `ErrorLayer`. Files left by runs outside the retention window are
/// removed once the subscriber is up.
pub fn init_tracing(config: &LoggingConfig) -> Result<LoggingGuard> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config.filter, rust_log.as_deref())?;
    let filter_directives = filter.to_string();

    let log_dir = absolute_log_dir(&config.dir)?;
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let appender = match config.rotation {
        LoggingRotation::Daily => rolling::daily(&log_dir, LOG_FILE_PREFIX),
        LoggingRotation::Hourly => rolling::hourly(&log_dir, LOG_FILE_PREFIX),
    };
    let (writer, worker_guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter);
    let stderr_layer = config.stderr_warn_enabled.then(|| {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(LevelFilter::WARN)
    });

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to install the tracing subscriber")?;

    let run_id = Uuid::now_v7().to_string();
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = %log_dir.display(),
        filter = %filter_directives,
        rotation = ?config.rotation,
        retention_days = config.retention_days,
        "logging_initialized"
    );

    if config.retention_days > 0 {
        let removed = purge_expired_logs(&log_dir, config.retention_days, SystemTime::now());
        if removed > 0 {
            tracing::debug!(target: "logging", removed, "expired_logs_removed");
        }
    }

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
        run_id,
    })
}

/// The config filter is the baseline; a non-blank `RUST_LOG` takes
/// precedence so a single run can be re-leveled without editing the config.
fn build_filter(configured: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    if configured.trim().is_empty() {
        return Err(anyhow!("logging.filter is empty"));
    }
    if let Some(directives) = rust_log.map(str::trim).filter(|d| !d.is_empty()) {
        return EnvFilter::try_new(directives)
            .with_context(|| format!("failed to parse RUST_LOG '{}'", directives));
    }
    EnvFilter::try_new(configured)
        .with_context(|| format!("failed to parse logging.filter '{}'", configured))
}

fn absolute_log_dir(dir: &Path) -> Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        return Err(anyhow!("logging.dir is empty"));
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = env::current_dir().context("failed to resolve the working directory")?;
    Ok(cwd.join(dir))
}

/// Removes rotated files whose mtime falls outside the retention window and
/// returns how many were deleted. Only `gazette.log*` files are considered.
fn purge_expired_logs(log_dir: &Path, retention_days: usize, now: SystemTime) -> usize {
    let retention = Duration::from_secs((retention_days as u64).saturating_mul(SECONDS_PER_DAY));
    let cutoff = now.checked_sub(retention).unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(
                target: "logging",
                dir = %log_dir.display(),
                error = %err,
                "log_purge_scan_failed"
            );
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        if !entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let Some(modified) = file_mtime(&entry) else {
            continue;
        };
        if modified > cutoff {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(err) => {
                tracing::warn!(
                    target: "logging",
                    file = %entry.path().display(),
                    error = %err,
                    "expired_log_removal_failed"
                );
            }
        }
    }
    removed
}

fn file_mtime(entry: &fs::DirEntry) -> Option<SystemTime> {
    let metadata = entry.metadata().ok()?;
    if !metadata.is_file() {
        return None;
    }
    metadata.modified().ok()
}
