//! Activity log: process-wide append-only record of lifecycle events.
//!
//! Every request-handling step appends one timestamped line to
//! `<log_dir>/converter.log`. The file is never trimmed or rotated by the
//! application; recent lines are read back with [`ActivityLog::tail`].

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::warn;

use pagemark_shared::{PagemarkError, Result};

/// File name of the activity log inside the log directory.
const LOG_FILE_NAME: &str = "converter.log";

/// Placeholder returned by [`ActivityLog::tail`] before any entry exists.
const NO_LOGS_PLACEHOLDER: &str = "No logs available yet.";

/// Severity of an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

/// Append-only activity log backed by a single plain-text file.
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    /// Open (or prepare) the activity log under `log_dir`, creating the
    /// directory if absent. The log file itself is created lazily on the
    /// first [`record`](Self::record).
    pub fn new(log_dir: impl Into<PathBuf>) -> Result<Self> {
        let log_dir = log_dir.into();
        std::fs::create_dir_all(&log_dir).map_err(|e| PagemarkError::io(&log_dir, e))?;
        Ok(Self {
            path: log_dir.join(LOG_FILE_NAME),
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line. Never fails the caller; an append error
    /// is reported on the diagnostic channel and otherwise swallowed.
    pub fn record(&self, level: LogLevel, message: &str) {
        let line = format!(
            "{} - {level} - {message}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let appended = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));

        if let Err(e) = appended {
            warn!(path = %self.path.display(), error = %e, "failed to append activity log entry");
        }
    }

    /// Return at most the last `max_lines` lines of the log as one block of
    /// text, in original order. Returns a fixed placeholder when the log
    /// does not exist yet.
    pub fn tail(&self, max_lines: usize) -> String {
        if !self.path.exists() {
            return NO_LOGS_PLACEHOLDER.to_string();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let lines: Vec<&str> = content.lines().collect();
                let start = lines.len().saturating_sub(max_lines);
                lines[start..].join("\n")
            }
            Err(e) => format!("Error reading log file: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_without_log_file_returns_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path()).unwrap();
        assert_eq!(log.tail(100), "No logs available yet.");
    }

    #[test]
    fn record_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path()).unwrap();

        log.record(LogLevel::Info, "Starting conversion for URL: https://example.com");
        log.record(LogLevel::Error, "Failed to fetch URL: 404");

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" - INFO - Starting conversion for URL: https://example.com"));
        assert!(lines[1].contains(" - ERROR - Failed to fetch URL: 404"));
    }

    #[test]
    fn tail_returns_whole_log_when_shorter_than_limit() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path()).unwrap();

        log.record(LogLevel::Info, "one");
        log.record(LogLevel::Info, "two");

        let tail = log.tail(100);
        assert_eq!(tail.lines().count(), 2);
        assert!(tail.lines().next().unwrap().ends_with("one"));
        assert!(tail.lines().last().unwrap().ends_with("two"));
    }

    #[test]
    fn tail_returns_exactly_last_n_lines_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path()).unwrap();

        for i in 1..=10 {
            log.record(LogLevel::Info, &format!("entry {i}"));
        }

        let tail = log.tail(3);
        let lines: Vec<&str> = tail.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("entry 8"));
        assert!(lines[1].ends_with("entry 9"));
        assert!(lines[2].ends_with("entry 10"));
    }

    #[test]
    fn entries_are_never_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let log = ActivityLog::new(dir.path()).unwrap();

        log.record(LogLevel::Info, "first");
        let before = std::fs::read_to_string(log.path()).unwrap();
        log.record(LogLevel::Info, "second");
        let after = std::fs::read_to_string(log.path()).unwrap();

        assert!(after.starts_with(&before));
    }
}
