use chrono::Local;
use tracing::{debug, info};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Migration log kept for the report.
///
/// Every message goes through `tracing` and is also stored with a local
/// timestamp, `[2024-06-01 12:00:00] message`.
#[derive(Debug, Default, Clone)]
pub struct MigrationLog {
    entries: Vec<String>,
}

impl MigrationLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Progress line, shown at `info`.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{message}");
        self.push(message);
    }

    /// Per-record detail, shown at `debug`.
    pub fn detail(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("{message}");
        self.push(message);
    }

    fn push(&mut self, message: String) {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        self.entries.push(format!("[{timestamp}] {message}"));
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[must_use]
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_timestamped() {
        let mut log = MigrationLog::new();
        log.log("Found 2 files");
        log.detail("  + org https://vk.com/club1");

        assert_eq!(log.len(), 2);
        let first = &log.entries()[0];
        assert!(first.starts_with('['));
        assert!(first.ends_with("] Found 2 files"));
        // "[YYYY-MM-DD HH:MM:SS] " prefix
        assert_eq!(first.find(']'), Some(20));
        assert!(log.entries()[1].ends_with("+ org https://vk.com/club1"));
    }
}
