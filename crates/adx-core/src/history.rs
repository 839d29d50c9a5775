//! Bounded log history shown beneath the menu

use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Number of entries kept when no capacity is configured
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Severity tag of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
}

/// A single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    /// Build an entry stamped with the current local time
    ///
    /// Tabs become two spaces and surrounding whitespace is trimmed, so
    /// captured tool output lines up in the panel.
    pub fn new(message: impl AsRef<str>, severity: Severity) -> Self {
        Self {
            message: message.as_ref().replace('\t', "  ").trim().to_string(),
            severity,
            timestamp: Local::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// FIFO ring: once full, each push evicts the oldest entry
#[derive(Debug, Clone)]
pub struct LogHistory {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl LogHistory {
    /// Create a history holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn success(&mut self, message: impl AsRef<str>) {
        self.push(LogEntry::new(message, Severity::Success));
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.push(LogEntry::new(message, Severity::Error));
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.push(LogEntry::new(message, Severity::Info));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut history = LogHistory::new(5);
        for i in 0..6 {
            history.info(format!("entry {i}"));
        }

        assert_eq!(history.len(), 5);
        let messages: Vec<_> = history.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["entry 1", "entry 2", "entry 3", "entry 4", "entry 5"]
        );
    }

    #[test]
    fn test_message_normalization() {
        let entry = LogEntry::new("  \tpulled\tfile  \n", Severity::Info);
        assert_eq!(entry.message, "pulled  file");
    }

    #[test]
    fn test_severity_helpers() {
        let mut history = LogHistory::default();
        history.success("ok");
        history.error("bad");

        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
        assert!(history.latest().is_some_and(|e| e.is_error()));
        assert_eq!(history.iter().next().map(|e| e.severity), Some(Severity::Success));
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut history = LogHistory::new(0);
        history.info("a");
        history.info("b");
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|e| e.message.as_str()), Some("b"));
    }

    #[test]
    fn test_clear() {
        let mut history = LogHistory::default();
        history.info("a");
        history.clear();
        assert!(history.is_empty());
    }
}
