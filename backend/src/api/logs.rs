//! Log broadcasting.
//!
//! Every log entry is mirrored to stderr and broadcast to subscribers, which
//! the HTTP server streams to clients via Server-Sent Events (SSE). Entries
//! carry an optional JSON context (platform, record kind, ...).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Structured context, `null` when absent
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub context: Value,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), context: Value::Null }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), context: Value::Null }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), context: Value::Null }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), context: Value::Null }
    }

    pub fn with_context(mut self, context: Value) -> Self {
        self.context = context;
        self
    }

    fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "   ✓",
            LogLevel::Warning => "   ⚠️",
            LogLevel::Error => "   ❌",
        };
        if self.context.is_null() {
            format!("{} {}", prefix, self.message)
        } else {
            format!("{} {} {}", prefix, self.message, self.context)
        }
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Broadcasts log entries to all connected SSE clients
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a log entry to all subscribers
    pub fn log(&self, entry: LogEntry) {
        // stdout is reserved for command output
        eprintln!("{}", entry.render());

        // Broadcast to SSE clients (ignore if no receivers)
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for SSE streaming
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::error(msg));
}

pub fn log_info_with(msg: impl Into<String>, context: Value) {
    LOG_BROADCASTER.log(LogEntry::info(msg).with_context(context));
}

pub fn log_warning_with(msg: impl Into<String>, context: Value) {
    LOG_BROADCASTER.log(LogEntry::warning(msg).with_context(context));
}

pub fn log_error_with(msg: impl Into<String>, context: Value) {
    LOG_BROADCASTER.log(LogEntry::error(msg).with_context(context));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_serialization_skips_empty_context() {
        let entry = LogEntry::info("hello");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"level": "info", "message": "hello"}));

        let entry = LogEntry::error("boom").with_context(json!({"platform": "tiktok"}));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["context"]["platform"], "tiktok");
    }

    #[test]
    fn test_subscribers_receive_entries() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        broadcaster.log(LogEntry::warning("careful").with_context(json!({"kind": "video"})));

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "careful");
        assert_eq!(entry.context["kind"], "video");
    }
}
