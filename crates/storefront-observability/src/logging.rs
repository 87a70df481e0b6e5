//! Structured logging with session context.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use storefront_commerce::SessionId;
use thiserror::Error;

/// Log level for structured logs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines, for piping into other tools.
    Json,
    /// Human-readable format.
    #[default]
    Human,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Human => "human",
        }
    }
}

/// Unrecognised level or format name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log {kind}: {value}")]
pub struct ParseLogError {
    kind: &'static str,
    value: String,
}

impl FromStr for LogLevel {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLogError {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ParseLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "human" | "text" => Ok(Self::Human),
            _ => Err(ParseLogError {
                kind: "format",
                value: s.to_string(),
            }),
        }
    }
}

/// A structured log entry.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// Log level.
    pub level: LogLevel,
    /// Log message.
    pub message: String,
    /// Session ID for correlation.
    pub session_id: String,
    /// Emitting component, e.g. "cart" or "checkout".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Additional structured fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Milliseconds since the logger was created.
    pub elapsed_ms: u64,
}

impl LogEntry {
    /// Format as JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.message.clone())
    }

    /// Format as human-readable string.
    pub fn to_human(&self) -> String {
        let mut s = format!("[{}]", self.level);
        if let Some(component) = &self.component {
            s.push_str(&format!(" {}:", component));
        }
        s.push(' ');
        s.push_str(&self.message);

        if !self.fields.is_empty() {
            s.push_str(" | ");
            let fields: Vec<String> = self
                .fields
                .iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(text) => format!("{}={}", k, text),
                    other => format!("{}={}", k, other),
                })
                .collect();
            s.push_str(&fields.join(" "));
        }

        s
    }

    fn render(&self, format: LogFormat) -> String {
        match format {
            LogFormat::Json => self.to_json(),
            LogFormat::Human => self.to_human(),
        }
    }
}

/// Where rendered log lines go.
#[derive(Debug, Clone, Default)]
pub enum LogSink {
    #[default]
    Stderr,
    /// Collects lines in memory; used by tests and the activity summary.
    Memory(Arc<Mutex<Vec<String>>>),
}

impl LogSink {
    /// A fresh in-memory sink.
    pub fn memory() -> Self {
        Self::Memory(Arc::default())
    }

    /// Lines written so far. Always empty for stderr.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Stderr => Vec::new(),
            Self::Memory(buffer) => buffer.lock().map(|b| b.clone()).unwrap_or_default(),
        }
    }

    fn write(&self, line: String) {
        match self {
            Self::Stderr => eprintln!("{}", line),
            Self::Memory(buffer) => match buffer.lock() {
                Ok(mut buffer) => buffer.push(line),
                Err(_) => tracing::warn!("log buffer poisoned, dropping entry"),
            },
        }
    }
}

/// Structured logger with session context.
///
/// Every entry carries the session id and the time elapsed since the logger
/// was created, so entries from one shopping session can be grouped.
#[derive(Debug, Clone)]
pub struct StructuredLogger {
    session_id: SessionId,
    component: Option<String>,
    start_time: Instant,
    min_level: LogLevel,
    format: LogFormat,
    sink: LogSink,
}

impl StructuredLogger {
    /// Create a new logger for a session.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            component: None,
            start_time: Instant::now(),
            min_level: LogLevel::Info,
            format: LogFormat::Human,
            sink: LogSink::Stderr,
        }
    }

    /// Set the component name.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Set minimum log level.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sink(mut self, sink: LogSink) -> Self {
        self.sink = sink;
        self
    }

    /// A logger sharing this one's session, clock and sink under another
    /// component name.
    pub fn child(&self, component: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.component = Some(component.into());
        child
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, BTreeMap::new());
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, BTreeMap::new());
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, BTreeMap::new());
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, BTreeMap::new());
    }

    /// Log at info level with fields.
    pub fn info_with(&self, message: &str, fields: &[(&str, &dyn fmt::Display)]) {
        let fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::json!(v.to_string())))
            .collect();
        self.log(LogLevel::Info, message, fields);
    }

    /// Whether entries at `level` would be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn log(&self, level: LogLevel, message: &str, fields: BTreeMap<String, serde_json::Value>) {
        if !self.enabled(level) {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            session_id: self.session_id.to_string(),
            component: self.component.clone(),
            fields,
            elapsed_ms: self.elapsed_ms(),
        };

        self.sink.write(entry.render(self.format));
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn sink(&self) -> &LogSink {
        &self.sink
    }

    /// Get elapsed time since logger creation.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Start building an info log entry.
    pub fn info_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Info, message)
    }

    /// Start building a warn log entry.
    pub fn warn_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Warn, message)
    }

    /// Start building a debug log entry.
    pub fn debug_builder(&self, message: impl Into<String>) -> LogBuilder<'_> {
        LogBuilder::new(self, LogLevel::Debug, message)
    }
}

/// Builder for log entries with fluent API.
pub struct LogBuilder<'a> {
    logger: &'a StructuredLogger,
    level: LogLevel,
    message: String,
    fields: BTreeMap<String, serde_json::Value>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(logger: &'a StructuredLogger, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger,
            level,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a string field.
    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields
            .insert(key.to_string(), serde_json::json!(value.into()));
        self
    }

    /// Add an integer field.
    pub fn field_i64(mut self, key: &str, value: i64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    pub fn field_u64(mut self, key: &str, value: u64) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    pub fn field_bool(mut self, key: &str, value: bool) -> Self {
        self.fields.insert(key.to_string(), serde_json::json!(value));
        self
    }

    /// Emit the log entry.
    pub fn emit(self) {
        self.logger.log(self.level, &self.message, self.fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(format: LogFormat) -> StructuredLogger {
        StructuredLogger::new(SessionId::new("sess-1"))
            .with_format(format)
            .with_sink(LogSink::memory())
    }

    #[test]
    fn test_min_level_filters() {
        let logger = logger(LogFormat::Human).with_min_level(LogLevel::Warn);
        logger.info("hidden");
        logger.debug("hidden");
        logger.warn("shown");
        logger.error("shown too");

        let lines = logger.sink().lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[WARN] shown"));
    }

    #[test]
    fn test_json_entry_carries_session_and_fields() {
        let logger = logger(LogFormat::Json).with_component("cart");
        logger
            .info_builder("cart changed")
            .field_u64("item_count", 3)
            .field("subtotal", "₹35.00")
            .emit();

        let lines = logger.sink().lines();
        let value: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(value["level"], "info");
        assert_eq!(value["session_id"], "sess-1");
        assert_eq!(value["component"], "cart");
        assert_eq!(value["item_count"], 3);
        assert_eq!(value["subtotal"], "₹35.00");
    }

    #[test]
    fn test_human_entry_lists_fields_in_order() {
        let logger = logger(LogFormat::Human).child("checkout");
        logger.info_with("order placed", &[("order", &"ORD-1"), ("items", &2)]);

        assert_eq!(
            logger.sink().lines(),
            ["[INFO] checkout: order placed | items=2 order=ORD-1"]
        );
    }

    #[test]
    fn test_child_shares_sink() {
        let parent = logger(LogFormat::Human);
        let child = parent.child("session");
        parent.info("one");
        child.info("two");
        assert_eq!(parent.sink().lines().len(), 2);
    }

    #[test]
    fn test_parse_level_and_format() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert_eq!(err.to_string(), "unknown log level: loud");
    }
}
