use crate::domain::errors::LogError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Severity of a log entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Every level in ascending order of severity
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    /// Parse free text into a level. Surrounding whitespace is ignored and
    /// matching is case-insensitive.
    pub fn parse(text: &str) -> Result<Self, LogError> {
        let normalized = text.trim().to_ascii_uppercase();
        Self::from_canonical(&normalized).ok_or_else(|| LogError::InvalidLevel {
            given: text.to_string(),
        })
    }

    /// Whether `text` is exactly one of the canonical (uppercase) level names
    pub fn is_valid(text: &str) -> bool {
        Self::from_canonical(text).is_some()
    }

    fn from_canonical(name: &str) -> Option<Self> {
        match name {
            "TRACE" => Some(LogLevel::Trace),
            "DEBUG" => Some(LogLevel::Debug),
            "INFO" => Some(LogLevel::Info),
            "WARN" => Some(LogLevel::Warn),
            "ERROR" => Some(LogLevel::Error),
            "FATAL" => Some(LogLevel::Fatal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Numeric priority, 1 (TRACE) through 6 (FATAL)
    pub fn priority(&self) -> u8 {
        match self {
            LogLevel::Trace => 1,
            LogLevel::Debug => 2,
            LogLevel::Info => 3,
            LogLevel::Warn => 4,
            LogLevel::Error => 5,
            LogLevel::Fatal => 6,
        }
    }

    /// Priority of a level given by name; unknown names map to 0
    pub fn priority_of(text: &str) -> u8 {
        Self::from_canonical(text).map_or(0, |level| level.priority())
    }

    pub fn is_more_severe_than(&self, other: LogLevel) -> bool {
        self.priority() > other.priority()
    }

    pub fn is_less_severe_than(&self, other: LogLevel) -> bool {
        self.priority() < other.priority()
    }

    /// Comma separated list of the valid names, used in diagnostics
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(LogLevel::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
