//! Session log entries.

use serde::Serialize;

use crate::types::Timestamp;

/// Colour-coding bucket for a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Info,
    Success,
    Bid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub message: String,
    pub category: LogCategory,
}
