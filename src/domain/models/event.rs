//! System-level events written to the event sink.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemEventKind {
    SystemStarted,
    SystemStopped,
    SystemStartFailed,
    /// A tick returned an error; the loop keeps running
    DevelopmentLoopError,
    TaskPersistFailed,
}

impl SystemEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemStarted => "system_started",
            Self::SystemStopped => "system_stopped",
            Self::SystemStartFailed => "system_start_failed",
            Self::DevelopmentLoopError => "development_loop_error",
            Self::TaskPersistFailed => "task_persist_failed",
        }
    }
}

impl fmt::Display for SystemEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemEvent {
    pub kind: SystemEventKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl SystemEvent {
    pub fn new(kind: SystemEventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}
