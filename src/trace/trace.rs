use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Where in an operation's lifetime an event was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Start,
    End,
    Failed,
    Note,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,

    /// Coarse grouping, e.g. "tool" or "pipeline"
    pub category: String,
    pub operation: String,
    pub phase: Phase,

    pub duration_ms: Option<u128>,
    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(category: &str, operation: &str, phase: Phase) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            category: category.to_string(),
            operation: operation.to_string(),
            phase,
            duration_ms: None,
            detail: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u128) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    /// Single-line human rendering: `[tool] generate_task - END (3ms)`.
    pub fn render(&self) -> String {
        let label = match self.phase {
            Phase::Start => "START",
            Phase::End => "END",
            Phase::Failed => "FAILED",
            Phase::Note => "NOTE",
        };
        let mut line = format!("[{}] {} - {}", self.category, self.operation, label);
        if let Some(ms) = self.duration_ms {
            line.push_str(&format!(" ({}ms)", ms));
        }
        if let Some(detail) = &self.detail {
            line.push_str(&format!(": {}", detail));
        }
        line
    }
}
