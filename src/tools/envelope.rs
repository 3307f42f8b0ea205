use serde_json::{Map, Value, json};

use crate::error::ScaffoldError;
use crate::trace::timed::Outcome;

/// Uniform result of every tool call: `{status: "success", ...payload}` or
/// `{status: "error", error, hint?, traceback?}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    Success(Map<String, Value>),
    Error {
        error: String,
        hint: Option<String>,
        traceback: Option<String>,
    },
}

impl ToolResponse {
    pub fn success(payload: Map<String, Value>) -> Self {
        ToolResponse::Success(payload)
    }

    pub fn error(error: impl Into<String>) -> Self {
        ToolResponse::Error {
            error: error.into(),
            hint: None,
            traceback: None,
        }
    }

    pub fn from_error(err: &ScaffoldError) -> Self {
        ToolResponse::Error {
            error: err.to_string(),
            hint: err.hint(),
            traceback: None,
        }
    }

    pub fn with_hint(self, text: impl Into<String>) -> Self {
        match self {
            ToolResponse::Error {
                error, traceback, ..
            } => ToolResponse::Error {
                error,
                hint: Some(text.into()),
                traceback,
            },
            other => other,
        }
    }

    pub fn with_traceback(self, text: impl Into<String>) -> Self {
        match self {
            ToolResponse::Error { error, hint, .. } => ToolResponse::Error {
                error,
                hint,
                traceback: Some(text.into()),
            },
            other => other,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResponse::Success(_))
    }

    /// Payload field of a successful response.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            ToolResponse::Success(payload) => payload.get(key),
            ToolResponse::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ToolResponse::Error { error, .. } => Some(error),
            ToolResponse::Success(_) => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ToolResponse::Success(payload) => {
                let mut out = Map::with_capacity(payload.len() + 1);
                out.insert("status".to_string(), json!("success"));
                for (k, v) in payload {
                    out.insert(k.clone(), v.clone());
                }
                Value::Object(out)
            }
            ToolResponse::Error {
                error,
                hint,
                traceback,
            } => {
                let mut out = Map::new();
                out.insert("status".to_string(), json!("error"));
                out.insert("error".to_string(), json!(error));
                if let Some(hint) = hint {
                    out.insert("hint".to_string(), json!(hint));
                }
                if let Some(traceback) = traceback {
                    out.insert("traceback".to_string(), json!(traceback));
                }
                Value::Object(out)
            }
        }
    }

    pub fn to_json_pretty(&self) -> String {
        // Serializing a `Value` cannot fail.
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_default()
    }
}

impl Outcome for ToolResponse {
    fn failure(&self) -> Option<String> {
        self.error_message().map(str::to_string)
    }
}
