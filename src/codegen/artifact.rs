use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The four cooperating layers the generators emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Page,
    Task,
    Role,
    Test,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Page => "page",
            ComponentKind::Task => "task",
            ComponentKind::Role => "role",
            ComponentKind::Test => "test",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generated source text plus where it belongs. Never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub component_kind: ComponentKind,
    pub logical_name: String,
    pub file_path: String,
    #[serde(rename = "code")]
    pub source_text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl GeneratedArtifact {
    pub fn new(
        component_kind: ComponentKind,
        logical_name: impl Into<String>,
        file_path: impl Into<String>,
        source_text: String,
    ) -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert("sha1".to_string(), Value::String(text_fingerprint(&source_text)));
        Self {
            component_kind,
            logical_name: logical_name.into(),
            file_path: file_path.into(),
            source_text,
            metadata,
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.metadata.get("sha1").and_then(Value::as_str)
    }
}

/// Hex SHA-1 of the source text, for spotting unchanged regenerations.
pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
