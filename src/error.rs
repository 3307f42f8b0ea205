use thiserror::Error;

/// Errors raised by the scaffolding pipeline and its browser collaborator.
///
/// Synthesizers never fail; these come from input validation, the page
/// inspection round trip, and (de)serialization at the edges.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// A required input field was absent or empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// An input field was present but unusable
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Node.js subprocess failed to spawn
    #[error("failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the browser process failed
    #[error("browser session I/O: {0}")]
    SessionIO(String),

    /// Browser process answered, but reported a failure
    #[error("browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    /// Element went stale or detached while its attributes were read
    #[error("stale element: {0}")]
    StaleElement(String),

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Story text parsed, but no usable Given/When/Then block was found
    #[error("No scenarios found in user story. Please include Given-When-Then scenarios.")]
    NoScenarios,

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// Refused to clobber an existing file while persisting artifacts
    #[error("{0} already exists (enable overwrite to replace it)")]
    AlreadyExists(String),
}

impl ScaffoldError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ScaffoldError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short remediation text surfaced next to the error at the tool boundary.
    pub fn hint(&self) -> Option<String> {
        match self {
            ScaffoldError::NoScenarios => {
                Some("Format: Given <context> When <action> Then <expected outcome>".to_string())
            }
            ScaffoldError::MissingField("workflow") | ScaffoldError::InvalidInput { field: "workflow", .. } => {
                Some("workflow must be one of: auth, catalog, cart, checkout".to_string())
            }
            ScaffoldError::MissingField("elements") => {
                Some("use discover_page_elements to discover elements first".to_string())
            }
            ScaffoldError::SubprocessSpawn { .. } => {
                Some("install Node.js and run `npm install` in the inspector script directory".to_string())
            }
            ScaffoldError::AlreadyExists(_) => {
                Some("set generate.overwrite: true in the config file".to_string())
            }
            _ => None,
        }
    }

    /// Render the error followed by its `source()` chain, one cause per line.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            out.push_str(&format!("\ncaused by: {}", err));
            cause = err.source();
        }
        out
    }
}
