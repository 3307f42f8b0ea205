use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::discovery::discoverer::discover_url;
use crate::discovery::element_model::DiscoveredElement;
use crate::discovery::inspector::{ElementHandle, ElementInspector, PageHandle};
use crate::error::ScaffoldError;

pub const DEFAULT_SCRIPT: &str = "node/element-inspector/browser_server.js";

/// Request sent to the inspector script over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate { cmd: &'static str, url: String },
    QueryElements { cmd: &'static str, selector: String },
    Quit { cmd: &'static str },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn query_elements(selector: &str) -> Self {
        BrowserRequest::QueryElements {
            cmd: "query_elements",
            selector: selector.to_string(),
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from the inspector script over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ready: Option<bool>,
}

// ============================================================================
// Node snapshots
// ============================================================================

/// Attributes of one DOM node, captured in a single round trip.
///
/// The script sets `stale` when the node detached while it was being read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub stale: Option<String>,
}

impl NodeSnapshot {
    fn live(&self) -> Result<&Self, ScaffoldError> {
        match &self.stale {
            Some(reason) => Err(ScaffoldError::StaleElement(reason.clone())),
            None => Ok(self),
        }
    }
}

impl ElementHandle for NodeSnapshot {
    fn is_displayed(&self) -> Result<bool, ScaffoldError> {
        Ok(self.live()?.visible)
    }

    fn tag_name(&self) -> Result<String, ScaffoldError> {
        Ok(self.live()?.tag.clone())
    }

    fn text(&self) -> Result<String, ScaffoldError> {
        Ok(self.live()?.text.clone())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, ScaffoldError> {
        Ok(self.live()?.attributes.get(name).cloned())
    }
}

// ============================================================================
// Session
// ============================================================================

/// A persistent browser session backed by a Node.js inspector script.
///
/// The script keeps a Chromium page open; commands are NDJSON over stdin,
/// responses NDJSON over stdout.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    current_url: Option<String>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn the inspector script and wait for its ready signal.
    pub fn launch(script: &str, headless: bool) -> Result<Self, ScaffoldError> {
        let mut command = Command::new("node");
        command.arg(script);
        if !headless {
            command.arg("--headed");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ScaffoldError::SubprocessSpawn {
                script: script.to_string(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ScaffoldError::SessionIO(format!("failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ScaffoldError::SessionIO(format!("failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| ScaffoldError::SessionIO(format!("failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| ScaffoldError::JsonParse {
                context: "inspector ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(ScaffoldError::SessionProtocol {
                command: "launch".into(),
                error: "did not receive ready signal from inspector".into(),
            });
        }

        tracing::debug!("browser session ready ({})", script);

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            current_url: None,
            closed: false,
        })
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, ScaffoldError> {
        let json = serde_json::to_string(request).map_err(|e| ScaffoldError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| ScaffoldError::SessionIO(format!("failed to write to inspector: {}", e)))?;

        self.stdin
            .flush()
            .map_err(|e| ScaffoldError::SessionIO(format!("failed to flush inspector stdin: {}", e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| ScaffoldError::SessionIO(format!("failed to read from inspector: {}", e)))?;

        if line.trim().is_empty() {
            return Err(ScaffoldError::SessionIO(
                "empty response from inspector (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| ScaffoldError::JsonParse {
            context: "inspector response".into(),
            source: e,
        })
    }

    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, ScaffoldError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(ScaffoldError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "unknown error".into()),
            });
        }
        Ok(response)
    }

    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    pub fn quit(&mut self) -> Result<(), ScaffoldError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Best effort; the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageHandle for BrowserSession {
    type Element = NodeSnapshot;

    fn navigate(&mut self, url: &str) -> Result<(), ScaffoldError> {
        self.send_ok(&BrowserRequest::navigate(url), "navigate")?;
        self.current_url = Some(url.to_string());
        Ok(())
    }

    fn find_elements(&mut self, css_selector: &str) -> Result<Vec<NodeSnapshot>, ScaffoldError> {
        let response = self.send_ok(&BrowserRequest::query_elements(css_selector), "query_elements")?;
        let data = response.data.unwrap_or(Value::Array(Vec::new()));
        serde_json::from_value(data).map_err(|e| ScaffoldError::JsonParse {
            context: format!("query_elements '{}'", css_selector),
            source: e,
        })
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}

/// Inspector that launches a fresh browser per URL and tears it down after.
#[derive(Debug, Clone)]
pub struct BrowserInspector {
    pub script: String,
    pub headless: bool,
}

impl BrowserInspector {
    pub fn new(script: impl Into<String>, headless: bool) -> Self {
        Self {
            script: script.into(),
            headless,
        }
    }
}

impl Default for BrowserInspector {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT, true)
    }
}

impl ElementInspector for BrowserInspector {
    fn inspect(&mut self, url: &str) -> Result<Vec<DiscoveredElement>, ScaffoldError> {
        let mut session = BrowserSession::launch(&self.script, self.headless)?;
        let elements = discover_url(&mut session, url);
        session.quit()?;
        elements
    }
}
