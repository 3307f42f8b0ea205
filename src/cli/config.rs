use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::session::DEFAULT_SCRIPT;
use crate::codegen::test_template::DEFAULT_ROLE;
use crate::error::ScaffoldError;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "scenario-scaffold",
    version,
    about = "Scaffold page objects, tasks, roles and pytest tests from user stories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: scenario-scaffold.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append trace events (JSONL) to this file
    #[arg(long, global = true)]
    pub trace: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a user story into test scenarios
    Story {
        /// User story text file
        #[arg(long)]
        file: String,

        /// Workflow: auth, catalog, cart, checkout
        #[arg(long)]
        workflow: String,
    },

    /// Discover interactive elements on a live page
    Discover {
        #[arg(long)]
        url: String,

        /// Run the browser with a visible window
        #[arg(long)]
        headed: bool,
    },

    /// Generate a page object from a JSON list of elements
    Page {
        /// Page class name (e.g. LoginPage)
        #[arg(long)]
        name: String,

        /// JSON file holding the elements array (discover output works as-is)
        #[arg(long)]
        elements: String,

        #[arg(long)]
        workflow: Option<String>,
    },

    /// Generate a task class
    Task {
        /// Task class name (e.g. AuthTasks)
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// JSON file holding page object descriptors
        #[arg(long)]
        page_objects: Option<String>,
    },

    /// Generate a role class
    Role {
        /// Role class name (e.g. RegisteredUser)
        #[arg(long)]
        name: String,

        /// Capability tag, repeatable (e.g. can_login)
        #[arg(long = "capability")]
        capabilities: Vec<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },

    /// Generate a pytest test function
    Test {
        /// Test function name; `test_` is prefixed when missing
        #[arg(long)]
        name: String,

        #[arg(long)]
        workflow: String,

        /// Role class the test acts as (default from config)
        #[arg(long)]
        role: Option<String>,

        /// JSON file holding a {given, when, then} scenario
        #[arg(long)]
        scenario: Option<String>,
    },

    /// Call any registered tool with JSON arguments
    Call {
        #[arg(long)]
        tool: String,

        /// JSON object of tool arguments
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// List registered tools
    Tools,

    /// Run the whole chain: story -> page -> task -> role -> tests
    Scaffold {
        /// User story text file
        #[arg(long)]
        story: String,

        #[arg(long)]
        workflow: String,

        /// Page to inspect for the page object
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        page_name: Option<String>,

        #[arg(long)]
        task_name: Option<String>,

        #[arg(long)]
        role: Option<String>,

        /// Root directory artifacts are written under
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Persist artifacts instead of only reporting them
        #[arg(long)]
        write: bool,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `scenario-scaffold.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_role")]
    pub default_role: String,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub overwrite: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            default_role: default_role(),
            output_dir: default_output_dir(),
            overwrite: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_script")]
    pub script: String,

    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            headless: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TraceConfig {
    pub path: Option<String>,
}

// Serde default helpers
fn default_role() -> String { DEFAULT_ROLE.to_string() }
fn default_output_dir() -> String { ".".to_string() }
fn default_script() -> String { DEFAULT_SCRIPT.to_string() }
fn default_true() -> bool { true }

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_FILE: &str = "scenario-scaffold.yaml";

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn parse_config(content: &str) -> Result<AppConfig, ScaffoldError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config '{}': {}", config_path, e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolution (CLI > config > default)
// ============================================================================

impl AppConfig {
    pub fn role<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        cli.filter(|r| !r.is_empty())
            .unwrap_or(self.generate.default_role.as_str())
    }

    pub fn output_dir<'a>(&'a self, cli: Option<&'a str>) -> &'a str {
        cli.unwrap_or(self.generate.output_dir.as_str())
    }

    pub fn trace_path<'a>(&'a self, cli: Option<&'a str>) -> Option<&'a str> {
        cli.or(self.trace.path.as_deref())
    }

    /// `--headed` forces a visible window; otherwise the config decides.
    pub fn headless(&self, headed_flag: bool) -> bool {
        !headed_flag && self.browser.headless
    }
}
