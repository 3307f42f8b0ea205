use std::path::Path;

use serde_json::{Value, json};

use crate::browser::session::BrowserInspector;
use crate::cli::config::{AppConfig, Cli, Commands};
use crate::discovery::inspector::ElementInspector;
use crate::error::ScaffoldError;
use crate::pipeline::scaffold::{ScaffoldRequest, scaffold, write_artifacts};
use crate::report::console::format_scaffold_report;
use crate::story::story_model::Workflow;
use crate::tools::envelope::ToolResponse;
use crate::tools::registry::{TOOLS, ToolRegistry};
use crate::trace::logger::Logger;

/// What a command printed and whether the process should exit non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn envelope(response: &ToolResponse) -> Self {
        Self {
            text: response.to_json_pretty(),
            success: response.is_success(),
        }
    }
}

/// Dispatch a parsed command, inspecting pages with the configured browser.
pub fn run(cli: &Cli, config: &AppConfig, logger: &dyn Logger) -> CommandOutput {
    let headless = match &cli.command {
        Commands::Discover { headed, .. } => config.headless(*headed),
        _ => config.headless(false),
    };
    let inspector = BrowserInspector::new(config.browser.script.clone(), headless);
    run_with(cli, config, logger, Box::new(inspector))
}

/// Dispatch a parsed command against an explicit inspector.
pub fn run_with(
    cli: &Cli,
    config: &AppConfig,
    logger: &dyn Logger,
    inspector: Box<dyn ElementInspector>,
) -> CommandOutput {
    let mut registry = ToolRegistry::new(inspector).with_default_role(config.generate.default_role.clone());

    let outcome = match &cli.command {
        Commands::Story { file, workflow } => read_text(file).map(|text| {
            registry.call(
                "generate_tests_from_user_story",
                &json!({ "user_story": text, "workflow": workflow }),
                logger,
            )
        }),
        Commands::Discover { url, .. } => {
            Ok(registry.call("discover_page_elements", &json!({ "url": url }), logger))
        }
        Commands::Page {
            name,
            elements,
            workflow,
        } => read_json(elements).map(|value| {
            let elements = match value {
                Value::Object(mut map) => map.remove("elements").unwrap_or(Value::Null),
                other => other,
            };
            registry.call(
                "generate_page_object",
                &json!({ "page_name": name, "elements": elements, "workflow": workflow }),
                logger,
            )
        }),
        Commands::Task {
            name,
            description,
            page_objects,
        } => page_objects
            .as_deref()
            .map(read_json)
            .transpose()
            .map(|page_objects| {
                registry.call(
                    "generate_task",
                    &json!({
                        "task_name": name,
                        "workflow_description": description,
                        "page_objects": page_objects.unwrap_or_else(|| json!([])),
                    }),
                    logger,
                )
            }),
        Commands::Role {
            name,
            capabilities,
            email,
            password,
        } => {
            let credentials = if email.is_some() || password.is_some() {
                json!({ "email": email, "password": password })
            } else {
                Value::Null
            };
            Ok(registry.call(
                "generate_role",
                &json!({ "role_name": name, "capabilities": capabilities, "credentials": credentials }),
                logger,
            ))
        }
        Commands::Test {
            name,
            workflow,
            role,
            scenario,
        } => scenario
            .as_deref()
            .map(read_json)
            .transpose()
            .map(|scenario| {
                registry.call(
                    "generate_test_template",
                    &json!({
                        "test_name": name,
                        "workflow": workflow,
                        "role": config.role(role.as_deref()),
                        "scenario": scenario,
                    }),
                    logger,
                )
            }),
        Commands::Call { tool, args } => serde_json::from_str::<Value>(args)
            .map_err(|source| ScaffoldError::JsonParse {
                context: "--args".to_string(),
                source,
            })
            .map(|args| registry.call(tool, &args, logger)),
        Commands::Tools => {
            return CommandOutput {
                text: cmd_tools(),
                success: true,
            };
        }
        Commands::Scaffold {
            story,
            workflow,
            url,
            page_name,
            task_name,
            role,
            output_dir,
            write,
        } => {
            let options = ScaffoldOptions {
                story_file: story,
                workflow,
                url: url.as_deref(),
                page_name: page_name.as_deref(),
                task_name: task_name.as_deref(),
                role: role.as_deref(),
                output_dir: output_dir.as_deref(),
                write: *write,
            };
            return match cmd_scaffold(&options, config, logger, registry.inspector_mut()) {
                Ok(text) => CommandOutput {
                    text,
                    success: true,
                },
                Err(e) => CommandOutput::envelope(&ToolResponse::from_error(&e)),
            };
        }
    };

    match outcome {
        Ok(response) => CommandOutput::envelope(&response),
        Err(e) => CommandOutput::envelope(&ToolResponse::from_error(&e)),
    }
}

// ============================================================================
// tools subcommand
// ============================================================================

pub fn cmd_tools() -> String {
    serde_json::to_string_pretty(TOOLS).unwrap_or_default()
}

// ============================================================================
// scaffold subcommand
// ============================================================================

#[derive(Debug, Clone)]
pub struct ScaffoldOptions<'a> {
    pub story_file: &'a str,
    pub workflow: &'a str,
    pub url: Option<&'a str>,
    pub page_name: Option<&'a str>,
    pub task_name: Option<&'a str>,
    pub role: Option<&'a str>,
    pub output_dir: Option<&'a str>,
    pub write: bool,
}

/// Run the pipeline and return the console summary.
pub fn cmd_scaffold(
    options: &ScaffoldOptions<'_>,
    config: &AppConfig,
    logger: &dyn Logger,
    inspector: &mut dyn ElementInspector,
) -> Result<String, ScaffoldError> {
    let workflow: Workflow = options.workflow.parse()?;
    let story = read_text(options.story_file)?;

    let mut request = ScaffoldRequest::new(story, workflow);
    request.url = options.url.map(str::to_string);
    request.page_name = options.page_name.map(str::to_string);
    request.task_name = options.task_name.map(str::to_string);
    request.role = config.role(options.role).to_string();

    let report = scaffold(&request, Some(inspector), logger)?;

    let written = if options.write {
        let out_dir = Path::new(config.output_dir(options.output_dir));
        write_artifacts(out_dir, &report.artifacts(), config.generate.overwrite)?
    } else {
        Vec::new()
    };

    Ok(format_scaffold_report(&report, &written))
}

// ============================================================================
// Helpers
// ============================================================================

pub fn read_text(path: &str) -> Result<String, ScaffoldError> {
    std::fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))
}

pub fn read_json(path: &str) -> Result<Value, ScaffoldError> {
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|source| ScaffoldError::JsonParse {
        context: path.to_string(),
        source,
    })
}
