use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use serde::Serialize;
use serde_json::Value;

use crate::codegen::test_template::DEFAULT_ROLE;
use crate::discovery::inspector::ElementInspector;
use crate::error::ScaffoldError;
use crate::tools::envelope::ToolResponse;
use crate::tools::handlers::{self, Payload};
use crate::trace::logger::Logger;
use crate::trace::timed::timed;

// ============================================================================
// Tool catalogue
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub required: &'static [&'static str],
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "generate_tests_from_user_story",
        description: "Parse a Given/When/Then user story into test scenarios",
        required: &["user_story", "workflow"],
    },
    ToolDescriptor {
        name: "discover_page_elements",
        description: "Inspect a live page and list its visible interactive elements",
        required: &["url"],
    },
    ToolDescriptor {
        name: "generate_page_object",
        description: "Generate a page object class from discovered elements",
        required: &["page_name", "elements"],
    },
    ToolDescriptor {
        name: "generate_task",
        description: "Generate a task class orchestrating page object methods",
        required: &["task_name"],
    },
    ToolDescriptor {
        name: "generate_role",
        description: "Generate a role class composing task modules",
        required: &["role_name"],
    },
    ToolDescriptor {
        name: "generate_test_template",
        description: "Generate a pytest function for a scenario",
        required: &["test_name", "workflow"],
    },
];

pub fn tool_names() -> Vec<&'static str> {
    TOOLS.iter().map(|t| t.name).collect()
}

// ============================================================================
// Panic capture
// ============================================================================

thread_local! {
    static LAST_PANIC_BACKTRACE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Chain a hook that records the panicking thread's backtrace so the tool
/// boundary can report it after `catch_unwind`.
fn install_backtrace_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let trace = Backtrace::force_capture().to_string();
            LAST_PANIC_BACKTRACE.with(|slot| *slot.borrow_mut() = Some(trace));
            previous(info);
        }));
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Dispatches tool calls by name and converts every outcome, panics
/// included, into a `ToolResponse`.
pub struct ToolRegistry {
    inspector: Box<dyn ElementInspector>,
    default_role: String,
}

impl ToolRegistry {
    pub fn new(inspector: Box<dyn ElementInspector>) -> Self {
        Self {
            inspector,
            default_role: DEFAULT_ROLE.to_string(),
        }
    }

    pub fn with_default_role(mut self, role: impl Into<String>) -> Self {
        self.default_role = role.into();
        self
    }

    pub fn descriptors(&self) -> &'static [ToolDescriptor] {
        TOOLS
    }

    pub fn inspector_mut(&mut self) -> &mut dyn ElementInspector {
        self.inspector.as_mut()
    }

    pub fn call(&mut self, name: &str, args: &Value, logger: &dyn Logger) -> ToolResponse {
        timed(logger, "tool", name, || self.call_guarded(name, args))
    }

    fn call_guarded(&mut self, name: &str, args: &Value) -> ToolResponse {
        install_backtrace_hook();

        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(name, args))) {
            Ok(Ok(payload)) => ToolResponse::success(payload),
            Ok(Err(ScaffoldError::UnknownTool(tool))) => {
                ToolResponse::error(format!("unknown tool '{}'", tool))
                    .with_hint(format!("available tools: {}", tool_names().join(", ")))
            }
            Ok(Err(err)) => {
                tracing::debug!(tool = name, error = %err.chain(), "tool call rejected");
                ToolResponse::from_error(&err)
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                let trace = LAST_PANIC_BACKTRACE
                    .with(|slot| slot.borrow_mut().take())
                    .unwrap_or_else(|| Backtrace::force_capture().to_string());
                tracing::error!(tool = name, panic = %message, "tool handler panicked");
                ToolResponse::error(format!("{} failed: {}", name, message))
                    .with_traceback(format!("panicked at: {}\n{}", message, trace))
            }
        }
    }

    fn dispatch(&mut self, name: &str, args: &Value) -> Result<Payload, ScaffoldError> {
        match name {
            "generate_tests_from_user_story" => handlers::generate_tests_from_user_story(args),
            "discover_page_elements" => {
                handlers::discover_page_elements(args, self.inspector.as_mut())
            }
            "generate_page_object" => handlers::generate_page_object_tool(args),
            "generate_task" => handlers::generate_task_tool(args),
            "generate_role" => handlers::generate_role_tool(args),
            "generate_test_template" => {
                handlers::generate_test_template_tool(args, &self.default_role)
            }
            other => Err(ScaffoldError::UnknownTool(other.to_string())),
        }
    }
}
