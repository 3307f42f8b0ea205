use crate::codegen::artifact::{ComponentKind, GeneratedArtifact};
use crate::codegen::paths::{module_path, resolve};
use crate::codegen::python::{block, capitalize, title_case};
use crate::codegen::scenario_mapper::{TestLogic, map_scenario, matching_rule};
use crate::story::story_model::{Scenario, Workflow};

pub const DEFAULT_ROLE: &str = "RegisteredUser";

pub fn architecture(role: &str) -> String {
    format!("Test -> {} -> Task -> Page -> WebInterface", role)
}

/// `add_to_cart` -> `test_add_to_cart`; already-prefixed names are kept.
pub fn ensure_test_prefix(test_name: &str) -> String {
    if test_name.starts_with("test_") {
        test_name.to_string()
    } else {
        format!("test_{}", test_name)
    }
}

/// Fragments used when no scenario is supplied: the test exists before the
/// infrastructure it needs.
fn placeholder_logic(workflow: Workflow) -> TestLogic {
    TestLogic {
        test_data: format!("# TODO: Add test data for {} workflow", workflow),
        action: block(&[
            &format!("# TODO: Implement {} action", workflow),
            &format!("# result = {}_tasks.some_action()", workflow),
        ]),
        assertion: block(&["# TODO: Add assertions", "# assert result is True"]),
    }
}

fn docstring(summary: &str, scenario: Option<&Scenario>, role: &str) -> String {
    let mut doc = format!("\"\"\"\n    {}\n\n", summary);
    if let Some(s) = scenario.filter(|s| s.has_content()) {
        doc.push_str("    Scenario:\n");
        if !s.given.is_empty() {
            doc.push_str(&format!("        Given: {}\n", s.given));
        }
        if !s.when.is_empty() {
            doc.push_str(&format!("        When: {}\n", s.when));
        }
        if !s.then.is_empty() {
            doc.push_str(&format!("        Then: {}\n", s.then));
        }
        doc.push('\n');
    }
    doc.push_str(&format!("    Architecture: {}\n", architecture(role)));
    doc.push_str("    \"\"\"");
    doc
}

/// Generate a pytest function for one scenario.
///
/// The test name gets a `test_` prefix if it lacks one. With a scenario the
/// Arrange/Act/Assert bodies come from the scenario mapper; without one they
/// are TODO placeholders.
pub fn generate_test(
    test_name: &str,
    workflow: Workflow,
    role: Option<&str>,
    scenario: Option<&Scenario>,
    description: Option<&str>,
) -> GeneratedArtifact {
    let test_name = ensure_test_prefix(test_name);
    let role = role.filter(|r| !r.trim().is_empty()).unwrap_or(DEFAULT_ROLE);
    let task_class = workflow.task_class();
    let role_module = module_path(ComponentKind::Role, role);

    let logic = match scenario {
        Some(s) => map_scenario(workflow, s),
        None => placeholder_logic(workflow),
    };
    let rule = match scenario {
        Some(s) => matching_rule(workflow, s).map_or("fallback", |r| r.name),
        None => "placeholder",
    };

    let summary = description.filter(|d| !d.is_empty()).unwrap_or(test_name.as_str());
    let doc = docstring(summary, scenario, role);
    let heading = title_case(&test_name.replace("test_", "").replace('_', " "));
    let workflow_title = capitalize(workflow.as_str());
    let TestLogic {
        test_data,
        action,
        assertion,
    } = logic;

    let code = format!(
        r#""""
{workflow_title} Tests - {heading}.

Test generated from user story scenario.
"""

import pytest
from pathlib import Path
import sys

# Add framework to path
FRAMEWORK_PATH = str(Path(__file__).parent.parent.parent / "framework")
sys.path.insert(0, FRAMEWORK_PATH)

from tasks.{workflow}_tasks import {task_class}
from {role_module} import {role}
from resources.utilities import autologger


@pytest.mark.{workflow}
@autologger.automation_logger("Test")
def {test_name}(web_interface, config):
    {doc}
    # Arrange
    base_url = config["url"]
    {workflow}_tasks = {task_class}(web_interface, base_url)

    {test_data}

    # Act
    {action}

    # Assert
    {assertion}
"#
    );

    GeneratedArtifact::new(
        ComponentKind::Test,
        test_name.clone(),
        resolve(ComponentKind::Test, &test_name, Some(workflow)),
        code,
    )
    .with_meta("workflow", workflow.as_str())
    .with_meta("role", role)
    .with_meta("architecture", architecture(role))
    .with_meta("mapping_rule", rule)
}
