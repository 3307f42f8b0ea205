use std::path::PathBuf;

use crate::codegen::artifact::GeneratedArtifact;
use crate::codegen::task::WorkflowStatus;
use crate::pipeline::scaffold::ScaffoldReport;

// ============================================================================
// Console reporter
// ============================================================================

/// Format a scaffold run for terminal output.
///
/// Produces output like:
/// ```text
/// === Scaffold: Shopping Cart (cart) ===
///
/// Scenarios: 2
///   - test_add_product_to_cart
///   - test_remove_product
///
/// ✓ page  CartPage      framework/pages/common/cart_page.py (6 elements)
/// ✗ task  CartTasks     framework/tasks/cart_tasks.py (PLACEHOLDER)
/// ✓ role  RegisteredUser framework/roles/registered_user.py
/// ✓ test  test_add_product_to_cart tests/cart/test_add_product_to_cart.py
///
/// === 4 artifacts, 0 written ===
/// ```
pub fn format_scaffold_report(report: &ScaffoldReport, written: &[PathBuf]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "=== Scaffold: {} ({}) ===\n\n",
        report.story_title, report.workflow
    ));

    out.push_str(&format!("Scenarios: {}\n", report.scenarios.len()));
    for scenario in &report.scenarios {
        out.push_str(&format!("  - {}\n", scenario.name));
    }
    out.push('\n');

    if let Some(page) = &report.page {
        out.push_str(&artifact_line(
            true,
            page,
            &format!(" ({} elements)", report.elements_discovered),
        ));
    }

    let complete = report.task.status == WorkflowStatus::Complete;
    out.push_str(&artifact_line(
        complete,
        &report.task.artifact,
        &format!(" ({})", report.task.status.as_str()),
    ));

    let role_suffix = if report.role.ignored_capabilities.is_empty() {
        String::new()
    } else {
        format!(" (ignored: {})", report.role.ignored_capabilities.join(", "))
    };
    out.push_str(&artifact_line(true, &report.role.artifact, &role_suffix));

    for test in &report.tests {
        let mapped = test
            .metadata
            .get("mapping_rule")
            .and_then(|v| v.as_str())
            .is_some_and(|rule| rule != "fallback" && rule != "placeholder");
        out.push_str(&artifact_line(mapped, test, ""));
    }

    out.push_str(&format!(
        "\n=== {} artifacts, {} written ===\n",
        report.artifacts().len(),
        written.len()
    ));

    out
}

fn artifact_line(ok: bool, artifact: &GeneratedArtifact, suffix: &str) -> String {
    let marker = if ok { "\u{2713}" } else { "\u{2717}" };
    format!(
        "{} {:<4}  {} {}{}\n",
        marker, artifact.component_kind, artifact.logical_name, artifact.file_path, suffix
    )
}
