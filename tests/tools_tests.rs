mod common;

use serde_json::{Value, json};

use scenario_scaffold::discovery::discoverer::PageInspector;
use scenario_scaffold::discovery::element_model::DiscoveredElement;
use scenario_scaffold::discovery::inspector::ElementInspector;
use scenario_scaffold::error::ScaffoldError;
use scenario_scaffold::tools::envelope::ToolResponse;
use scenario_scaffold::tools::registry::{TOOLS, ToolRegistry, tool_names};
use scenario_scaffold::trace::logger::MemoryLogger;
use scenario_scaffold::trace::trace::Phase;

use common::{LOGIN_STORY, UnreachableInspector, login_page};

fn registry() -> ToolRegistry {
    ToolRegistry::new(Box::new(UnreachableInspector))
}

fn call(name: &str, args: Value) -> Value {
    registry().call(name, &args, &MemoryLogger::new()).to_value()
}

// ============================================================================
// Envelope
// ============================================================================

#[test]
fn success_envelope_flattens_payload() {
    let mut payload = serde_json::Map::new();
    payload.insert("file_path".into(), json!("framework/roles/x.py"));
    let value = ToolResponse::success(payload).to_value();
    assert_eq!(value, json!({ "status": "success", "file_path": "framework/roles/x.py" }));
}

#[test]
fn error_envelope_omits_absent_fields() {
    let value = ToolResponse::error("boom").to_value();
    assert_eq!(value, json!({ "status": "error", "error": "boom" }));

    let value = ToolResponse::error("boom").with_hint("try again").to_value();
    assert_eq!(value["hint"], json!("try again"));
    assert!(value.get("traceback").is_none());
}

#[test]
fn catalogue_lists_six_tools() {
    assert_eq!(TOOLS.len(), 6);
    assert_eq!(
        tool_names(),
        vec![
            "generate_tests_from_user_story",
            "discover_page_elements",
            "generate_page_object",
            "generate_task",
            "generate_role",
            "generate_test_template",
        ]
    );
}

// ============================================================================
// generate_tests_from_user_story
// ============================================================================

#[test]
fn story_tool_returns_named_scenarios() {
    let value = call(
        "generate_tests_from_user_story",
        json!({ "user_story": LOGIN_STORY, "workflow": "auth" }),
    );

    assert_eq!(value["status"], "success");
    assert_eq!(value["user_story_title"], "User Login");
    assert_eq!(value["workflow"], "auth");
    assert_eq!(value["scenarios_count"], 2);

    let first = &value["scenarios"][0];
    assert_eq!(first["name"], "test_successful_login");
    assert_eq!(first["description"], "Verify user enters valid email and password");
    assert_eq!(first["given"], "user is on login page");
    assert_eq!(first["workflow"], "auth");
    assert!(value["next_step"].as_str().is_some_and(|s| s.contains("generate_test_template")));
}

#[test]
fn story_without_scenarios_is_an_error_with_format_hint() {
    let value = call(
        "generate_tests_from_user_story",
        json!({ "user_story": "Checkout page redesign", "workflow": "checkout" }),
    );
    assert_eq!(value["status"], "error");
    assert_eq!(
        value["error"],
        "No scenarios found in user story. Please include Given-When-Then scenarios."
    );
    assert_eq!(
        value["hint"],
        "Format: Given <context> When <action> Then <expected outcome>"
    );
}

#[test]
fn incomplete_scenarios_are_dropped() {
    let value = call(
        "generate_tests_from_user_story",
        json!({ "user_story": "Given a\nWhen b\n", "workflow": "cart" }),
    );
    assert_eq!(value["status"], "success");
    assert_eq!(value["scenarios_count"], 0, "a block without Then is not a test");
}

#[test]
fn missing_and_bad_workflow_are_rejected() {
    let missing = call("generate_tests_from_user_story", json!({ "user_story": LOGIN_STORY }));
    assert_eq!(missing["status"], "error");
    assert_eq!(missing["error"], "workflow is required");
    assert_eq!(missing["hint"], "workflow must be one of: auth, catalog, cart, checkout");

    let bad = call(
        "generate_tests_from_user_story",
        json!({ "user_story": LOGIN_STORY, "workflow": "payments" }),
    );
    assert_eq!(bad["status"], "error");
    assert_eq!(bad["hint"], "workflow must be one of: auth, catalog, cart, checkout");
}

#[test]
fn missing_story_is_rejected() {
    let value = call("generate_tests_from_user_story", json!({ "workflow": "auth" }));
    assert_eq!(value["error"], "user_story is required");
}

// ============================================================================
// discover_page_elements
// ============================================================================

#[test]
fn discover_reports_counts_by_type() {
    let mut registry = ToolRegistry::new(Box::new(PageInspector::new(login_page())));
    let value = registry
        .call(
            "discover_page_elements",
            &json!({ "url": "http://shop.test/index.php?controller=authentication" }),
            &MemoryLogger::new(),
        )
        .to_value();

    assert_eq!(value["status"], "success");
    assert_eq!(value["total_elements"], 4);
    assert_eq!(value["elements_by_type"], json!({ "buttons": 1, "links": 1, "inputs": 2 }));
    assert_eq!(value["elements"][0]["suggested_name"], "SUBMITLOGIN");
    assert_eq!(value["elements"][0]["locator_candidates"]["id"], "#SubmitLogin");
}

#[test]
fn discover_rejects_non_http_url() {
    let value = call("discover_page_elements", json!({ "url": "file:///etc/passwd" }));
    assert_eq!(value["status"], "error");
    assert!(value["error"].as_str().is_some_and(|e| e.contains("url")));
}

#[test]
fn inspector_failure_becomes_error_envelope() {
    let value = call("discover_page_elements", json!({ "url": "http://shop.test" }));
    assert_eq!(value["status"], "error");
    assert!(value["error"].as_str().is_some_and(|e| e.contains("no browser in tests")));
}

// ============================================================================
// generate_page_object
// ============================================================================

#[test]
fn page_object_from_flat_locators() {
    let value = call(
        "generate_page_object",
        json!({
            "page_name": "LoginPage",
            "elements": [
                { "suggested_name": "EMAIL", "element_type": "inputs", "locator_id": "#email" },
                { "suggested_name": "PASSWD", "element_type": "inputs", "locator_css": "input[name='passwd']" },
                { "suggested_name": "SUBMITLOGIN", "element_type": "buttons", "locator_xpath": "//button[@id='SubmitLogin']" },
                { "suggested_name": "NOLOCATOR", "element_type": "links" }
            ]
        }),
    );

    assert_eq!(value["status"], "success");
    assert_eq!(value["file_path"], "framework/pages/common/login_page.py");
    assert_eq!(value["elements_count"], 3, "element without a locator is skipped");
    assert_eq!(value["methods"], json!(["enter_email", "enter_passwd", "click_submitlogin"]));

    let code = value["code"].as_str().unwrap_or_default();
    assert!(code.contains(r#"SUBMITLOGIN = (By.XPATH, "//button[@id='SubmitLogin']")"#));
    assert!(value["sha1"].as_str().is_some_and(|s| s.len() == 40));
}

#[test]
fn page_object_accepts_discovery_output_and_name_locator_pairs() {
    let value = call(
        "generate_page_object",
        json!({
            "page_name": "HomePage",
            "elements": [
                {
                    "suggested_name": "SEARCH",
                    "element_type": "inputs",
                    "locator_candidates": { "css": "input[name='q']", "xpath": "//input[@name='q']" }
                },
                { "name": "LOGO", "locator": "img.logo" },
                { "name": "IGNORED" }
            ]
        }),
    );
    assert_eq!(value["elements_count"], 2);
    let code = value["code"].as_str().unwrap_or_default();
    assert!(code.contains(r#"SEARCH = (By.CSS_SELECTOR, "input[name='q']")"#));
    assert!(code.contains(r#"LOGO = (By.CSS_SELECTOR, "img.logo")"#));
}

#[test]
fn page_object_requires_elements() {
    let value = call("generate_page_object", json!({ "page_name": "LoginPage", "elements": [] }));
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"], "elements is required");
    assert_eq!(value["hint"], "use discover_page_elements to discover elements first");
}

#[test]
fn page_object_rejects_unknown_workflow() {
    let value = call(
        "generate_page_object",
        json!({ "page_name": "LoginPage", "workflow": "payments", "elements": [{ "name": "A", "locator": "#a" }] }),
    );
    assert_eq!(value["status"], "error");
}

// ============================================================================
// generate_task / generate_role / generate_test_template
// ============================================================================

#[test]
fn task_tool_scrapes_methods_from_code() {
    let page_code = "class LoginPage:\n    def enter_email(self, text):\n        pass\n    def enter_passwd(self, text):\n        pass\n    def click_submitlogin(self):\n        pass\n";
    let value = call(
        "generate_task",
        json!({
            "task_name": "AuthTasks",
            "page_objects": [
                { "name": "LoginPage", "file_path": "framework/pages/common/login_page.py", "code": page_code },
                { "name": "", "file_path": "framework/pages/common/ghost.py" }
            ]
        }),
    );

    assert_eq!(value["status"], "success");
    assert_eq!(value["page_objects_used"], 1, "nameless page object is dropped");
    assert_eq!(value["workflows_generated"], "COMPLETE");
    assert_eq!(value["methods_found"], json!(["enter_email", "enter_passwd", "click_submitlogin"]));
    assert!(!value["code"].as_str().unwrap_or_default().contains("NotImplementedError"));
}

#[test]
fn task_tool_without_page_objects_is_placeholder() {
    let value = call("generate_task", json!({ "task_name": "CartTasks" }));
    assert_eq!(value["workflows_generated"], "PLACEHOLDER");
    assert_eq!(value["file_path"], "framework/tasks/cart_tasks.py");
}

#[test]
fn role_tool_reports_ignored_capabilities() {
    let value = call(
        "generate_role",
        json!({
            "role_name": "RegisteredUser",
            "capabilities": ["can_login", "can_fly"],
            "credentials": { "email": "test@example.com", "password": "Test123!" }
        }),
    );
    assert_eq!(value["status"], "success");
    assert_eq!(value["file_path"], "framework/roles/registered_user.py");
    assert_eq!(value["ignored_capabilities"], json!(["can_fly"]));
    assert!(value["code"].as_str().unwrap_or_default().contains("DEFAULT_USER_DATA"));
}

#[test]
fn test_template_tool_uses_scenario_and_default_role() {
    let value = call(
        "generate_test_template",
        json!({
            "test_name": "login_with_bad_password",
            "workflow": "auth",
            "scenario": {
                "given": "user has wrong password",
                "when": "user enters email and password",
                "then": "error is shown",
                "description": "Rejects a wrong password"
            }
        }),
    );

    assert_eq!(value["status"], "success");
    assert_eq!(value["test_name"], "test_login_with_bad_password");
    assert_eq!(value["role"], "RegisteredUser");
    assert_eq!(value["file_path"], "tests/auth/test_login_with_bad_password.py");
    assert_eq!(
        value["architecture"],
        "Test -> RegisteredUser -> Task -> Page -> WebInterface"
    );
    let code = value["code"].as_str().unwrap_or_default();
    assert!(code.contains("assert result is False"));
    assert!(code.contains("Rejects a wrong password"));
}

#[test]
fn registry_default_role_is_configurable() {
    let mut registry = ToolRegistry::new(Box::new(UnreachableInspector)).with_default_role("Shopper");
    let response = registry.call(
        "generate_test_template",
        &json!({ "test_name": "browse", "workflow": "catalog" }),
        &MemoryLogger::new(),
    );
    assert_eq!(response.get("role"), Some(&json!("Shopper")));
}

// ============================================================================
// Dispatch & logging
// ============================================================================

#[test]
fn unknown_tool_lists_available_tools() {
    let value = call("delete_everything", json!({}));
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"], "unknown tool 'delete_everything'");
    assert!(value["hint"].as_str().is_some_and(|h| h.contains("generate_role")));
}

#[test]
fn malformed_arguments_are_reported() {
    let value = call("generate_role", json!({ "role_name": 42 }));
    assert_eq!(value["status"], "error");
    assert!(value["error"].as_str().is_some_and(|e| e.contains("generate_role arguments")));
}

#[test]
fn every_call_is_bracketed_by_trace_events() {
    let logger = MemoryLogger::new();
    let mut registry = registry();

    registry.call("generate_role", &json!({ "role_name": "Guest" }), &logger);
    registry.call("generate_role", &json!({}), &logger);

    let events = logger.events();
    let phases: Vec<Phase> = events.iter().map(|e| e.phase).collect();
    assert_eq!(phases, vec![Phase::Start, Phase::End, Phase::Start, Phase::Failed]);
    assert!(events.iter().all(|e| e.category == "tool" && e.operation == "generate_role"));
    assert_eq!(events[3].detail.as_deref(), Some("role_name is required"));
    assert!(events[1].duration_ms.is_some());
}

struct PanickingInspector;

impl ElementInspector for PanickingInspector {
    fn inspect(&mut self, url: &str) -> Result<Vec<DiscoveredElement>, ScaffoldError> {
        panic!("inspector crashed on {}", url);
    }
}

#[test]
fn handler_panic_becomes_error_with_traceback() {
    let logger = MemoryLogger::new();
    let mut registry = ToolRegistry::new(Box::new(PanickingInspector));

    let value = registry
        .call("discover_page_elements", &json!({ "url": "http://shop.test" }), &logger)
        .to_value();
    assert_eq!(value["status"], "error");
    assert_eq!(
        value["error"],
        "discover_page_elements failed: inspector crashed on http://shop.test"
    );
    let traceback = value["traceback"].as_str().unwrap_or_default();
    assert!(!traceback.is_empty());
    assert!(traceback.contains("inspector crashed on http://shop.test"));
    assert_eq!(logger.events().last().map(|e| e.phase), Some(Phase::Failed));

    // the registry keeps serving after a caught panic
    let value = registry
        .call("generate_role", &json!({ "role_name": "Guest" }), &logger)
        .to_value();
    assert_eq!(value["status"], "success");
}
