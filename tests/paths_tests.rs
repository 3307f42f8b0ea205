use scenario_scaffold::codegen::artifact::{ComponentKind, GeneratedArtifact, text_fingerprint};
use scenario_scaffold::codegen::paths::{import_path_from_file, module_path, resolve, to_snake_case};
use scenario_scaffold::codegen::python::{capitalize, string_literal, title_case};
use scenario_scaffold::story::story_model::Workflow;

#[test]
fn snake_case_conversion() {
    assert_eq!(to_snake_case("LoginPage"), "login_page");
    assert_eq!(to_snake_case("AuthTasks"), "auth_tasks");
    assert_eq!(to_snake_case("already_snake"), "already_snake");
    assert_eq!(to_snake_case("HTMLPage"), "h_t_m_l_page");
}

#[test]
fn canonical_paths_per_kind() {
    assert_eq!(
        resolve(ComponentKind::Page, "LoginPage", Some(Workflow::Auth)),
        "framework/pages/common/login_page.py",
        "pages ignore the workflow"
    );
    assert_eq!(resolve(ComponentKind::Task, "CartTasks", None), "framework/tasks/cart_tasks.py");
    assert_eq!(
        resolve(ComponentKind::Role, "RegisteredUser", None),
        "framework/roles/registered_user.py"
    );
    assert_eq!(
        resolve(ComponentKind::Test, "test_add_item", Some(Workflow::Cart)),
        "tests/cart/test_add_item.py"
    );
    assert_eq!(resolve(ComponentKind::Test, "test_smoke", None), "tests/test_smoke.py");
}

#[test]
fn import_paths() {
    assert_eq!(
        import_path_from_file("framework/pages/common/login_page.py"),
        "framework.pages.common.login_page"
    );
    assert_eq!(import_path_from_file("pages\\home.py"), "pages.home");
    assert_eq!(module_path(ComponentKind::Role, "RegisteredUser"), "roles.registered_user");
    assert_eq!(module_path(ComponentKind::Task, "AuthTasks"), "tasks.auth_tasks");
}

#[test]
fn python_text_helpers() {
    assert_eq!(string_literal(r#"a"b\c"#), r#""a\"b\\c""#);
    assert_eq!(string_literal("line\nbreak"), r#""line\nbreak""#);
    assert_eq!(capitalize("checkout"), "Checkout");
    assert_eq!(capitalize(""), "");
    assert_eq!(title_case("add item to cart"), "Add Item To Cart");
}

#[test]
fn artifact_carries_sha1_fingerprint() {
    let artifact = GeneratedArtifact::new(ComponentKind::Role, "X", "framework/roles/x.py", "abc".to_string());
    assert_eq!(
        artifact.fingerprint(),
        Some("a9993e364706816aba3e25717850c26c9cd0d89d")
    );
    assert_eq!(text_fingerprint("abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
}

#[test]
fn artifact_serializes_source_as_code() {
    let artifact = GeneratedArtifact::new(ComponentKind::Test, "test_x", "tests/test_x.py", "pass".to_string())
        .with_meta("workflow", "cart");
    let value = serde_json::to_value(&artifact).expect("serialize");
    assert_eq!(value["component_kind"], "test");
    assert_eq!(value["code"], "pass");
    assert_eq!(value["metadata"]["workflow"], "cart");
}
