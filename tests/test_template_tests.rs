use scenario_scaffold::codegen::scenario_mapper::{RULES, fallback, map_scenario, matching_rule};
use scenario_scaffold::codegen::test_template::{DEFAULT_ROLE, ensure_test_prefix, generate_test};
use scenario_scaffold::story::story_model::{Scenario, Workflow};

fn scenario(given: &str, when: &str, then: &str) -> Scenario {
    Scenario {
        name: String::new(),
        given: given.to_string(),
        when: when.to_string(),
        then: then.to_string(),
    }
}

fn rule_name(workflow: Workflow, s: &Scenario) -> Option<&'static str> {
    matching_rule(workflow, s).map(|r| r.name)
}

// ============================================================================
// Scenario mapping: auth
// ============================================================================

#[test]
fn login_on_login_page_asserts_success() {
    let s = scenario(
        "user is on login page",
        "user enters valid email and password",
        "user is logged in successfully",
    );
    assert_eq!(rule_name(Workflow::Auth, &s), Some("auth.login"));

    let logic = map_scenario(Workflow::Auth, &s);
    assert!(logic.test_data.contains(r#"test_email = "test@example.com""#));
    assert_eq!(logic.action, "result = auth_tasks.login(test_email, test_password)");
    assert!(logic.assertion.contains("assert result is True"));
}

#[test]
fn invalid_credentials_assert_failure() {
    let s = scenario(
        "user has invalid credentials",
        "user enters email and password",
        "an error message is shown",
    );
    assert_eq!(rule_name(Workflow::Auth, &s), Some("auth.login.bad_credentials"));

    let logic = map_scenario(Workflow::Auth, &s);
    assert!(logic.test_data.contains("invalid@example.com"));
    assert!(logic.test_data.contains("WrongPassword123!"));
    assert!(logic.assertion.contains("assert result is False"));
}

#[test]
fn incorrect_is_not_mistaken_for_correct() {
    let s = scenario("user has incorrect password", "user tries to log in", "login is refused");
    let logic = map_scenario(Workflow::Auth, &s);
    assert!(
        logic.assertion.contains("assert result is False"),
        "'incorrect' contains 'correct' but must map to the failure branch"
    );
}

#[test]
fn valid_credentials_with_dashboard_outcome() {
    let s = scenario(
        "user is registered",
        "user signs in",
        "dashboard is displayed",
    );
    // "signs in" is not "sign in"; the dashboard outcome still marks a login
    assert_eq!(rule_name(Workflow::Auth, &s), Some("auth.login.good_credentials"));
    assert!(
        map_scenario(Workflow::Auth, &s)
            .assertion
            .contains("Login should succeed with valid credentials")
    );
}

#[test]
fn logout_and_register_rules() {
    let logout = scenario("user is logged in", "user clicks log out", "login link is shown");
    let logic = map_scenario(Workflow::Auth, &logout);
    assert_eq!(logic.action, "result = auth_tasks.logout()");
    assert!(logic.test_data.contains("auth_tasks.login(test_email, test_password)"));

    let register = scenario("", "visitor registers a new account", "welcome page is shown");
    let logic = map_scenario(Workflow::Auth, &register);
    assert!(logic.test_data.contains("fake = Faker()"));
    assert!(logic.action.starts_with("result = auth_tasks.register_new_user("));
}

// ============================================================================
// Scenario mapping: catalog / cart / checkout
// ============================================================================

#[test]
fn catalog_rules() {
    let browse = scenario("", "user browses the Women category", "products are listed");
    assert_eq!(rule_name(Workflow::Catalog, &browse), Some("catalog.browse_category"));

    let filter = scenario("", "user applies a size filter", "matching products shown");
    assert_eq!(rule_name(Workflow::Catalog, &filter), Some("catalog.filter"));

    let sort = scenario("", "user sorts by price", "cheapest first");
    assert!(
        map_scenario(Workflow::Catalog, &sort)
            .test_data
            .contains("price_low_to_high")
    );

    let sort_by_name = scenario("", "user sorts alphabetically", "a to z");
    assert_eq!(map_scenario(Workflow::Catalog, &sort_by_name).test_data, r#"sort_by = "name""#);
}

#[test]
fn browsing_without_category_does_not_fall_through_to_filter() {
    let s = scenario("", "user views filtered results", "results shown");
    assert_eq!(rule_name(Workflow::Catalog, &s), None);
}

#[test]
fn cart_rules() {
    let add = scenario("", "user adds product to cart", "cart count is 1");
    let logic = map_scenario(Workflow::Cart, &add);
    assert_eq!(logic.action, "result = cart_tasks.add_to_cart(product_name, quantity)");
    assert!(logic.assertion.contains("cart_tasks.get_cart_count() > 0"));

    let remove = scenario("", "user removes the product", "cart is empty");
    assert_eq!(rule_name(Workflow::Cart, &remove), Some("cart.remove"));

    let update = scenario("", "user updates quantity to 3", "total is recalculated");
    assert_eq!(rule_name(Workflow::Cart, &update), Some("cart.update_quantity"));
}

#[test]
fn checkout_imports_cart_tasks_locally() {
    let s = scenario("cart has items", "user proceeds to checkout", "order confirmation shown");
    let logic = map_scenario(Workflow::Checkout, &s);
    assert!(logic.test_data.contains("from tasks.cart_tasks import CartTasks"));
    assert_eq!(logic.action, "result = checkout_tasks.complete_checkout(shipping_info)");
}

#[test]
fn rules_are_scoped_to_their_workflow() {
    let s = scenario("", "user adds product to cart", "cart count is 1");
    assert_eq!(rule_name(Workflow::Auth, &s), None);
    assert_eq!(map_scenario(Workflow::Auth, &s), fallback(Workflow::Auth));
}

#[test]
fn unmatched_scenario_gets_todo_fragments() {
    let logic = map_scenario(Workflow::Cart, &scenario("", "user stares at cart", "nothing"));
    assert_eq!(logic.test_data, "# TODO: Add test data for cart workflow");
    assert!(logic.action.contains("# result = cart_tasks.some_action()"));
}

#[test]
fn rule_names_are_unique() {
    let mut names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), RULES.len());
}

// ============================================================================
// Test template
// ============================================================================

#[test]
fn test_prefix_added_once() {
    assert_eq!(ensure_test_prefix("login"), "test_login");
    assert_eq!(ensure_test_prefix("test_login"), "test_login");
}

#[test]
fn generated_test_for_login_scenario() {
    let s = scenario(
        "user is on login page",
        "user enters valid email and password",
        "user is logged in successfully",
    );
    let artifact = generate_test(
        "user_login",
        Workflow::Auth,
        None,
        Some(&s),
        Some("Verify user enters valid email and password"),
    );

    assert_eq!(artifact.logical_name, "test_user_login");
    assert_eq!(artifact.file_path, "tests/auth/test_user_login.py");

    let code = &artifact.source_text;
    assert!(code.contains("Auth Tests - User Login."));
    assert!(code.contains("from tasks.auth_tasks import AuthTasks"));
    assert!(code.contains("from roles.registered_user import RegisteredUser"));
    assert!(code.contains("@pytest.mark.auth"));
    assert!(code.contains("def test_user_login(web_interface, config):"));
    assert!(code.contains("auth_tasks = AuthTasks(web_interface, base_url)"));
    assert!(code.contains("Given: user is on login page"));
    assert!(code.contains("Architecture: Test -> RegisteredUser -> Task -> Page -> WebInterface"));
    assert!(code.contains("result = auth_tasks.login(test_email, test_password)"));
    assert!(code.contains("assert result is True"));
    assert!(code.contains("Verify user enters valid email and password"));

    assert_eq!(
        artifact.metadata.get("mapping_rule"),
        Some(&serde_json::json!("auth.login"))
    );
    assert_eq!(artifact.metadata.get("role"), Some(&serde_json::json!(DEFAULT_ROLE)));
}

#[test]
fn custom_role_is_imported() {
    let artifact = generate_test("test_checkout", Workflow::Checkout, Some("GuestBuyer"), None, None);
    assert!(artifact.source_text.contains("from roles.guest_buyer import GuestBuyer"));
    assert!(artifact.source_text.contains("Test -> GuestBuyer -> Task"));
}

#[test]
fn no_scenario_gives_placeholders() {
    let artifact = generate_test("browse", Workflow::Catalog, None, None, None);
    let code = &artifact.source_text;
    assert!(code.contains("# TODO: Add test data for catalog workflow"));
    assert!(code.contains("# TODO: Implement catalog action"));
    assert!(code.contains("# TODO: Add assertions"));
    assert!(!code.contains("Scenario:"), "docstring has no scenario section");
    assert_eq!(
        artifact.metadata.get("mapping_rule"),
        Some(&serde_json::json!("placeholder"))
    );
}

#[test]
fn unmatched_scenario_is_marked_fallback() {
    let s = scenario("", "user stares at cart", "nothing");
    let artifact = generate_test("stare", Workflow::Cart, None, Some(&s), None);
    assert_eq!(
        artifact.metadata.get("mapping_rule"),
        Some(&serde_json::json!("fallback"))
    );
    assert!(artifact.source_text.contains("# TODO: Add test data for cart workflow"));
}
