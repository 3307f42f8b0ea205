use serde::{Deserialize, Serialize};

use crate::codegen::artifact::{ComponentKind, GeneratedArtifact};
use crate::codegen::method_scan::PageObjectMethodSet;
use crate::codegen::paths::{import_path_from_file, resolve, to_snake_case};

// ============================================================================
// Task input
// ============================================================================

/// A page object the task may orchestrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageObjectDescriptor {
    pub name: String,
    pub file_path: String,
    pub methods: PageObjectMethodSet,
}

impl PageObjectDescriptor {
    /// Instance attribute the task stores the page under: `LoginPage` -> `login_page`.
    pub fn attribute_name(&self) -> String {
        to_snake_case(&self.name)
    }
}

/// Workflow family inferred from the task class name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFamily {
    Auth,
    Catalog,
    Cart,
    Other(String),
}

impl TaskFamily {
    /// `AuthTasks` -> `Auth`, `OrderTasks` -> `Other("order")`.
    pub fn from_task_name(task_name: &str) -> Self {
        let stem = task_name.strip_suffix("Tasks").unwrap_or(task_name).to_lowercase();
        match stem.as_str() {
            "auth" => TaskFamily::Auth,
            "catalog" => TaskFamily::Catalog,
            "cart" => TaskFamily::Cart,
            _ => TaskFamily::Other(stem),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskFamily::Auth => "auth",
            TaskFamily::Catalog => "catalog",
            TaskFamily::Cart => "cart",
            TaskFamily::Other(stem) => stem,
        }
    }
}

/// Whether the emitted workflow bodies are runnable or scaffolding that
/// raises `NotImplementedError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkflowStatus {
    Complete,
    Placeholder,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Complete => "COMPLETE",
            WorkflowStatus::Placeholder => "PLACEHOLDER",
        }
    }
}

// ============================================================================
// Capability detection
// ============================================================================

/// A capability slot filled by the first method containing all needles.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityRule {
    pub slot: &'static str,
    pub needles: &'static [&'static str],
}

pub const AUTH_RULES: &[CapabilityRule] = &[
    CapabilityRule { slot: "email", needles: &["enter", "email"] },
    CapabilityRule { slot: "password", needles: &["enter", "pass"] },
    CapabilityRule { slot: "submit", needles: &["submit", "login", "click"] },
];

pub const CATALOG_RULES: &[CapabilityRule] = &[
    CapabilityRule { slot: "category", needles: &["category"] },
    CapabilityRule { slot: "link", needles: &["link"] },
];

pub const CART_RULES: &[CapabilityRule] = &[
    CapabilityRule { slot: "add_to_cart", needles: &["click", "add", "cart"] },
    CapabilityRule { slot: "view_cart", needles: &["click", "view", "cart"] },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityMatch {
    pub slot: String,
    pub method: Option<String>,
}

pub fn match_capabilities(
    rules: &[CapabilityRule],
    methods: &PageObjectMethodSet,
) -> Vec<CapabilityMatch> {
    rules
        .iter()
        .map(|rule| CapabilityMatch {
            slot: rule.slot.to_string(),
            method: methods.find_containing(rule.needles).map(str::to_string),
        })
        .collect()
}

fn matched<'a>(matches: &'a [CapabilityMatch], slot: &str) -> Option<&'a str> {
    matches
        .iter()
        .find(|m| m.slot == slot)
        .and_then(|m| m.method.as_deref())
}

// ============================================================================
// Generation
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TaskGeneration {
    pub artifact: GeneratedArtifact,
    pub status: WorkflowStatus,
    /// Methods of the first page object, as used for capability matching
    pub methods_found: Vec<String>,
    pub capabilities: Vec<CapabilityMatch>,
}

/// Generate a task class.
///
/// Without page objects the class is explicit scaffolding. With page objects
/// the family inferred from `task_name` decides whether complete workflow
/// bodies can be emitted from the first page object's methods.
pub fn generate_task(
    task_name: &str,
    description: Option<&str>,
    page_objects: &[PageObjectDescriptor],
) -> TaskGeneration {
    let family = TaskFamily::from_task_name(task_name);

    let (page_imports, page_inits, workflows, status, methods_found, capabilities) =
        match page_objects.first() {
            None => (
                format!(
                    "# TODO: Import required page objects\n# from pages.{}.some_page import SomePage",
                    family.as_str()
                ),
                "        # TODO: Initialize page objects\n        # self.some_page = SomePage(web)"
                    .to_string(),
                scaffold_workflow(),
                WorkflowStatus::Placeholder,
                Vec::new(),
                Vec::new(),
            ),
            Some(primary) => {
                let mut imports = String::new();
                let mut inits = String::new();
                for page in page_objects {
                    imports.push_str(&format!(
                        "from {} import {}\n",
                        import_path_from_file(&page.file_path),
                        page.name
                    ));
                    inits.push_str(&format!(
                        "        self.{} = {}(web)\n",
                        page.attribute_name(),
                        page.name
                    ));
                }
                let (body, status, capabilities) = family_workflows(&family, primary);
                (
                    imports,
                    inits,
                    body,
                    status,
                    primary.methods.names().to_vec(),
                    capabilities,
                )
            }
        };

    let description = description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("TODO: Add workflow description");

    let code = format!(
        r#""""
{task_name} - Reusable workflow methods.

This module provides high-level task methods that orchestrate page objects
to accomplish business workflows.

{description}
"""

from typing import Optional
from framework.interfaces.web_interface import WebInterface
{page_imports}


class {task_name}:
    """{task_name} workflows."""

    def __init__(self, web: WebInterface, base_url: str):
        """
        Initialize {task_name}.

        Args:
            web: WebInterface instance
            base_url: Application base URL
        """
        self.web = web
        self.base_url = base_url

{page_inits}
{workflows}"#
    );

    let artifact = GeneratedArtifact::new(
        ComponentKind::Task,
        task_name,
        resolve(ComponentKind::Task, task_name, None),
        code,
    )
    .with_meta("family", family.as_str())
    .with_meta("workflows_generated", status.as_str())
    .with_meta("page_objects_used", page_objects.len())
    .with_meta("methods_found", methods_found.clone());

    TaskGeneration {
        artifact,
        status,
        methods_found,
        capabilities,
    }
}

fn family_workflows(
    family: &TaskFamily,
    page: &PageObjectDescriptor,
) -> (String, WorkflowStatus, Vec<CapabilityMatch>) {
    let page_var = page.attribute_name();
    let mut out = String::from("\n    # ==================== WORKFLOW METHODS ====================\n");

    match family {
        TaskFamily::Auth => {
            let caps = match_capabilities(AUTH_RULES, &page.methods);
            let slots = (
                matched(&caps, "email"),
                matched(&caps, "password"),
                matched(&caps, "submit"),
            );
            match slots {
                (Some(email), Some(password), Some(submit)) => {
                    out.push_str(&auth_workflows(&page_var, email, password, submit));
                    (out, WorkflowStatus::Complete, caps)
                }
                _ => {
                    out.push_str(&generic_workflow(&page.methods));
                    (out, WorkflowStatus::Placeholder, caps)
                }
            }
        }
        TaskFamily::Catalog => {
            let caps = match_capabilities(CATALOG_RULES, &page.methods);
            out.push_str(&catalog_workflows(&page_var, matched(&caps, "category")));
            (out, WorkflowStatus::Complete, caps)
        }
        TaskFamily::Cart => {
            let caps = match_capabilities(CART_RULES, &page.methods);
            out.push_str(&cart_workflows(
                &page_var,
                matched(&caps, "add_to_cart"),
                matched(&caps, "view_cart"),
            ));
            (out, WorkflowStatus::Complete, caps)
        }
        TaskFamily::Other(_) => {
            out.push_str(&generic_workflow(&page.methods));
            (out, WorkflowStatus::Placeholder, Vec::new())
        }
    }
}

// ============================================================================
// Workflow bodies
// ============================================================================

fn auth_workflows(page_var: &str, email: &str, password: &str, submit: &str) -> String {
    format!(
        r#"
    def login(self, email: str, password: str) -> bool:
        """
        Execute login workflow.

        Complete workflow:
        1. Navigate to login page
        2. Enter email and password
        3. Click submit button
        4. Verify login success

        Args:
            email: User email address
            password: User password

        Returns:
            True if login successful, False otherwise
        """
        # Navigate to authentication page
        self.web.navigate_to(f"{{self.base_url}}/index.php?controller=authentication")

        # Enter credentials
        self.{page_var}.{email}(email)
        self.{page_var}.{password}(password)

        # Submit login
        self.{page_var}.{submit}()

        # Verify login success (check for account menu or logout link)
        from selenium.webdriver.common.by import By
        return self.web.is_element_displayed(By.CSS_SELECTOR, ".account, .logout")

    def logout(self) -> bool:
        """
        Execute logout workflow.

        Complete workflow:
        1. Click logout link
        2. Verify logout success

        Returns:
            True if logout successful, False otherwise
        """
        from selenium.webdriver.common.by import By

        # Click logout if visible
        if self.web.is_element_displayed(By.CSS_SELECTOR, ".logout"):
            self.web.click(By.CSS_SELECTOR, ".logout")

        # Verify logout (login link should be visible)
        return self.web.is_element_displayed(By.CSS_SELECTOR, ".login")
"#
    )
}

fn catalog_workflows(page_var: &str, category_method: Option<&str>) -> String {
    let browse_step = match category_method {
        Some(method) => format!(
            r##"        # Open the category through the page object
        self.{page_var}.{method}()

        # Verify category page loaded
        return self.web.is_element_displayed(By.CSS_SELECTOR, ".product-container, .product_list")"##
        ),
        None => r##"        # Click category link
        category_locator = (By.XPATH, f"//a[contains(text(), '{category_name}')]")
        if self.web.is_element_displayed(*category_locator):
            self.web.click(*category_locator)

            # Verify category page loaded
            return self.web.is_element_displayed(By.CSS_SELECTOR, ".product-container, .product_list")

        return False"##
            .to_string(),
    };

    format!(
        r##"
    def browse_category(self, category_name: str) -> bool:
        """
        Browse to a specific product category.

        Args:
            category_name: Name of category to browse

        Returns:
            True if category page loaded, False otherwise
        """
        from selenium.webdriver.common.by import By

        # Navigate to homepage
        self.web.navigate_to(self.base_url)

{browse_step}

    def get_product_count(self) -> int:
        """
        Get count of products displayed on page.

        Returns:
            Number of products found
        """
        from selenium.webdriver.common.by import By
        products = self.web.find_elements(By.CSS_SELECTOR, ".product-container")
        return len(products)
"##
    )
}

fn cart_workflows(page_var: &str, add_method: Option<&str>, view_method: Option<&str>) -> String {
    let add_step = match add_method {
        Some(method) => format!(
            r##"            # Add through the page object
            self.{page_var}.{method}()

            # Verify cart confirmation
            return self.web.is_element_displayed(By.CSS_SELECTOR, ".layer_cart_product, #layer_cart")"##
        ),
        None => r##"            # Click add to cart button
            add_to_cart_btn = (By.CSS_SELECTOR, ".add-to-cart, button[name='Submit']")
            if self.web.is_element_displayed(*add_to_cart_btn):
                self.web.click(*add_to_cart_btn)

                # Verify cart confirmation
                return self.web.is_element_displayed(By.CSS_SELECTOR, ".layer_cart_product, #layer_cart")"##
            .to_string(),
    };

    let view_body = match view_method {
        Some(method) => format!(
            r##"        # Open the cart through the page object
        self.{page_var}.{method}()

        # Verify cart page loaded
        return self.web.is_element_displayed(By.CSS_SELECTOR, "#cart_summary, .cart_navigation")"##
        ),
        None => r##"        # Click cart link
        cart_link = (By.CSS_SELECTOR, ".shopping_cart a, a[title='View my shopping cart']")
        if self.web.is_element_displayed(*cart_link):
            self.web.click(*cart_link)

            # Verify cart page loaded
            return self.web.is_element_displayed(By.CSS_SELECTOR, "#cart_summary, .cart_navigation")

        return False"##
            .to_string(),
    };

    format!(
        r##"
    def add_to_cart(self, product_name: str, quantity: int = 1) -> bool:
        """
        Add product to shopping cart.

        Args:
            product_name: Name of product to add
            quantity: Number of units to add

        Returns:
            True if product added successfully, False otherwise
        """
        from selenium.webdriver.common.by import By

        # Find and click product
        product_locator = (By.XPATH, f"//a[contains(@title, '{{product_name}}')]")
        if self.web.is_element_displayed(*product_locator):
            self.web.click(*product_locator)

            # Set quantity when the product page offers it
            quantity_input = (By.CSS_SELECTOR, "#quantity_wanted")
            if quantity > 1 and self.web.is_element_displayed(*quantity_input):
                self.web.type_text(*quantity_input, str(quantity))

{add_step}

        return False

    def view_cart(self) -> bool:
        """
        Navigate to shopping cart page.

        Returns:
            True if cart page loaded, False otherwise
        """
        from selenium.webdriver.common.by import By

{view_body}
"##
    )
}

fn generic_workflow(methods: &PageObjectMethodSet) -> String {
    let names = methods.names();
    let listed = names.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
    let more = if names.len() > 5 { "..." } else { "" };

    format!(
        r#"
    def example_workflow(self, param: str) -> bool:
        """
        Execute example workflow.

        Args:
            param: Workflow parameter

        Returns:
            True if workflow successful, False otherwise
        """
        # TODO: Implement workflow using page object methods
        # Available methods: {listed}{more}

        raise NotImplementedError("Workflow not yet implemented")
"#
    )
}

fn scaffold_workflow() -> String {
    r#"

    # ==================== WORKFLOW METHODS ====================

    def example_workflow(self, param1: str) -> bool:
        """
        Execute example workflow.

        Complete workflow: describe the steps here.

        Args:
            param1: Description of parameter

        Returns:
            True if workflow successful, False otherwise
        """
        # TODO: Implement workflow
        # Example:
        # self.some_page.perform_action(param1)
        # return self.some_page.verify_result()

        raise NotImplementedError("Workflow not yet implemented")

    # TODO: Add more workflow methods
"#
    .to_string()
}
