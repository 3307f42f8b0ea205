use serde::{Deserialize, Serialize};

use crate::codegen::artifact::{ComponentKind, GeneratedArtifact};
use crate::codegen::paths::resolve;
use crate::codegen::python::string_literal;
use crate::discovery::element_model::{DiscoveredElement, ElementType};

// ============================================================================
// Page-object input
// ============================================================================

/// Selenium `By` strategy inferred from a selector's surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocatorStrategy {
    CssSelector,
    XPath,
}

impl LocatorStrategy {
    /// `//...` and `(//...` are XPath; everything else, `#id` included, is CSS.
    pub fn infer(locator: &str) -> Self {
        let locator = locator.trim();
        if locator.starts_with("//") || locator.starts_with("(//") {
            LocatorStrategy::XPath
        } else {
            LocatorStrategy::CssSelector
        }
    }

    pub fn by_name(&self) -> &'static str {
        match self {
            LocatorStrategy::CssSelector => "CSS_SELECTOR",
            LocatorStrategy::XPath => "XPATH",
        }
    }
}

/// One locator constant (and possibly interaction methods) on a page object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    pub name: String,
    pub locator: String,
    #[serde(default)]
    pub element_type: Option<ElementType>,
}

impl PageElement {
    /// Pick the preferred locator (id > css > xpath). `None` when the element
    /// has no usable name or locator.
    pub fn from_discovered(element: &DiscoveredElement) -> Option<Self> {
        let locator = element.locator_candidates.preferred()?;
        if element.suggested_name.is_empty() {
            return None;
        }
        Some(PageElement {
            name: element.suggested_name.clone(),
            locator: locator.to_string(),
            element_type: Some(element.element_type),
        })
    }

    pub fn constant(&self) -> String {
        self.name.to_uppercase()
    }

    /// Interaction method names this element contributes, in emission order.
    pub fn method_names(&self) -> Vec<String> {
        let lower = self.name.to_lowercase();
        match self.element_type {
            Some(ElementType::Inputs) => vec![format!("enter_{}", lower)],
            Some(ElementType::Buttons) | Some(ElementType::Links) => {
                vec![format!("click_{}", lower)]
            }
            Some(ElementType::Selects) => vec![format!("select_{}", lower)],
            Some(ElementType::Checkboxes) => {
                vec![format!("check_{}", lower), format!("uncheck_{}", lower)]
            }
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// All interaction method names the page object for `elements` will expose.
pub fn page_methods(elements: &[PageElement]) -> Vec<String> {
    elements
        .iter()
        .filter(|e| !e.name.is_empty())
        .flat_map(PageElement::method_names)
        .collect()
}

/// Generate the page object and its canonical path.
///
/// Output depends only on the inputs; identical inputs give identical text.
pub fn generate_page_object(page_name: &str, elements: &[PageElement]) -> GeneratedArtifact {
    let code = page_object_source(page_name, elements);
    GeneratedArtifact::new(
        ComponentKind::Page,
        page_name,
        resolve(ComponentKind::Page, page_name, None),
        code,
    )
    .with_meta("elements_count", elements.len())
    .with_meta("methods", page_methods(elements))
}

pub fn page_object_source(page_name: &str, elements: &[PageElement]) -> String {
    let mut locators = String::new();
    for element in elements {
        if element.name.is_empty() || element.locator.is_empty() {
            continue;
        }
        let strategy = LocatorStrategy::infer(&element.locator);
        locators.push_str(&format!(
            "    {} = (By.{}, {})\n",
            element.constant(),
            strategy.by_name(),
            string_literal(&element.locator)
        ));
    }
    if locators.is_empty() {
        locators.push_str("    # TODO: Add locators\n");
    }

    let methods = interaction_methods(elements);

    format!(
        r#"from selenium.webdriver.common.by import By
from framework.pages.base_page import BasePage
from framework.interfaces.web_interface import WebInterface


class {page_name}(BasePage):
    """
    {page_name} - Page Object Model

    Represents the page and provides methods for interaction.
    """

    def __init__(self, web: WebInterface):
        """
        Initialize {page_name}.

        Args:
            web: WebInterface instance
        """
        super().__init__(web)

    # ==================== LOCATORS ====================

{locators}
{methods}
"#
    )
}

fn interaction_methods(elements: &[PageElement]) -> String {
    if elements.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n    # ==================== INTERACTION METHODS ====================\n");

    for element in elements {
        let Some(element_type) = element.element_type else {
            continue;
        };
        if element.name.is_empty() {
            continue;
        }
        let constant = element.constant();
        let lower = element.name.to_lowercase();

        let method = match element_type {
            ElementType::Inputs => format!(
                r#"
    def enter_{lower}(self, text: str) -> None:
        """
        Enter text into {constant} field.

        Args:
            text: Text to enter
        """
        self.web.type_text(*self.{constant}, text)
"#
            ),
            ElementType::Buttons => format!(
                r#"
    def click_{lower}(self) -> None:
        """Click {constant} button."""
        self.web.click(*self.{constant})
"#
            ),
            ElementType::Links => format!(
                r#"
    def click_{lower}(self) -> None:
        """Click {constant} link."""
        self.web.click(*self.{constant})
"#
            ),
            ElementType::Selects => format!(
                r#"
    def select_{lower}(self, value: str) -> None:
        """
        Select option from {constant} dropdown.

        Args:
            value: Option value to select
        """
        self.web.select_dropdown_by_value(*self.{constant}, option_value=value)
"#
            ),
            ElementType::Checkboxes => format!(
                r#"
    def check_{lower}(self) -> None:
        """Check {constant} checkbox."""
        if not self.web.is_element_selected(*self.{constant}):
            self.web.click(*self.{constant})

    def uncheck_{lower}(self) -> None:
        """Uncheck {constant} checkbox."""
        if self.web.is_element_selected(*self.{constant}):
            self.web.click(*self.{constant})
"#
            ),
            ElementType::Radios | ElementType::Textareas | ElementType::Images => continue,
        };
        out.push_str(&method);
    }

    out
}
