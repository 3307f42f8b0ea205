#![allow(dead_code)]

use std::collections::HashMap;

use scenario_scaffold::discovery::element_model::{DiscoveredElement, ElementType};
use scenario_scaffold::discovery::inspector::{ElementHandle, ElementInspector, PageHandle};
use scenario_scaffold::error::ScaffoldError;

// ============================================================================
// Fake page
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct FakeNode {
    pub tag: String,
    pub text: String,
    pub visible: bool,
    pub attributes: HashMap<String, String>,
    pub stale: bool,
}

impl FakeNode {
    pub fn new(tag: &str) -> Self {
        FakeNode {
            tag: tag.to_string(),
            visible: true,
            ..FakeNode::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    fn check(&self) -> Result<(), ScaffoldError> {
        if self.stale {
            Err(ScaffoldError::StaleElement(format!("<{}> detached", self.tag)))
        } else {
            Ok(())
        }
    }
}

impl ElementHandle for FakeNode {
    fn is_displayed(&self) -> Result<bool, ScaffoldError> {
        self.check()?;
        Ok(self.visible)
    }

    fn tag_name(&self) -> Result<String, ScaffoldError> {
        self.check()?;
        Ok(self.tag.clone())
    }

    fn text(&self) -> Result<String, ScaffoldError> {
        self.check()?;
        Ok(self.text.clone())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, ScaffoldError> {
        self.check()?;
        Ok(self.attributes.get(name).cloned())
    }
}

/// A page whose nodes are keyed by element category.
#[derive(Debug, Default)]
pub struct FakePage {
    pub nodes: HashMap<ElementType, Vec<FakeNode>>,
    pub visited: Vec<String>,
    pub fail_navigation: bool,
}

impl FakePage {
    pub fn with(mut self, element_type: ElementType, node: FakeNode) -> Self {
        self.nodes.entry(element_type).or_default().push(node);
        self
    }
}

impl PageHandle for FakePage {
    type Element = FakeNode;

    fn navigate(&mut self, url: &str) -> Result<(), ScaffoldError> {
        if self.fail_navigation {
            return Err(ScaffoldError::SessionProtocol {
                command: "navigate".into(),
                error: format!("net::ERR_NAME_NOT_RESOLVED at {}", url),
            });
        }
        self.visited.push(url.to_string());
        Ok(())
    }

    fn find_elements(&mut self, css_selector: &str) -> Result<Vec<FakeNode>, ScaffoldError> {
        let element_type = ElementType::ALL
            .into_iter()
            .find(|t| t.css_query() == css_selector);
        Ok(element_type
            .and_then(|t| self.nodes.get(&t).cloned())
            .unwrap_or_default())
    }
}

/// Login form as rendered by the demo shop's authentication page.
pub fn login_page() -> FakePage {
    FakePage::default()
        .with(
            ElementType::Inputs,
            FakeNode::new("INPUT").attr("id", "email").attr("type", "text").attr("name", "email"),
        )
        .with(
            ElementType::Inputs,
            FakeNode::new("INPUT").attr("id", "passwd").attr("type", "password").attr("name", "passwd"),
        )
        .with(
            ElementType::Buttons,
            FakeNode::new("BUTTON")
                .attr("id", "SubmitLogin")
                .attr("type", "submit")
                .text("Sign in"),
        )
        .with(
            ElementType::Links,
            FakeNode::new("A")
                .attr("href", "/index.php?controller=password")
                .text("Forgot your password?"),
        )
}

/// Inspector that always returns the same elements and records URLs.
pub struct StaticInspector {
    pub elements: Vec<DiscoveredElement>,
    pub urls: Vec<String>,
}

impl StaticInspector {
    pub fn new(elements: Vec<DiscoveredElement>) -> Self {
        Self {
            elements,
            urls: Vec::new(),
        }
    }
}

impl ElementInspector for StaticInspector {
    fn inspect(&mut self, url: &str) -> Result<Vec<DiscoveredElement>, ScaffoldError> {
        self.urls.push(url.to_string());
        Ok(self.elements.clone())
    }
}

/// Inspector for code paths that must never reach a browser.
pub struct UnreachableInspector;

impl ElementInspector for UnreachableInspector {
    fn inspect(&mut self, url: &str) -> Result<Vec<DiscoveredElement>, ScaffoldError> {
        Err(ScaffoldError::SessionIO(format!("no browser in tests ({})", url)))
    }
}

// ============================================================================
// Story fixtures
// ============================================================================

pub const LOGIN_STORY: &str = "\
User Login
As a registered customer I want to sign in so that I can see my orders.

Acceptance Criteria:
- Valid credentials log the user in
- Invalid credentials show an error

Scenario: Successful login
Given user is on login page
When user enters valid email and password
Then user is logged in successfully

Scenario: Rejected login
Given user has invalid credentials
When user enters email and password
Then an error message is shown
";

pub const SUCCESSFUL_LOGIN: &str = "Scenario: Successful login\nGiven user is on login page\nWhen user enters valid email and password\nThen user is logged in successfully";
