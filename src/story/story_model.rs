use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScaffoldError;

/// Business workflow a story, test, or task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
    Auth,
    Catalog,
    Cart,
    Checkout,
}

impl Workflow {
    pub const ALL: [Workflow; 4] = [
        Workflow::Auth,
        Workflow::Catalog,
        Workflow::Cart,
        Workflow::Checkout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::Auth => "auth",
            Workflow::Catalog => "catalog",
            Workflow::Cart => "cart",
            Workflow::Checkout => "checkout",
        }
    }

    /// Conventional task class for this workflow: `auth` -> `AuthTasks`.
    pub fn task_class(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{}Tasks", first.to_ascii_uppercase(), chars.as_str()),
            None => "Tasks".to_string(),
        }
    }
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workflow {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auth" => Ok(Workflow::Auth),
            "catalog" => Ok(Workflow::Catalog),
            "cart" => Ok(Workflow::Cart),
            "checkout" => Ok(Workflow::Checkout),
            other => Err(ScaffoldError::invalid(
                "workflow",
                format!("'{}' (expected auth, catalog, cart, checkout)", other),
            )),
        }
    }
}

/// One Given/When/Then block as it appeared in the story text.
///
/// `name` is the explicit `Scenario:` label, or empty when the block had none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub given: String,
    #[serde(default)]
    pub when: String,
    #[serde(default)]
    pub then: String,
}

impl Scenario {
    pub fn has_content(&self) -> bool {
        !self.given.is_empty() || !self.when.is_empty() || !self.then.is_empty()
    }
}

/// Parsed user story. Built once per input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    pub scenarios: Vec<Scenario>,
}

/// A scenario bound to a workflow and a derived test function name, ready
/// for the test synthesizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestScenario {
    pub name: String,
    pub description: String,
    pub given: String,
    pub when: String,
    pub then: String,
    pub workflow: Workflow,
}

impl TestScenario {
    pub fn scenario(&self) -> Scenario {
        Scenario {
            name: self.name.clone(),
            given: self.given.clone(),
            when: self.when.clone(),
            then: self.then.clone(),
        }
    }
}
