use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Verb prefix of a generated page-object interaction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodVerb {
    Enter,
    Click,
    Select,
    Check,
    Uncheck,
}

impl MethodVerb {
    pub const ALL: [MethodVerb; 5] = [
        MethodVerb::Enter,
        MethodVerb::Click,
        MethodVerb::Select,
        MethodVerb::Check,
        MethodVerb::Uncheck,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            MethodVerb::Enter => "enter_",
            MethodVerb::Click => "click_",
            MethodVerb::Select => "select_",
            MethodVerb::Check => "check_",
            MethodVerb::Uncheck => "uncheck_",
        }
    }

    pub fn of(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| method.starts_with(v.prefix()))
    }
}

/// Method names a page object exposes, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageObjectMethodSet {
    names: Vec<String>,
}

impl PageObjectMethodSet {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Scrape `def <name>(self` declarations carrying a known verb prefix.
    pub fn from_source(source: &str) -> Self {
        Self::new(
            extract_method_names(source)
                .into_iter()
                .filter(|m| MethodVerb::of(m).is_some())
                .collect(),
        )
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn by_verb(&self, verb: MethodVerb) -> Vec<&str> {
        self.names
            .iter()
            .filter(|m| MethodVerb::of(m) == Some(verb))
            .map(String::as_str)
            .collect()
    }

    /// First method whose name contains every needle.
    pub fn find_containing(&self, needles: &[&str]) -> Option<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .find(|m| needles.iter().all(|n| m.contains(n)))
    }
}

fn method_def_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"def\s+(\w+)\(self").expect("method pattern is valid")
    })
}

/// Every non-dunder instance method declared in a Python source text.
pub fn extract_method_names(source: &str) -> Vec<String> {
    method_def_pattern()
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|m| !m.starts_with("__"))
        .collect()
}
