use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Discovered elements
// ============================================================================

/// The eight element categories queried on every page, in query order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Buttons,
    Links,
    Inputs,
    Checkboxes,
    Radios,
    Selects,
    Textareas,
    Images,
}

impl ElementType {
    pub const ALL: [ElementType; 8] = [
        ElementType::Buttons,
        ElementType::Links,
        ElementType::Inputs,
        ElementType::Checkboxes,
        ElementType::Radios,
        ElementType::Selects,
        ElementType::Textareas,
        ElementType::Images,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Buttons => "buttons",
            ElementType::Links => "links",
            ElementType::Inputs => "inputs",
            ElementType::Checkboxes => "checkboxes",
            ElementType::Radios => "radios",
            ElementType::Selects => "selects",
            ElementType::Textareas => "textareas",
            ElementType::Images => "images",
        }
    }

    /// CSS selector matching every node of this category.
    pub fn css_query(&self) -> &'static str {
        match self {
            ElementType::Buttons => {
                "button, input[type='button'], input[type='submit'], input[type='reset']"
            }
            ElementType::Links => "a[href]",
            ElementType::Inputs => {
                "input[type='text'], input[type='password'], input[type='email'], \
                 input[type='search'], input[type='tel'], input[type='url']"
            }
            ElementType::Checkboxes => "input[type='checkbox']",
            ElementType::Radios => "input[type='radio']",
            ElementType::Selects => "select",
            ElementType::Textareas => "textarea",
            ElementType::Images => "img[src]",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which attribute a locator was built from, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorBasis {
    Id,
    Name,
    Class,
    Type,
    Text,
    Tag,
}

/// Locator forms recorded for one element. Exactly one basis produced them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocatorCandidates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpath: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis: Option<LocatorBasis>,
}

impl LocatorCandidates {
    /// The single locator a page object should use: id > css > xpath.
    pub fn preferred(&self) -> Option<&str> {
        [&self.id, &self.css, &self.xpath]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

/// One visible interactive element read from a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredElement {
    pub suggested_name: String,
    pub element_type: ElementType,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub type_attr: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub locator_candidates: LocatorCandidates,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}
