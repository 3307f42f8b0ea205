use crate::discovery::element_model::{
    DiscoveredElement, ElementType, LocatorBasis, LocatorCandidates,
};
use crate::discovery::inspector::{ElementHandle, ElementInspector, PageHandle};
use crate::error::ScaffoldError;

const MAX_NAME_LEN: usize = 40;
const MAX_TEXT_LOCATOR_LEN: usize = 20;

// ============================================================================
// Discovery
// ============================================================================

/// Enumerate visible interactive elements on the page, category by category.
///
/// Hidden nodes are dropped. Nodes whose attributes cannot be read (stale,
/// detached) are skipped without failing the call; only a failed query
/// itself is an error.
pub fn discover<P: PageHandle>(page: &mut P) -> Result<Vec<DiscoveredElement>, ScaffoldError> {
    let mut discovered = Vec::new();

    for element_type in ElementType::ALL {
        let nodes = page.find_elements(element_type.css_query())?;

        for (index, node) in nodes.iter().enumerate() {
            if let Ok(Some(element)) = read_element(node, element_type, index) {
                discovered.push(element);
            }
        }
    }

    Ok(discovered)
}

/// Navigate to `url`, then discover.
pub fn discover_url<P: PageHandle>(
    page: &mut P,
    url: &str,
) -> Result<Vec<DiscoveredElement>, ScaffoldError> {
    page.navigate(url)?;
    discover(page)
}

/// Read one node. `Ok(None)` means the node is not displayed.
fn read_element<E: ElementHandle>(
    node: &E,
    element_type: ElementType,
    index: usize,
) -> Result<Option<DiscoveredElement>, ScaffoldError> {
    if !node.is_displayed()? {
        return Ok(None);
    }

    let attr = |name: &str| -> Result<String, ScaffoldError> {
        Ok(node.attribute(name)?.unwrap_or_default())
    };

    let tag_name = node.tag_name()?.to_lowercase();
    let id = attr("id")?;
    let class = attr("class")?;
    let name = attr("name")?;
    let visible_text = node.text()?.trim().to_string();
    let text = if visible_text.is_empty() {
        attr("value")?
    } else {
        visible_text
    };
    let placeholder = attr("placeholder")?;
    let type_attr = attr("type")?;
    let href = attr("href")?;
    let src = attr("src")?;

    let suggested_name = suggest_name(element_type, &id, &name, &text, &placeholder, index);
    let locator_candidates = build_locators(&tag_name, &id, &class, &name, &text, &type_attr);

    Ok(Some(DiscoveredElement {
        suggested_name,
        element_type,
        tag_name,
        type_attr,
        id,
        class,
        name,
        text,
        placeholder,
        href,
        src,
        locator_candidates,
        visible: true,
    }))
}

// ============================================================================
// Naming
// ============================================================================

/// Suggested locator constant name, e.g. `SUBMITLOGIN` or `BUTTONS_3`.
///
/// Source priority: id, name, text, placeholder, `{type}_{index}`.
/// Identical results for different elements are not deduplicated.
pub fn suggest_name(
    element_type: ElementType,
    id: &str,
    name: &str,
    text: &str,
    placeholder: &str,
    index: usize,
) -> String {
    let fallback = format!("{}_{}", element_type, index);
    let source = [id, name, text, placeholder]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(fallback.as_str());

    let cleaned: String = source
        .trim()
        .chars()
        .map(|c| if matches!(c, '-' | ' ' | '.') { '_' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    cleaned.to_uppercase().chars().take(MAX_NAME_LEN).collect()
}

// ============================================================================
// Locators
// ============================================================================

/// Build locator candidates from the first usable attribute.
///
/// Branches are exclusive: id, name, first class token, type, text, tag.
pub fn build_locators(
    tag: &str,
    id: &str,
    class: &str,
    name: &str,
    text: &str,
    type_attr: &str,
) -> LocatorCandidates {
    let first_class = class.split_whitespace().next().unwrap_or("");

    if !id.is_empty() {
        LocatorCandidates {
            id: Some(format!("#{}", id)),
            css: None,
            xpath: Some(format!("//{}[@id='{}']", tag, id)),
            basis: Some(LocatorBasis::Id),
        }
    } else if !name.is_empty() {
        LocatorCandidates {
            id: None,
            css: Some(format!("{}[name='{}']", tag, name)),
            xpath: Some(format!("//{}[@name='{}']", tag, name)),
            basis: Some(LocatorBasis::Name),
        }
    } else if !first_class.is_empty() {
        LocatorCandidates {
            id: None,
            css: Some(format!("{}.{}", tag, first_class)),
            xpath: Some(format!("//{}[contains(@class, '{}')]", tag, first_class)),
            basis: Some(LocatorBasis::Class),
        }
    } else if !type_attr.is_empty() {
        LocatorCandidates {
            id: None,
            css: Some(format!("{}[type='{}']", tag, type_attr)),
            xpath: Some(format!("//{}[@type='{}']", tag, type_attr)),
            basis: Some(LocatorBasis::Type),
        }
    } else if !text.is_empty() {
        let prefix: String = text.chars().take(MAX_TEXT_LOCATOR_LEN).collect();
        LocatorCandidates {
            id: None,
            css: None,
            xpath: Some(format!("//{}[contains(text(), '{}')]", tag, prefix)),
            basis: Some(LocatorBasis::Text),
        }
    } else {
        LocatorCandidates {
            id: None,
            css: Some(tag.to_string()),
            xpath: Some(format!("//{}", tag)),
            basis: Some(LocatorBasis::Tag),
        }
    }
}

// ============================================================================
// Inspector over any page handle
// ============================================================================

/// Adapts a `PageHandle` into the URL-in/elements-out inspector capability.
pub struct PageInspector<P: PageHandle> {
    page: P,
}

impl<P: PageHandle> PageInspector<P> {
    pub fn new(page: P) -> Self {
        Self { page }
    }

    pub fn into_inner(self) -> P {
        self.page
    }
}

impl<P: PageHandle> ElementInspector for PageInspector<P> {
    fn inspect(&mut self, url: &str) -> Result<Vec<DiscoveredElement>, ScaffoldError> {
        discover_url(&mut self.page, url)
    }
}
