use crate::discovery::element_model::DiscoveredElement;
use crate::error::ScaffoldError;

// ============================================================================
// Page inspection seams
// ============================================================================

/// A node in the rendered document. Reads may fail once the node goes stale.
pub trait ElementHandle {
    fn is_displayed(&self) -> Result<bool, ScaffoldError>;
    fn tag_name(&self) -> Result<String, ScaffoldError>;
    fn text(&self) -> Result<String, ScaffoldError>;
    fn attribute(&self, name: &str) -> Result<Option<String>, ScaffoldError>;
}

/// A live page that can be navigated and queried by CSS selector.
pub trait PageHandle {
    type Element: ElementHandle;

    fn navigate(&mut self, url: &str) -> Result<(), ScaffoldError>;
    fn find_elements(&mut self, css_selector: &str) -> Result<Vec<Self::Element>, ScaffoldError>;
}

/// URL in, discovered elements out. The tool layer only sees this.
pub trait ElementInspector {
    fn inspect(&mut self, url: &str) -> Result<Vec<DiscoveredElement>, ScaffoldError>;
}
