//! Dashboard views
//!
//! Every page the dashboard can show is a statically known [`View`],
//! registered in a [`ViewRegistry`] under its [`PageId`]. Navigation looks
//! the view up and asks it to render an HTML fragment; nothing fetched at
//! runtime is ever executed.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use stanshare_client::{HttpTransport, ScoreThresholds, StanShareClient};

use crate::error::Result;
use crate::session::Session;

pub mod extraction;
pub mod funds;
pub mod overview;
pub mod quality;

/// Pages known to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageId {
    Overview,
    Extraction,
    Funds,
    Annotations,
}

impl PageId {
    pub const ALL: [PageId; 4] = [
        PageId::Overview,
        PageId::Extraction,
        PageId::Funds,
        PageId::Annotations,
    ];

    /// Parse a page name such as `funds.html` or `funds`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let stem = name.strip_suffix(".html").unwrap_or(&name);
        match stem {
            "dashboard" | "overview" | "index" => Some(PageId::Overview),
            "extraction" => Some(PageId::Extraction),
            "funds" => Some(PageId::Funds),
            "annotations" | "quality" => Some(PageId::Annotations),
            _ => None,
        }
    }

    /// Page title shown in the header
    pub fn title(self) -> &'static str {
        match self {
            PageId::Overview => "Dashboard",
            PageId::Extraction => "Extract Funds",
            PageId::Funds => "Browse Funds",
            PageId::Annotations => "Quality Dashboard",
        }
    }

    /// Key of the sidebar item that is highlighted on this page
    pub fn nav_key(self) -> &'static str {
        match self {
            PageId::Overview => "dashboard",
            PageId::Extraction => "extraction",
            PageId::Funds => "funds",
            PageId::Annotations => "annotations",
        }
    }

    /// Name used in links between pages
    pub fn file_name(self) -> &'static str {
        match self {
            PageId::Overview => "dashboard",
            PageId::Extraction => "extraction.html",
            PageId::Funds => "funds.html",
            PageId::Annotations => "annotations.html",
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nav_key())
    }
}

/// Title for a page name; unknown pages get the dashboard title
pub fn title_for(name: &str) -> &'static str {
    PageId::from_name(name).map_or(PageId::Overview.title(), PageId::title)
}

/// Everything a view may read while rendering
pub struct ViewContext<'a, T: HttpTransport> {
    pub client: &'a StanShareClient<T>,
    pub session: &'a Session,
    pub thresholds: &'a ScoreThresholds,
}

/// A statically known dashboard page
#[async_trait]
pub trait View<T: HttpTransport>: Send + Sync {
    fn page(&self) -> PageId;

    /// Render the page body as an HTML fragment
    async fn render(&self, ctx: &ViewContext<'_, T>) -> Result<String>;
}

/// Views keyed by page
pub struct ViewRegistry<T: HttpTransport> {
    views: HashMap<PageId, Box<dyn View<T>>>,
}

impl<T: HttpTransport> ViewRegistry<T> {
    pub fn new() -> Self {
        Self {
            views: HashMap::new(),
        }
    }

    /// Registry with every built-in page
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(overview::OverviewView));
        registry.register(Box::new(extraction::ExtractionView));
        registry.register(Box::new(funds::FundsView));
        registry.register(Box::new(quality::QualityView));
        registry
    }

    /// Register a view, returning the one it replaced
    pub fn register(&mut self, view: Box<dyn View<T>>) -> Option<Box<dyn View<T>>> {
        self.views.insert(view.page(), view)
    }

    pub fn get(&self, page: PageId) -> Option<&dyn View<T>> {
        self.views.get(&page).map(|v| &**v)
    }

    pub fn pages(&self) -> Vec<PageId> {
        let mut pages: Vec<_> = self.views.keys().copied().collect();
        pages.sort();
        pages
    }
}

impl<T: HttpTransport> Default for ViewRegistry<T> {
    fn default() -> Self {
        Self::standard()
    }
}

/// First non-empty string (or number) under any of `keys`
pub(crate) fn field_str(item: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match item.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First numeric value under any of `keys`; numeric strings count
pub(crate) fn field_f64(item: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match item.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stanshare_client::MockTransport;

    #[test]
    fn test_page_names() {
        assert_eq!(PageId::from_name("extraction.html"), Some(PageId::Extraction));
        assert_eq!(PageId::from_name("Funds"), Some(PageId::Funds));
        assert_eq!(PageId::from_name("dashboard"), Some(PageId::Overview));
        assert_eq!(PageId::from_name("settings.html"), None);

        for page in PageId::ALL {
            assert_eq!(PageId::from_name(page.file_name()), Some(page));
        }
    }

    #[test]
    fn test_titles() {
        assert_eq!(title_for("extraction.html"), "Extract Funds");
        assert_eq!(title_for("funds.html"), "Browse Funds");
        assert_eq!(title_for("annotations.html"), "Quality Dashboard");
        assert_eq!(title_for("mystery.html"), "Dashboard");
    }

    #[test]
    fn test_standard_registry() {
        let registry = ViewRegistry::<MockTransport>::standard();
        assert_eq!(registry.pages(), PageId::ALL.to_vec());
        for page in PageId::ALL {
            assert_eq!(registry.get(page).map(|v| v.page()), Some(page));
        }
        assert!(ViewRegistry::<MockTransport>::new().get(PageId::Funds).is_none());
    }

    #[test]
    fn test_field_helpers() {
        let item = json!({"name": "", "fund_name": "Gamma", "cik": 12345, "assets": "1500.5"});
        assert_eq!(field_str(&item, &["name", "fund_name"]).as_deref(), Some("Gamma"));
        assert_eq!(field_str(&item, &["cik"]).as_deref(), Some("12345"));
        assert_eq!(field_f64(&item, &["assets"]), Some(1500.5));
        assert_eq!(field_f64(&item, &["missing"]), None);
    }
}
