use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier. Not stable across browser restarts.
pub type TabId = i32;

/// Host-assigned window identifier. Negative values mean "no window"
/// (some platforms deliver focus-change events with an invalid id).
pub type WindowId = i32;

/// URL schemes the browser refuses to inject code into.
const PRIVILEGED_SCHEMES: &[&str] = &[
    "chrome:",
    "chrome-extension:",
    "devtools:",
    "view-source:",
    "about:",
    "edge:",
];

/// Snapshot of one browser tab as seen by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub window_id: WindowId,
    pub title: String,
    pub url: String,
    pub favicon_url: Option<String>,
    pub active: bool,
}

impl Tab {
    /// True if code injection into this tab is forbidden by the host browser.
    pub fn is_privileged(&self) -> bool {
        is_privileged_url(&self.url)
    }
}

/// Returns true for internal-browser and view-source URLs where the host
/// refuses script injection.
pub fn is_privileged_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    PRIVILEGED_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Simplified tab snapshot persisted to durable storage for order
/// reconciliation on the next startup. Identifiers are deliberately absent:
/// they do not survive a browser restart, so matching is done by title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTab {
    pub title: String,
    pub url: String,
    pub favicon_url: Option<String>,
}

impl From<&Tab> for SavedTab {
    fn from(tab: &Tab) -> Self {
        Self {
            title: tab.title.clone(),
            url: tab.url.clone(),
            favicon_url: tab.favicon_url.clone(),
        }
    }
}
