use serde::{Deserialize, Serialize};

/// Top-level switcher settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SwitcherSettings {
    #[serde(default)]
    pub behavior: BehaviorSettings,
    #[serde(default)]
    pub appearance: AppearanceSettings,
}

/// Switching behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehaviorSettings {
    /// How many tabs the popup renders. The registry keeps the full history
    /// internally; only the display is capped.
    pub number_of_tabs_to_show: usize,
    /// When the active tab closes, jump back to the previously used tab.
    pub switch_to_previously_used_on_close: bool,
    /// Delay before the popup switches on its own when the page cannot
    /// receive key events (address bar focused).
    pub auto_switching_timeout_ms: u64,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            number_of_tabs_to_show: 7,
            switch_to_previously_used_on_close: true,
            auto_switching_timeout_ms: 1000,
        }
    }
}

/// Popup appearance settings, forwarded verbatim to the injected UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppearanceSettings {
    pub dark_theme: bool,
    pub popup_width: u32,
    pub tab_height: u32,
    pub font_size: u32,
    pub icon_size: u32,
    /// Popup opacity in percent.
    pub opacity: u32,
    /// Delay before long tab titles start scrolling.
    pub text_scroll_delay_ms: u64,
    /// Scroll speed multiplier for long tab titles.
    pub text_scroll_coefficient: f64,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            dark_theme: false,
            popup_width: 420,
            tab_height: 40,
            font_size: 16,
            icon_size: 24,
            opacity: 100,
            text_scroll_delay_ms: 1000,
            text_scroll_coefficient: 2.5,
        }
    }
}
