//! Background-side orchestrator binding host-browser events and OS-level
//! shortcut commands to registry mutations and protocol messages.
//!
//! The dispatcher exclusively owns the tab registry; page contexts never
//! mutate it directly, only through messages handled here. Everything runs on
//! a single event loop — each handler applies its registry mutations to
//! completion before the next event is processed, so no two mutations
//! interleave. Browser-API failures never propagate out of a handler: a tab
//! that closed or navigated mid-call is skipped and the dispatcher carries on.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait};
use crate::types::errors::BrowserError;
use crate::types::events::ShortcutCommand;
use crate::types::message::{self, Message, Response};
use crate::types::settings::SwitcherSettings;
use crate::types::tab::{Tab, TabId, WindowId};

/// Content-script source injected once per tab.
pub const CONTENT_SCRIPT: &str = "content.js";

/// Cap on the in-memory event log served to `get_logs`.
const MAX_LOG_ENTRIES: usize = 1000;

/// Seam over the host browser's tab manipulation API.
///
/// Every call can fail because the tab closed or navigated between events;
/// callers treat failures as "proceed without this tab".
pub trait BrowserApi {
    /// The active tab of the focused window, if any.
    fn active_tab(&mut self) -> Option<Tab>;
    /// The active tab of a specific window, if any.
    fn active_tab_in_window(&mut self, window_id: WindowId) -> Option<Tab>;
    fn activate_tab(&mut self, id: TabId) -> Result<(), BrowserError>;
    fn focus_window(&mut self, id: WindowId) -> Result<(), BrowserError>;
    /// Injects `script` into the tab's execution context.
    fn execute_script(&mut self, tab_id: TabId, script: &str) -> Result<(), BrowserError>;
    /// Per-tab zoom factor; 1.0 when unknown.
    fn zoom_factor(&mut self, tab_id: TabId) -> f64;
    /// Sends a protocol message to the tab's content context. `Ok(None)`
    /// means the message was delivered fire-and-forget.
    fn send_message(
        &mut self,
        tab_id: TabId,
        message: &Message,
    ) -> Result<Option<Response>, BrowserError>;
}

/// Pending auto-switch deadline, armed when the popup is shown on a page
/// that cannot receive key events (focus sits in the address bar).
struct AutoSwitch {
    deadline: Instant,
}

pub struct CommandDispatcher<B: BrowserApi> {
    browser: B,
    registry: TabRegistry,
    settings: SwitcherSettings,
    auto_switch: Option<AutoSwitch>,
    /// Accumulated selection offset since the popup opened; consumed when the
    /// auto-switch timer fires.
    selection_offset: i32,
    logs: Vec<String>,
}

impl<B: BrowserApi> CommandDispatcher<B> {
    pub fn new(browser: B, registry: TabRegistry, settings: SwitcherSettings) -> Self {
        Self {
            browser,
            registry,
            settings,
            auto_switch: None,
            selection_offset: 0,
            logs: Vec::new(),
        }
    }

    // ─── Shortcut commands ───

    /// NEXT/PREVIOUS shortcut pressed.
    pub fn on_command(&mut self, command: ShortcutCommand) {
        let active = match self.browser.active_tab() {
            Some(t) => t,
            None => {
                warn!("shortcut command with no active tab");
                return;
            }
        };
        self.push_log(format!("command {:?} in tab {}", command, active.id));

        // Privileged pages cannot host the popup; uninitializable pages are
        // handled the same way: switch directly to the nearest other tab.
        if active.is_privileged() || !self.ensure_initialized(&active) {
            self.cancel_auto_switch();
            self.selection_offset = 0;
            self.activate_previous_of(active.id);
            return;
        }

        let zoom = self.browser.zoom_factor(active.id);
        self.selection_offset += command.offset();
        self.cancel_auto_switch();
        match self
            .browser
            .send_message(active.id, &message::select_tab(command.offset(), zoom))
        {
            Ok(Some(Response::SelectionState {
                page_has_focus: false,
            })) => self.schedule_auto_switch(),
            Ok(_) => {}
            Err(e) => warn!(tab = active.id, error = %e, "select_tab not delivered"),
        }
    }

    // ─── Tab lifecycle ───

    /// A tab became active.
    pub fn on_tab_activated(&mut self, tab: Tab) {
        // Any activation ends an in-flight switching session; a timer firing
        // afterwards would act on state that is already gone.
        self.cancel_auto_switch();
        self.selection_offset = 0;
        self.registry.push(tab);
    }

    /// Window focus moved. Events without a valid window identifier are
    /// spurious (observed on some platforms) and ignored.
    pub fn on_window_focus_changed(&mut self, window_id: WindowId) {
        if window_id < 0 {
            return;
        }
        if let Some(tab) = self.browser.active_tab_in_window(window_id) {
            self.on_tab_activated(tab);
        }
    }

    /// A tab was created. Background-opened tabs (middle-click) slot in just
    /// under the active tab; active ones arrive via their activation event.
    pub fn on_tab_created(&mut self, tab: Tab) {
        if !tab.active {
            self.registry.push_under_top(tab);
        }
    }

    /// A tab finished a navigation step. On load completion the injected
    /// context is gone, so the initialization flag is cleared and the stored
    /// snapshot refreshed.
    pub fn on_tab_updated(&mut self, tab: Tab, load_complete: bool) {
        if !load_complete {
            return;
        }
        self.registry.remove_from_initialized(tab.id);
        self.registry.update(tab);
    }

    /// A tab was closed.
    pub fn on_tab_removed(&mut self, id: TabId) {
        self.registry.remove(id);
        if self.settings.behavior.switch_to_previously_used_on_close {
            if let Some(top) = self.registry.get_active() {
                self.activate(&top);
            }
        }
    }

    // ─── Settings channel ───

    /// New settings arrived from the configuring surface. Applies them live,
    /// notifies every initialized tab silently, and refreshes the popup of
    /// the active tab so the change is visible immediately.
    pub fn on_settings_changed(&mut self, settings: SwitcherSettings) {
        self.settings = settings;
        self.registry
            .set_number_of_tabs_to_show(self.settings.behavior.number_of_tabs_to_show);

        for tab in self.registry.get_tabs() {
            if !self.registry.is_initialized(&tab) {
                continue;
            }
            if let Err(e) = self
                .browser
                .send_message(tab.id, &message::apply_settings(self.settings.clone()))
            {
                debug!(tab = tab.id, error = %e, "settings not applied");
            }
        }

        if let Some(active) = self.browser.active_tab() {
            if !active.is_privileged() && self.ensure_initialized(&active) {
                let zoom = self.browser.zoom_factor(active.id);
                if let Err(e) = self
                    .browser
                    .send_message(active.id, &message::select_tab(0, zoom))
                {
                    debug!(tab = active.id, error = %e, "settings refresh not delivered");
                }
            }
        }
    }

    /// The settings surface disconnected; its demo popup must not stay open.
    pub fn on_settings_ui_disconnected(&mut self) {
        self.cancel_auto_switch();
        self.selection_offset = 0;
        if let Some(active) = self.browser.active_tab() {
            if let Err(e) = self
                .browser
                .send_message(active.id, &message::close_overlay())
            {
                debug!(tab = active.id, error = %e, "close_overlay not delivered");
            }
        }
    }

    // ─── Page-originated protocol messages ───

    /// The user picked a tab in the popup.
    pub fn handle_switch_to(&mut self, tab: &Tab) {
        self.cancel_auto_switch();
        self.selection_offset = 0;
        self.push_log(format!("switch_to tab {}", tab.id));
        self.activate(tab);
    }

    /// The popup was dismissed without switching.
    pub fn handle_overlay_closed(&mut self) {
        self.cancel_auto_switch();
        self.selection_offset = 0;
    }

    /// A content script reported in from the tab with this identifier.
    pub fn handle_content_started(&mut self, tab_id: TabId) {
        if let Some(tab) = self.registry.find_backward(&|t| t.id == tab_id) {
            self.registry.add_to_initialized(&tab);
        }
    }

    /// A content script went away (navigation, frame teardown).
    pub fn handle_content_stopped(&mut self, tab_id: TabId) {
        self.registry.remove_from_initialized(tab_id);
    }

    /// The settings surface asks for a live preview: show the popup on the
    /// active tab with the candidate settings, without applying them.
    pub fn handle_demo_settings(&mut self, settings: SwitcherSettings) {
        if let Some(active) = self.browser.active_tab() {
            if !active.is_privileged() && self.ensure_initialized(&active) {
                if let Err(e) = self
                    .browser
                    .send_message(active.id, &message::demo_settings(settings))
                {
                    debug!(tab = active.id, error = %e, "demo_settings not delivered");
                }
            }
        }
    }

    /// Full model for the popup's initial render.
    pub fn model(&mut self) -> Response {
        let zoom_factor = match self.browser.active_tab() {
            Some(t) => self.browser.zoom_factor(t.id),
            None => 1.0,
        };
        Response::Model {
            tabs: self.registry.get_tabs_to_show(),
            settings: self.settings.clone(),
            zoom_factor,
        }
    }

    pub fn settings(&self) -> &SwitcherSettings {
        &self.settings
    }

    /// Recent dispatcher activity, for the test-only `get_logs` message.
    pub fn logs(&self) -> Vec<String> {
        self.logs.clone()
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    // ─── Auto-switch timer ───

    /// True while an auto-switch deadline is armed.
    pub fn auto_switch_pending(&self) -> bool {
        self.auto_switch.is_some()
    }

    /// Completes the pending switch once its deadline has passed. Driven by
    /// the event loop's tick; a poll before the deadline does nothing.
    pub fn poll_auto_switch(&mut self, now: Instant) {
        let due = matches!(&self.auto_switch, Some(a) if now >= a.deadline);
        if !due {
            return;
        }
        self.auto_switch = None;

        let shown = self.registry.get_tabs_to_show();
        let offset = std::mem::replace(&mut self.selection_offset, 0);
        if shown.is_empty() {
            return;
        }
        let target = shown[offset.rem_euclid(shown.len() as i32) as usize].clone();
        self.push_log(format!("auto-switch to tab {}", target.id));

        if let Some(active) = self.browser.active_tab() {
            if let Err(e) = self
                .browser
                .send_message(active.id, &message::close_overlay())
            {
                debug!(tab = active.id, error = %e, "close_overlay not delivered");
            }
        }
        self.activate(&target);
    }

    fn schedule_auto_switch(&mut self) {
        // Caller has already canceled any previous deadline.
        let timeout = Duration::from_millis(self.settings.behavior.auto_switching_timeout_ms);
        self.auto_switch = Some(AutoSwitch {
            deadline: Instant::now() + timeout,
        });
    }

    fn cancel_auto_switch(&mut self) {
        self.auto_switch = None;
    }

    // ─── Internals ───

    /// Makes sure the tab carries injected UI code, injecting at most once.
    /// Any failure (tab closed, navigation raced the injection, privileged
    /// context) resolves as "not initialized".
    fn ensure_initialized(&mut self, tab: &Tab) -> bool {
        if self.registry.is_initialized(tab) {
            return true;
        }
        match self.browser.execute_script(tab.id, CONTENT_SCRIPT) {
            Ok(()) => {
                self.registry.add_to_initialized(tab);
                true
            }
            Err(e) => {
                debug!(tab = tab.id, error = %e, "injection failed");
                false
            }
        }
    }

    /// Activates the nearest registry tab that is not `skip_id`.
    fn activate_previous_of(&mut self, skip_id: TabId) {
        if let Some(target) = self.registry.find_backward(&|t| t.id != skip_id) {
            self.activate(&target);
        }
    }

    fn activate(&mut self, tab: &Tab) {
        if let Err(e) = self.browser.focus_window(tab.window_id) {
            warn!(window = tab.window_id, error = %e, "window focus failed");
        }
        if let Err(e) = self.browser.activate_tab(tab.id) {
            warn!(tab = tab.id, error = %e, "tab activation failed");
        }
    }

    fn push_log(&mut self, entry: String) {
        if self.logs.len() == MAX_LOG_ENTRIES {
            self.logs.remove(0);
        }
        self.logs.push(entry);
    }
}
