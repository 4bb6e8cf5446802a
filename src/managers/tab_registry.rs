//! Recency-ordered tab history for the switcher popup.
//!
//! The backing sequence is ordered oldest-active-first: the most recently
//! activated tab is always last. Only the *display* is capped by
//! `number_of_tabs_to_show`; the history itself is unbounded. A side-table
//! tracks which tabs already carry injected UI code so injection happens at
//! most once per tab.

use std::collections::HashSet;

use crate::types::tab::{SavedTab, Tab, TabId};

/// Callback invoked with the persisted order after every mutation that
/// changes it. Wired by the registry factory to the durable tab store.
/// Single-threaded by design: the registry lives on the background event
/// loop and is never shared across threads.
pub type UpdateCallback = Box<dyn FnMut(&[SavedTab])>;

/// Trait defining the tab registry interface.
///
/// All operations are total over the current state: absent identifiers are
/// no-ops or `None` results, never errors.
pub trait TabRegistryTrait {
    fn push(&mut self, tab: Tab);
    fn push_under_top(&mut self, tab: Tab);
    fn remove(&mut self, id: TabId);
    fn update(&mut self, tab: Tab);
    fn get_tabs(&self) -> Vec<Tab>;
    fn get_tabs_to_show(&self) -> Vec<Tab>;
    fn get_active(&self) -> Option<Tab>;
    fn get_previously_active(&self) -> Option<Tab>;
    fn find_backward(&self, predicate: &dyn Fn(&Tab) -> bool) -> Option<Tab>;
    fn add_to_initialized(&mut self, tab: &Tab);
    fn remove_from_initialized(&mut self, id: TabId);
    fn is_initialized(&self, tab: &Tab) -> bool;
    fn set_number_of_tabs_to_show(&mut self, n: usize);
    fn tab_count(&self) -> usize;
    fn to_saved(&self) -> Vec<SavedTab>;
}

/// In-memory tab registry owned by the background process.
pub struct TabRegistry {
    tabs: Vec<Tab>,
    initialized: HashSet<TabId>,
    number_of_tabs_to_show: usize,
    on_update: Option<UpdateCallback>,
}

impl TabRegistry {
    pub fn new(number_of_tabs_to_show: usize) -> Self {
        Self {
            tabs: Vec::new(),
            initialized: HashSet::new(),
            number_of_tabs_to_show,
            on_update: None,
        }
    }

    /// Registers the persistence callback. Replaces any previous one.
    pub fn set_on_update(&mut self, callback: UpdateCallback) {
        self.on_update = Some(callback);
    }

    fn find_index(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn notify_update(&mut self) {
        if let Some(cb) = self.on_update.as_mut() {
            let saved: Vec<SavedTab> = self.tabs.iter().map(SavedTab::from).collect();
            cb(&saved);
        }
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new(crate::types::settings::BehaviorSettings::default().number_of_tabs_to_show)
    }
}

impl TabRegistryTrait for TabRegistry {
    /// Appends `tab` as most-recently-active, removing any existing record
    /// with the same identifier first. History is not truncated here.
    fn push(&mut self, tab: Tab) {
        if let Some(idx) = self.find_index(tab.id) {
            self.tabs.remove(idx);
        }
        self.tabs.push(tab);
        self.notify_update();
    }

    /// Inserts a newly created but non-active tab just below the current top,
    /// so a background-opened tab lands in history without displacing the
    /// active tab from the most-recent slot.
    fn push_under_top(&mut self, tab: Tab) {
        if let Some(idx) = self.find_index(tab.id) {
            self.tabs.remove(idx);
        }
        let insert_at = self.tabs.len().saturating_sub(1);
        self.tabs.insert(insert_at, tab);
        self.notify_update();
    }

    /// Deletes the record with that identifier and clears its initialization
    /// flag. No-op if absent.
    fn remove(&mut self, id: TabId) {
        self.initialized.remove(&id);
        if let Some(idx) = self.find_index(id) {
            self.tabs.remove(idx);
            self.notify_update();
        }
    }

    /// Replaces the record matching `tab.id` with the new snapshot (title,
    /// URL, favicon refresh after navigation) without changing its position.
    fn update(&mut self, tab: Tab) {
        if let Some(idx) = self.find_index(tab.id) {
            self.tabs[idx] = tab;
            self.notify_update();
        }
    }

    /// Full ordered history, oldest-active-first. Defensive copy.
    fn get_tabs(&self) -> Vec<Tab> {
        self.tabs.clone()
    }

    /// The last `number_of_tabs_to_show` entries, reversed so the most
    /// recently active tab comes first — the order the popup renders.
    fn get_tabs_to_show(&self) -> Vec<Tab> {
        let skip = self.tabs.len().saturating_sub(self.number_of_tabs_to_show);
        self.tabs[skip..].iter().rev().cloned().collect()
    }

    fn get_active(&self) -> Option<Tab> {
        self.tabs.last().cloned()
    }

    fn get_previously_active(&self) -> Option<Tab> {
        self.tabs.iter().rev().nth(1).cloned()
    }

    /// Scans from most-recent to least-recent, returning the first match.
    fn find_backward(&self, predicate: &dyn Fn(&Tab) -> bool) -> Option<Tab> {
        self.tabs.iter().rev().find(|t| predicate(t)).cloned()
    }

    fn add_to_initialized(&mut self, tab: &Tab) {
        self.initialized.insert(tab.id);
    }

    fn remove_from_initialized(&mut self, id: TabId) {
        self.initialized.remove(&id);
    }

    fn is_initialized(&self, tab: &Tab) -> bool {
        self.initialized.contains(&tab.id)
    }

    /// Updates the display cap live (settings change).
    fn set_number_of_tabs_to_show(&mut self, n: usize) {
        self.number_of_tabs_to_show = n;
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// The persisted order: one simplified snapshot per tab, oldest first.
    fn to_saved(&self) -> Vec<SavedTab> {
        self.tabs.iter().map(SavedTab::from).collect()
    }
}
