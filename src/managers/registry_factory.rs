//! Builds the initial tab registry by reconciling two partially-trusted
//! sources: the browser's current open-tab snapshot (authoritative for
//! existence and the active flag, arbitrary order) and the previously
//! persisted tab order (authoritative for relative recency, but may name
//! tabs that no longer exist).
//!
//! Matching is by title, not identifier — identifiers do not survive a
//! browser restart. Distinct pages can share a title; when that happens the
//! stable sorts keep the colliding tabs in input order rather than guessing.

use crate::managers::tab_registry::{TabRegistry, TabRegistryTrait, UpdateCallback};
use crate::types::settings::SwitcherSettings;
use crate::types::tab::{SavedTab, Tab};

/// Reconciles `open_tabs` against `saved_tabs` and returns a populated
/// registry with the persistence callback wired, so every later mutation
/// writes the new order back to durable storage.
pub fn build_tab_registry(
    open_tabs: Vec<Tab>,
    saved_tabs: &[SavedTab],
    settings: &SwitcherSettings,
    on_update: Option<UpdateCallback>,
) -> TabRegistry {
    let ordered = reconcile_order(open_tabs, saved_tabs);

    let mut registry = TabRegistry::new(settings.behavior.number_of_tabs_to_show);
    for tab in ordered {
        registry.push(tab);
    }
    // Wired after the initial fill: startup reconstruction is not a user
    // mutation and must not rewrite storage with a partial order.
    if let Some(cb) = on_update {
        registry.set_on_update(cb);
    }
    registry
}

/// Applies the saved relative order to the open-tab list, then forces the
/// active tab into the most-recent slot.
///
/// For each saved tab, in saved order, the open list is stably partitioned so
/// tabs with a matching title sort after non-matching ones. Repeating this for
/// every saved tab reconstructs the saved relative order among the survivors;
/// the final pass moves the active tab last because activity supersedes any
/// saved ordering. Every sort is stable, so ties keep their input order.
fn reconcile_order(mut open_tabs: Vec<Tab>, saved_tabs: &[SavedTab]) -> Vec<Tab> {
    for saved in saved_tabs {
        open_tabs.sort_by_key(|tab| tab.title == saved.title);
    }
    open_tabs.sort_by_key(|tab| tab.active);
    open_tabs
}
