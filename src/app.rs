//! App Core for tabswitch.
//!
//! Central struct holding the durable pieces of the background process —
//! database, settings engine, saved-order store — and the startup wiring
//! that reconciles persisted state into a live tab registry.

use std::sync::Arc;

use tracing::warn;

use crate::database::connection::Database;
use crate::managers::registry_factory::build_tab_registry;
use crate::managers::tab_registry::TabRegistry;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::tab_store::{TabStore, TabStoreTrait};
use crate::types::tab::Tab;

/// Central application struct for the background process.
///
/// The tab registry itself is not stored here: it is built once per process
/// lifetime by [`App::build_registry`] and handed to the command dispatcher,
/// which owns it exclusively from then on. The host browser may unload the
/// background process at any time; on the next start the registry is rebuilt
/// from the browser's open-tab snapshot and the saved order.
pub struct App {
    pub db: Arc<Database>,
    pub settings_engine: SettingsEngine,
    pub tab_store: TabStore,
}

impl App {
    /// Creates a new App: opens the database and the settings engine.
    ///
    /// `settings_path_override` is used by tests; production passes `None`
    /// and gets the platform config path.
    pub fn new(
        db_path: &str,
        settings_path_override: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);
        let tab_store = TabStore::new(db.clone());
        let settings_engine = SettingsEngine::new(settings_path_override);

        Ok(Self {
            db,
            settings_engine,
            tab_store,
        })
    }

    /// Startup sequence: load settings from disk (defaults when absent).
    pub fn startup(&mut self) {
        if let Err(e) = self.settings_engine.load() {
            warn!(error = %e, "settings load failed, keeping defaults");
        }
    }

    /// Builds the tab registry from the browser's current open-tab snapshot
    /// and the previously saved order, with persistence wired so every later
    /// mutation writes the new order back.
    pub fn build_registry(&self, open_tabs: Vec<Tab>) -> TabRegistry {
        let saved = match self.tab_store.load_order() {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, "saved tab order unavailable, starting empty");
                Vec::new()
            }
        };

        let store = self.tab_store.clone();
        build_tab_registry(
            open_tabs,
            &saved,
            self.settings_engine.get_settings(),
            Some(Box::new(move |tabs| {
                if let Err(e) = store.save_order(tabs) {
                    warn!(error = %e, "failed to persist tab order");
                }
            })),
        )
    }
}
