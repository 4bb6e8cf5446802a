pub mod correlation;
pub mod settings_engine;
pub mod tab_store;
