pub mod command_dispatcher;
pub mod registry_factory;
pub mod tab_registry;
