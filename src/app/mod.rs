pub mod api;
pub mod cli;
pub mod command_builder;
pub mod commands;
pub mod config_resolver;
pub mod debug_coordinator;
pub mod observability;
pub mod orchestrator;
pub mod session_registry;
