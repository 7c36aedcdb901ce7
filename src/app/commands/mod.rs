pub mod config;
pub mod endpoint;
pub mod launch;
pub mod plan;
