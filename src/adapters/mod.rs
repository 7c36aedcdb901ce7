//! Adapters implementing the ports against the real system.

pub mod catalogs;
pub mod debug_attach;
pub mod process_runner;
pub mod settings_files;
pub mod shell_process;

pub use catalogs::EmbeddedShellTemplates;
pub use debug_attach::{CommandDebugHost, TcpEndpointProbe};
pub use process_runner::TokioStepRunner;
pub use settings_files::FileSettingsSource;
pub use shell_process::TokioShellLauncher;
