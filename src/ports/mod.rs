mod debug_host;
mod settings_source;
mod shell_session;
mod step_runner;

pub use debug_host::{DebugHost, EndpointProbe};
pub use settings_source::SettingsSource;
pub use shell_session::{SessionOptions, ShellLauncher, ShellProcess};
pub use step_runner::StepRunner;
