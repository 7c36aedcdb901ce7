pub mod command_plan;
pub mod debug;
pub mod error;
pub mod mode;
pub mod settings;
pub mod shell;
pub mod target_file;
pub mod tool_paths;

pub use command_plan::{CommandPlan, CommandStep, Invocation, Phase, PlannedCommand};
pub use debug::{DebugEndpoint, DebugSettings, LaunchToken, Readiness, TriggerState};
pub use error::{AppError, BuildError, ConfigError, TransportError};
pub use mode::{LaunchMode, Sequencing};
pub use shell::ShellKind;
pub use target_file::TargetFile;
pub use tool_paths::ToolPaths;
