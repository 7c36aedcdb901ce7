//! API Facade for the application.
//!
//! Glues settings loading, the real adapters and command execution together.
//! The `*_at` variants take the workspace explicitly; the others use the
//! current directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::adapters::{
    CommandDebugHost, FileSettingsSource, TcpEndpointProbe, TokioShellLauncher, TokioStepRunner,
};
use crate::app::commands::{config, endpoint, launch, plan};
use crate::app::config_resolver::ResolvedConfig;
use crate::app::orchestrator::LaunchPorts;
use crate::domain::settings::keys;

pub use crate::app::commands::config::ConfigReport;
pub use crate::app::commands::endpoint::EndpointReport;
pub use crate::app::commands::launch::{LaunchRequest, StartedLaunch};
pub use crate::app::commands::plan::{PlanFormat, PlanOutput, PlanRequest};
pub use crate::app::orchestrator::LaunchReport;
pub use crate::domain::{AppError, LaunchMode, ShellKind, TriggerState};

/// A launch driving real processes.
pub type SystemLaunch =
    StartedLaunch<TokioShellLauncher, TokioStepRunner, CommandDebugHost, TcpEndpointProbe>;

/// Load the user and workspace settings files, with `name_path` overriding both.
pub fn load_settings(
    workspace: Option<&Path>,
    name_path: Option<&str>,
) -> Result<Option<FileSettingsSource>, AppError> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut overrides = BTreeMap::new();
    if let Some(name_path) = name_path {
        overrides.insert(keys::NAME_PATH.to_string(), name_path.to_string());
    }
    FileSettingsSource::load(workspace, home.as_deref(), overrides)
}

fn system_ports(
    config: &ResolvedConfig,
) -> LaunchPorts<TokioShellLauncher, TokioStepRunner, CommandDebugHost, TcpEndpointProbe> {
    LaunchPorts {
        launcher: TokioShellLauncher::new(),
        runner: TokioStepRunner::new(),
        host: CommandDebugHost::new(config.debug.attach_command.clone(), config.shell),
        probe: TcpEndpointProbe::default(),
    }
}

/// Start the toolchain for `document` in `workspace`.
pub async fn launch_at(
    workspace: PathBuf,
    document: Option<PathBuf>,
    mode: LaunchMode,
    name_path: Option<&str>,
) -> Result<SystemLaunch, AppError> {
    let settings = load_settings(Some(&workspace), name_path)?;
    let request = LaunchRequest { document, workspace: Some(workspace), mode };
    launch::start(settings.as_ref(), &request, system_ports).await
}

/// Build the command plan without running anything.
pub fn plan_at(
    workspace: PathBuf,
    document: Option<PathBuf>,
    mode: LaunchMode,
    shell: Option<ShellKind>,
    name_path: Option<&str>,
) -> Result<PlanOutput, AppError> {
    let settings = load_settings(Some(&workspace), name_path)?;
    let request = PlanRequest { document, workspace: Some(workspace), mode, shell };
    plan::execute(settings.as_ref(), &request)
}

/// Write the workspace settings file in the current directory.
pub fn config_init(name_path: &str, shell: Option<ShellKind>) -> Result<PathBuf, AppError> {
    config_init_at(&std::env::current_dir()?, name_path, shell)
}

/// Write the workspace settings file under `workspace`.
pub fn config_init_at(
    workspace: &Path,
    name_path: &str,
    shell: Option<ShellKind>,
) -> Result<PathBuf, AppError> {
    config::init(workspace, name_path, shell)
}

/// Resolve the configuration that a launch in `workspace` would use.
pub fn config_show_at(workspace: &Path, name_path: Option<&str>) -> Result<ConfigReport, AppError> {
    let settings = load_settings(Some(workspace), name_path)?;
    config::show(settings.as_ref())
}

/// Describe the debug endpoint, probing it when `check` is set.
pub async fn endpoint_at(workspace: &Path, check: bool) -> Result<EndpointReport, AppError> {
    let settings = load_settings(Some(workspace), None)?;
    let probe = check.then(TcpEndpointProbe::default);
    endpoint::execute(settings.as_ref(), probe.as_ref()).await
}
