//! `start` and `debug`: run the toolchain for one source file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::EmbeddedShellTemplates;
use crate::app::config_resolver::{self, ResolvedConfig};
use crate::app::orchestrator::{LaunchOrchestrator, LaunchPorts, LaunchReport};
use crate::domain::target_file::utf8;
use crate::domain::{AppError, LaunchMode, TargetFile, TriggerState};
use crate::ports::{DebugHost, EndpointProbe, SettingsSource, ShellLauncher, StepRunner};

/// One launch request from the host.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Source file to assemble. Relative paths resolve against the workspace.
    pub document: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub mode: LaunchMode,
}

/// A launch whose commands have been handed off.
pub struct StartedLaunch<L, R, H, P>
where
    L: ShellLauncher,
    R: StepRunner,
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    pub report: LaunchReport,
    orchestrator: LaunchOrchestrator<L, R, H, P>,
}

impl<L, R, H, P> StartedLaunch<L, R, H, P>
where
    L: ShellLauncher,
    R: StepRunner,
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    /// Wait for the toolchain to exit, then release everything. Returns the
    /// final debug trigger state.
    pub async fn finish(mut self) -> Result<TriggerState, AppError> {
        let result = self.orchestrator.finish().await;
        self.orchestrator.dispose().await;
        result
    }
}

/// Resolve configuration, then start the launch with ports built for it.
///
/// Nothing is started and `make_ports` is never called when configuration or
/// the request is invalid.
pub async fn start<S, F, L, R, H, P>(
    source: Option<&S>,
    request: &LaunchRequest,
    make_ports: F,
) -> Result<StartedLaunch<L, R, H, P>, AppError>
where
    S: SettingsSource + ?Sized,
    F: FnOnce(&ResolvedConfig) -> LaunchPorts<L, R, H, P>,
    L: ShellLauncher,
    R: StepRunner,
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    let config = config_resolver::resolve(source)?;
    let target = resolve_target(request)?;
    let workspace_root = request.workspace.as_deref().map(utf8).transpose()?;
    let templates = Arc::new(EmbeddedShellTemplates::new()?);

    let ports = make_ports(&config);
    let mut orchestrator = LaunchOrchestrator::new(config, templates, ports);
    if let Some(workspace) = &request.workspace {
        orchestrator = orchestrator.with_working_dir(workspace);
    }

    match orchestrator.launch(target.as_ref(), workspace_root, request.mode).await {
        Ok(report) => Ok(StartedLaunch { report, orchestrator }),
        Err(e) => {
            orchestrator.dispose().await;
            Err(e)
        }
    }
}

fn resolve_target(request: &LaunchRequest) -> Result<Option<TargetFile>, AppError> {
    let Some(document) = &request.document else {
        return Ok(None);
    };
    let base = request.workspace.as_deref().unwrap_or(Path::new("."));
    Ok(Some(TargetFile::from_document(document, base)?))
}
