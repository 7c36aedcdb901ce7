//! Wires command building, command execution and the debug trigger together.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::EmbeddedShellTemplates;
use crate::app::command_builder;
use crate::app::config_resolver::ResolvedConfig;
use crate::app::debug_coordinator::DebugLaunchCoordinator;
use crate::app::session_registry::{SessionHandle, SessionRegistry};
use crate::domain::{
    AppError, CommandPlan, DebugEndpoint, LaunchMode, LaunchToken, Sequencing, TargetFile,
    TransportError, TriggerState,
};
use crate::ports::{DebugHost, EndpointProbe, ShellLauncher, StepRunner};

/// The ports an orchestrator drives.
pub struct LaunchPorts<L, R, H, P> {
    pub launcher: L,
    pub runner: R,
    pub host: H,
    pub probe: P,
}

/// What a launch did.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchReport {
    pub mode: LaunchMode,
    pub sequencing: Sequencing,
    pub session: Option<SessionHandle>,
    pub commands: Vec<String>,
    pub debug_token: Option<LaunchToken>,
    pub endpoint: DebugEndpoint,
}

/// Runs launches for one resolved configuration and owns everything they start.
pub struct LaunchOrchestrator<L, R, H, P>
where
    L: ShellLauncher,
    R: StepRunner,
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    config: ResolvedConfig,
    templates: Arc<EmbeddedShellTemplates>,
    sessions: SessionRegistry<L>,
    runner: R,
    debugger: DebugLaunchCoordinator<H, P>,
    working_dir: Option<PathBuf>,
}

impl<L, R, H, P> LaunchOrchestrator<L, R, H, P>
where
    L: ShellLauncher,
    R: StepRunner,
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    pub fn new(
        config: ResolvedConfig,
        templates: Arc<EmbeddedShellTemplates>,
        ports: LaunchPorts<L, R, H, P>,
    ) -> Self {
        let debugger =
            DebugLaunchCoordinator::new(ports.host, ports.probe, config.debug.endpoint.clone());
        Self {
            config,
            templates,
            sessions: SessionRegistry::new(ports.launcher),
            runner: ports.runner,
            debugger,
            working_dir: None,
        }
    }

    /// Directory new shell sessions start in.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn trigger_state(&self) -> TriggerState {
        self.debugger.state()
    }

    pub fn describe_endpoint(&self) -> &DebugEndpoint {
        self.debugger.describe_endpoint()
    }

    /// Build the plan for `target` and start it. In debug mode the debug
    /// trigger is armed once every command has been handed off.
    pub async fn launch(
        &mut self,
        target: Option<&TargetFile>,
        workspace_root: Option<&str>,
        mode: LaunchMode,
    ) -> Result<LaunchReport, AppError> {
        let renderer = self.templates.renderer(self.config.shell)?;
        let plan =
            command_builder::build(&renderer, &self.config.tool_paths, target, workspace_root, mode)?;
        let commands: Vec<String> = plan.lines().map(str::to_string).collect();

        let session = match self.config.sequencing {
            Sequencing::Stream => {
                let options = renderer.session_options(
                    &self.config.session.name,
                    self.config.session.close_on_exit,
                    self.working_dir.clone(),
                );
                let handle = self.sessions.get_or_create(&options).await?;
                self.sessions.show(&handle)?;
                self.sessions.send(&handle, plan).await?;
                Some(handle)
            }
            Sequencing::Gated => {
                // The workspace root is present here, the builder rejected the plan otherwise.
                let start_dir = workspace_root.unwrap_or_default();
                run_gated(&mut self.runner, &plan, start_dir).await?;
                None
            }
        };

        let debug_token = mode.is_debug().then(|| {
            self.debugger.schedule_debug_start(self.config.debug.delay, self.config.debug.readiness)
        });

        info!(
            mode = mode.label(),
            sequencing = ?self.config.sequencing,
            commands = commands.len(),
            "launch started"
        );

        Ok(LaunchReport {
            mode,
            sequencing: self.config.sequencing,
            session,
            commands,
            debug_token,
            endpoint: self.debugger.describe_endpoint().clone(),
        })
    }

    /// Wait for everything this orchestrator started to exit.
    ///
    /// A debug trigger still armed when the toolchain ends is cancelled, since
    /// nothing is left to attach to. Returns the final trigger state.
    pub async fn finish(&mut self) -> Result<TriggerState, AppError> {
        match self.config.sequencing {
            Sequencing::Stream => self.sessions.finish().await?,
            Sequencing::Gated => self.runner.wait().await?,
        }

        if let TriggerState::Armed(token) = self.debugger.state() {
            if self.debugger.cancel(token) {
                warn!(%token, "toolchain exited before the debug start fired");
            }
        }
        Ok(self.debugger.state())
    }

    /// Disarm the trigger and terminate everything still running. Idempotent.
    pub async fn dispose(&mut self) {
        self.debugger.dispose();
        self.sessions.dispose().await;
        if let Err(e) = self.runner.terminate().await {
            warn!(error = %e, "failed to terminate launched steps");
        }
    }
}

/// Run every invocation but the last to completion, then launch the last.
async fn run_gated<R: StepRunner>(
    runner: &mut R,
    plan: &CommandPlan,
    start_dir: &str,
) -> Result<(), AppError> {
    let mut invocations = plan.invocations(start_dir);
    let Some(last) = invocations.pop() else {
        return Ok(());
    };

    for invocation in &invocations {
        let code = runner.run(invocation).await?;
        if code != Some(0) {
            return Err(TransportError::StepFailed { command: invocation.display.clone(), code }.into());
        }
    }

    runner.launch(&last).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config_resolver::resolve;
    use crate::testing::{
        FakeProbe, FakeShellLauncher, FakeStepRunner, MemorySettings, RecordingDebugHost,
    };
    use std::path::Path;
    use std::time::Duration;
    use tokio::time::sleep;

    type TestOrchestrator =
        LaunchOrchestrator<FakeShellLauncher, FakeStepRunner, RecordingDebugHost, FakeProbe>;

    struct Fixture {
        launcher: FakeShellLauncher,
        runner: FakeStepRunner,
        host: RecordingDebugHost,
        orchestrator: TestOrchestrator,
    }

    fn fixture(settings: MemorySettings, runner: FakeStepRunner) -> Fixture {
        let config = resolve(Some(&settings)).unwrap();
        let launcher = FakeShellLauncher::new();
        let host = RecordingDebugHost::new();
        let ports = LaunchPorts {
            launcher: launcher.clone(),
            runner: runner.clone(),
            host: host.clone(),
            probe: FakeProbe::never(),
        };
        let templates = Arc::new(EmbeddedShellTemplates::new().unwrap());
        let orchestrator = LaunchOrchestrator::new(config, templates, ports);
        Fixture { launcher, runner, host, orchestrator }
    }

    fn stream_settings() -> MemorySettings {
        MemorySettings::from_pairs(&[("namePath", "/opt/name"), ("shell", "posix")])
    }

    fn main_asm() -> TargetFile {
        TargetFile::from_document(Path::new("/home/u/proj/main.asm"), Path::new("/home/u/proj"))
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn run_streams_six_commands_into_one_session() {
        let mut fx = fixture(stream_settings(), FakeStepRunner::new());

        let report =
            fx.orchestrator.launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::Run).await.unwrap();

        assert_eq!(
            fx.launcher.lines_for("NAME Emulator"),
            vec![
                "cd /opt/name/name-as",
                "cargo build --release",
                "cargo run /opt/name/name-as/configs/default.toml /home/u/proj/main.asm /home/u/proj/main.asm.o --lineinfo",
                "cd /opt/name/name-emu",
                "cargo build --release",
                "cargo run /home/u/proj/main.asm /home/u/proj/main.asm.o /home/u/proj/main.asm.o.li",
            ]
        );
        assert_eq!(fx.launcher.spawn_count(), 1);
        assert!(report.debug_token.is_none());
        assert_eq!(report.session.as_ref().map(SessionHandle::name), Some("NAME Emulator"));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(fx.host.calls(), 0);
        assert_eq!(fx.orchestrator.trigger_state(), TriggerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn run_and_debug_fires_debug_start_once_after_six_seconds() {
        let mut fx = fixture(stream_settings(), FakeStepRunner::new());

        let report = fx
            .orchestrator
            .launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::RunAndDebug)
            .await
            .unwrap();

        let lines = fx.launcher.lines_for("NAME Emulator");
        assert_eq!(
            lines[5],
            "cargo run /home/u/proj/main.asm /home/u/proj/main.asm.o /home/u/proj/main.asm.o.li --debug"
        );
        let token = report.debug_token.unwrap();

        sleep(Duration::from_millis(5999)).await;
        assert_eq!(fx.host.calls(), 0);
        sleep(Duration::from_millis(2)).await;
        assert_eq!(fx.host.calls(), 1);
        assert_eq!(fx.orchestrator.trigger_state(), TriggerState::Fired(token));

        sleep(Duration::from_secs(30)).await;
        assert_eq!(fx.host.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_launches_reuse_the_session() {
        let mut fx = fixture(stream_settings(), FakeStepRunner::new());

        fx.orchestrator.launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::Run).await.unwrap();
        fx.orchestrator.launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::Run).await.unwrap();

        assert_eq!(fx.launcher.spawn_count(), 1);
        assert_eq!(fx.launcher.lines_for("NAME Emulator").len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_target_sends_nothing() {
        let mut fx = fixture(stream_settings(), FakeStepRunner::new());

        let err =
            fx.orchestrator.launch(None, Some("/home/u/proj"), LaunchMode::RunAndDebug).await.unwrap_err();

        assert!(matches!(err, AppError::Build(crate::domain::BuildError::NoActiveEditor)));
        assert_eq!(fx.launcher.spawn_count(), 0);
        assert_eq!(fx.orchestrator.trigger_state(), TriggerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn session_ending_before_trigger_cancels_it() {
        let mut fx = fixture(stream_settings(), FakeStepRunner::new());

        fx.orchestrator
            .launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::RunAndDebug)
            .await
            .unwrap();
        let state = fx.orchestrator.finish().await.unwrap();

        assert_eq!(state, TriggerState::Idle);
        sleep(Duration::from_secs(10)).await;
        assert_eq!(fx.host.calls(), 0);
        assert_eq!(fx.launcher.finished(), vec!["NAME Emulator".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn gated_runs_steps_then_launches_emulator() {
        let settings = stream_settings().with("sequencing", "gated");
        let mut fx = fixture(settings, FakeStepRunner::new());

        let report = fx
            .orchestrator
            .launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::RunAndDebug)
            .await
            .unwrap();

        let ran = fx.runner.ran();
        assert_eq!(ran.len(), 3);
        assert_eq!(ran[0].working_dir, "/opt/name/name-as");
        assert_eq!(ran[0].args, vec!["build", "--release"]);
        assert_eq!(ran[2].working_dir, "/opt/name/name-emu");

        let launched = fx.runner.launched();
        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].working_dir, "/opt/name/name-emu");
        assert_eq!(launched[0].args.last().map(String::as_str), Some("--debug"));

        assert!(report.session.is_none());
        assert_eq!(fx.launcher.spawn_count(), 0);
        assert!(report.debug_token.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn gated_failure_aborts_without_arming_the_trigger() {
        let settings = stream_settings().with("sequencing", "gated");
        let mut fx = fixture(settings, FakeStepRunner::with_exit_codes(&[Some(0), Some(101)]));

        let err = fx
            .orchestrator
            .launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::RunAndDebug)
            .await
            .unwrap_err();

        match err {
            AppError::Transport(TransportError::StepFailed { command, code }) => {
                assert!(command.starts_with("cargo run /opt/name/name-as/configs/default.toml"));
                assert_eq!(code, Some(101));
            }
            other => panic!("expected StepFailed, got {:?}", other),
        }
        assert_eq!(fx.runner.ran().len(), 2);
        assert!(fx.runner.launched().is_empty());
        assert_eq!(fx.orchestrator.trigger_state(), TriggerState::Idle);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(fx.host.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_disarms_and_terminates() {
        let mut fx = fixture(stream_settings(), FakeStepRunner::new());
        fx.orchestrator
            .launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::RunAndDebug)
            .await
            .unwrap();

        fx.orchestrator.dispose().await;
        fx.orchestrator.dispose().await;

        sleep(Duration::from_secs(10)).await;
        assert_eq!(fx.host.calls(), 0);
        assert_eq!(fx.launcher.terminated(), vec!["NAME Emulator".to_string()]);
        assert!(fx.runner.was_terminated());
    }

    #[tokio::test(start_paused = true)]
    async fn custom_session_name_is_used() {
        let settings = stream_settings().with("terminal.name", "Toolchain");
        let mut fx = fixture(settings, FakeStepRunner::new());

        fx.orchestrator.launch(Some(&main_asm()), Some("/home/u/proj"), LaunchMode::Run).await.unwrap();

        let spawns = fx.launcher.spawns();
        assert_eq!(spawns[0].name, "Toolchain");
        assert_eq!(spawns[0].program, "sh");
        assert_eq!(fx.launcher.lines_for("Toolchain").len(), 6);
    }
}
