use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::debug;

use crate::domain::{Invocation, TransportError};
use crate::ports::StepRunner;

/// Runs plan steps as separate child processes.
///
/// Steps run to completion get no input; a launched step reads this
/// process's stdin, so the user can talk to it.
#[derive(Debug, Default)]
pub struct TokioStepRunner {
    launched: Vec<(String, Child)>,
}

impl TokioStepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn command(invocation: &Invocation, stdin: Stdio) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(stdin)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    fn spawn_error(invocation: &Invocation, e: std::io::Error) -> TransportError {
        TransportError::Spawn {
            session: invocation.display.clone(),
            program: invocation.program.clone(),
            details: e.to_string(),
        }
    }
}

#[async_trait]
impl StepRunner for TokioStepRunner {
    async fn run(&mut self, invocation: &Invocation) -> Result<Option<i32>, TransportError> {
        debug!(command = %invocation.display, cwd = %invocation.working_dir, "running step");
        let status = Self::command(invocation, Stdio::null())
            .status()
            .await
            .map_err(|e| Self::spawn_error(invocation, e))?;
        Ok(status.code())
    }

    async fn launch(&mut self, invocation: &Invocation) -> Result<(), TransportError> {
        debug!(command = %invocation.display, cwd = %invocation.working_dir, "launching step");
        let child = Self::command(invocation, Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::spawn_error(invocation, e))?;
        self.launched.push((invocation.display.clone(), child));
        Ok(())
    }

    async fn wait(&mut self) -> Result<(), TransportError> {
        for (name, mut child) in self.launched.drain(..) {
            let status = child
                .wait()
                .await
                .map_err(|e| TransportError::Wait { name: name.clone(), details: e.to_string() })?;
            debug!(command = %name, code = ?status.code(), "step exited");
        }
        Ok(())
    }

    async fn terminate(&mut self) -> Result<(), TransportError> {
        for (name, mut child) in self.launched.drain(..) {
            if matches!(child.try_wait(), Ok(None)) {
                child
                    .kill()
                    .await
                    .map_err(|e| TransportError::Wait { name, details: e.to_string() })?;
            }
        }
        Ok(())
    }
}
