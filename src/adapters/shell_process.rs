use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};
use tracing::{debug, warn};

use crate::domain::TransportError;
use crate::ports::{SessionOptions, ShellLauncher, ShellProcess};

/// Starts interactive shells as child processes sharing this terminal.
///
/// Commands are written to the shell's input. Once the launch is finished the
/// user's own input is forwarded after them, so programs started by the shell
/// can read from the terminal.
#[derive(Debug, Clone, Default)]
pub struct TokioShellLauncher;

impl TokioShellLauncher {
    pub fn new() -> Self {
        Self
    }

    fn spawn(&self, options: &SessionOptions) -> Result<TokioShellProcess, TransportError> {
        let mut command = Command::new(&options.program);
        command
            .args(&options.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &options.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| TransportError::Spawn {
            session: options.name.clone(),
            program: options.program.clone(),
            details: e.to_string(),
        })?;
        let stdin = child.stdin.take();
        debug!(session = %options.name, pid = ?child.id(), "shell process started");

        Ok(TokioShellProcess {
            name: options.name.clone(),
            line_ending: options.line_ending.clone(),
            child,
            stdin,
        })
    }
}

#[async_trait]
impl ShellLauncher for TokioShellLauncher {
    async fn open(&self, options: &SessionOptions) -> Result<Box<dyn ShellProcess>, TransportError> {
        Ok(Box::new(self.spawn(options)?))
    }
}

struct TokioShellProcess {
    name: String,
    line_ending: String,
    child: Child,
    stdin: Option<ChildStdin>,
}

impl TokioShellProcess {
    fn write_error(&self, details: impl ToString) -> TransportError {
        TransportError::Write { session: self.name.clone(), details: details.to_string() }
    }

    fn wait_error(&self, details: impl ToString) -> TransportError {
        TransportError::Wait { name: self.name.clone(), details: details.to_string() }
    }

    /// Forward `input` to the shell until it ends or the shell exits, then wait.
    async fn finish_with_input<R>(&mut self, mut input: R) -> Result<Option<i32>, TransportError>
    where
        R: AsyncRead + Unpin + Send,
    {
        if let Ok(Some(status)) = self.child.try_wait() {
            self.stdin.take();
            return Ok(status.code());
        }

        if let Some(mut stdin) = self.stdin.take() {
            let forward = async move {
                let copied = tokio::io::copy(&mut input, &mut stdin).await;
                // Dropping stdin sends EOF, so the shell exits after its last command.
                drop(stdin);
                copied
            };
            tokio::select! {
                biased;
                status = self.child.wait() => {
                    let status = status.map_err(|e| self.wait_error(e))?;
                    debug!(session = %self.name, code = ?status.code(), "shell process exited");
                    return Ok(status.code());
                }
                copied = forward => match copied {
                    Ok(bytes) => debug!(session = %self.name, bytes, "input closed"),
                    Err(e) => warn!(session = %self.name, error = %e, "failed to forward input"),
                },
            }
        }

        let status = self.child.wait().await.map_err(|e| self.wait_error(e))?;
        debug!(session = %self.name, code = ?status.code(), "shell process exited");
        Ok(status.code())
    }
}

#[async_trait]
impl ShellProcess for TokioShellProcess {
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        let payload = format!("{}{}", line, self.line_ending);
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TransportError::SessionClosed(self.name.clone()));
        };
        if let Err(e) = stdin.write_all(payload.as_bytes()).await {
            return Err(self.write_error(e));
        }
        if let Err(e) = stdin.flush().await {
            return Err(self.write_error(e));
        }
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    async fn finish(&mut self) -> Result<Option<i32>, TransportError> {
        self.finish_with_input(tokio::io::stdin()).await
    }

    async fn terminate(&mut self) -> Result<(), TransportError> {
        self.stdin.take();
        if !self.is_running() {
            return Ok(());
        }
        self.child.kill().await.map_err(|e| self.wait_error(e))
    }
}
