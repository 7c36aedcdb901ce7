use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::TransportError;

/// How a new interactive shell session is started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Session name used for lookup.
    pub name: String,
    pub program: String,
    pub args: Vec<String>,
    /// Terminator appended to every line sent to the shell.
    pub line_ending: String,
    /// Drop the session from its registry once the process has exited.
    pub close_on_exit: bool,
    pub working_dir: Option<PathBuf>,
}

/// Port for starting interactive shell processes.
#[async_trait]
pub trait ShellLauncher: Send + Sync {
    async fn open(&self, options: &SessionOptions) -> Result<Box<dyn ShellProcess>, TransportError>;
}

/// A running interactive shell that reads commands from its input.
#[async_trait]
pub trait ShellProcess: Send {
    /// Write one command line. Does not wait for the command to run.
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Whether the shell process is still alive.
    fn is_running(&mut self) -> bool;

    /// Close the shell's input and wait for it to exit. Returns the exit code.
    async fn finish(&mut self) -> Result<Option<i32>, TransportError>;

    /// Kill the shell if it is still running.
    async fn terminate(&mut self) -> Result<(), TransportError>;
}
