use async_trait::async_trait;

use crate::domain::{Invocation, TransportError};

/// Port for running plan steps as individual processes.
#[async_trait]
pub trait StepRunner: Send {
    /// Run to completion and return the exit code (`None` when killed by a signal).
    async fn run(&mut self, invocation: &Invocation) -> Result<Option<i32>, TransportError>;

    /// Start without waiting. The runner keeps track of the process.
    async fn launch(&mut self, invocation: &Invocation) -> Result<(), TransportError>;

    /// Wait for every launched process to exit.
    async fn wait(&mut self) -> Result<(), TransportError>;

    /// Kill every launched process that is still running.
    async fn terminate(&mut self) -> Result<(), TransportError>;
}
