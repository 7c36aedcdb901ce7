use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{Invocation, TransportError};
use crate::ports::StepRunner;

#[derive(Default)]
struct RunnerLog {
    exit_codes: VecDeque<Option<i32>>,
    ran: Vec<Invocation>,
    launched: Vec<Invocation>,
    terminated: bool,
}

/// Step runner that replays scripted exit codes. Unscripted steps exit 0.
#[derive(Clone, Default)]
pub struct FakeStepRunner {
    log: Arc<Mutex<RunnerLog>>,
}

impl FakeStepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_codes(codes: &[Option<i32>]) -> Self {
        let runner = Self::default();
        runner.log.lock().unwrap().exit_codes = codes.iter().copied().collect();
        runner
    }

    pub fn ran(&self) -> Vec<Invocation> {
        self.log.lock().unwrap().ran.clone()
    }

    pub fn launched(&self) -> Vec<Invocation> {
        self.log.lock().unwrap().launched.clone()
    }

    pub fn was_terminated(&self) -> bool {
        self.log.lock().unwrap().terminated
    }
}

#[async_trait]
impl StepRunner for FakeStepRunner {
    async fn run(&mut self, invocation: &Invocation) -> Result<Option<i32>, TransportError> {
        let mut log = self.log.lock().unwrap();
        log.ran.push(invocation.clone());
        Ok(log.exit_codes.pop_front().unwrap_or(Some(0)))
    }

    async fn launch(&mut self, invocation: &Invocation) -> Result<(), TransportError> {
        let mut log = self.log.lock().unwrap();
        log.launched.push(invocation.clone());
        Ok(())
    }

    async fn wait(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn terminate(&mut self) -> Result<(), TransportError> {
        let mut log = self.log.lock().unwrap();
        log.terminated = true;
        Ok(())
    }
}
