use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::TransportError;
use crate::ports::{SessionOptions, ShellLauncher, ShellProcess};

#[derive(Default)]
struct ShellLog {
    spawns: Vec<SessionOptions>,
    lines: HashMap<String, Vec<String>>,
    exited: HashSet<String>,
    finished: Vec<String>,
    terminated: Vec<String>,
}

/// Launcher whose sessions only record what they are sent.
#[derive(Clone, Default)]
pub struct FakeShellLauncher {
    log: Arc<Mutex<ShellLog>>,
    fail: bool,
}

impl FakeShellLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `open` fails with a spawn error.
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn spawn_count(&self) -> usize {
        self.log.lock().unwrap().spawns.len()
    }

    pub fn spawns(&self) -> Vec<SessionOptions> {
        self.log.lock().unwrap().spawns.clone()
    }

    pub fn lines_for(&self, name: &str) -> Vec<String> {
        self.log.lock().unwrap().lines.get(name).cloned().unwrap_or_default()
    }

    /// Total lines sent across all sessions.
    pub fn line_count(&self) -> usize {
        self.log.lock().unwrap().lines.values().map(Vec::len).sum()
    }

    /// Simulate the session's process exiting on its own.
    pub fn exit_session(&self, name: &str) {
        self.log.lock().unwrap().exited.insert(name.to_string());
    }

    pub fn finished(&self) -> Vec<String> {
        self.log.lock().unwrap().finished.clone()
    }

    pub fn terminated(&self) -> Vec<String> {
        self.log.lock().unwrap().terminated.clone()
    }
}

#[async_trait]
impl ShellLauncher for FakeShellLauncher {
    async fn open(&self, options: &SessionOptions) -> Result<Box<dyn ShellProcess>, TransportError> {
        if self.fail {
            return Err(TransportError::Spawn {
                session: options.name.clone(),
                program: options.program.clone(),
                details: "spawn refused".into(),
            });
        }
        let mut log = self.log.lock().unwrap();
        log.spawns.push(options.clone());
        log.exited.remove(&options.name);
        Ok(Box::new(FakeShellProcess { name: options.name.clone(), log: Arc::clone(&self.log) }))
    }
}

struct FakeShellProcess {
    name: String,
    log: Arc<Mutex<ShellLog>>,
}

#[async_trait]
impl ShellProcess for FakeShellProcess {
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut log = self.log.lock().unwrap();
        if log.exited.contains(&self.name) {
            return Err(TransportError::SessionClosed(self.name.clone()));
        }
        log.lines.entry(self.name.clone()).or_default().push(line.to_string());
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        !self.log.lock().unwrap().exited.contains(&self.name)
    }

    async fn finish(&mut self) -> Result<Option<i32>, TransportError> {
        let mut log = self.log.lock().unwrap();
        log.finished.push(self.name.clone());
        log.exited.insert(self.name.clone());
        Ok(Some(0))
    }

    async fn terminate(&mut self) -> Result<(), TransportError> {
        let mut log = self.log.lock().unwrap();
        if log.exited.insert(self.name.clone()) {
            log.terminated.push(self.name.clone());
        }
        Ok(())
    }
}
