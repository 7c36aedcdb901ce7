//! Named shell sessions owned by one orchestrator.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{CommandPlan, TransportError};
use crate::ports::{SessionOptions, ShellLauncher, ShellProcess};

/// Handle to a session in a [`SessionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SessionHandle {
    id: u64,
    name: String,
}

impl SessionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

struct SessionEntry {
    handle: SessionHandle,
    close_on_exit: bool,
    process: Box<dyn ShellProcess>,
}

/// Registry of interactive shell sessions, looked up by exact name.
pub struct SessionRegistry<L: ShellLauncher> {
    launcher: L,
    sessions: HashMap<String, SessionEntry>,
    foreground: Option<u64>,
    next_id: u64,
}

impl<L: ShellLauncher> SessionRegistry<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher, sessions: HashMap::new(), foreground: None, next_id: 1 }
    }

    /// Return the open session called `options.name`, starting one if needed.
    ///
    /// A session whose process has exited is replaced when it was opened with
    /// `close_on_exit`; otherwise it is returned as is and `send` reports it closed.
    pub async fn get_or_create(
        &mut self,
        options: &SessionOptions,
    ) -> Result<SessionHandle, TransportError> {
        if let Some(entry) = self.sessions.get_mut(&options.name) {
            if !entry.close_on_exit || entry.process.is_running() {
                return Ok(entry.handle.clone());
            }
            let stale = entry.handle.clone();
            let code = self.close(&stale).await?;
            debug!(session = %options.name, ?code, "dropped exited session");
        }

        let process = self.launcher.open(options).await?;
        let handle = SessionHandle { id: self.next_id, name: options.name.clone() };
        self.next_id += 1;
        info!(session = %handle.name, id = handle.id, program = %options.program, "created session");

        self.sessions.insert(
            options.name.clone(),
            SessionEntry { handle: handle.clone(), close_on_exit: options.close_on_exit, process },
        );
        Ok(handle)
    }

    /// Stream every command of `plan` into the session, in order, without
    /// waiting for any of them to complete.
    pub async fn send(
        &mut self,
        handle: &SessionHandle,
        plan: CommandPlan,
    ) -> Result<(), TransportError> {
        let entry = self.entry_mut(handle)?;
        if !entry.process.is_running() {
            return Err(TransportError::SessionClosed(handle.name.clone()));
        }
        for line in plan.lines() {
            debug!(session = %handle.name, command = %line, "sending command");
            entry.process.send_line(line).await?;
        }
        Ok(())
    }

    /// Bring the session to the foreground. Idempotent.
    pub fn show(&mut self, handle: &SessionHandle) -> Result<(), TransportError> {
        self.entry_mut(handle)?;
        if self.foreground != Some(handle.id) {
            debug!(session = %handle.name, "session moved to foreground");
            self.foreground = Some(handle.id);
        }
        Ok(())
    }

    pub fn foreground(&self) -> Option<&SessionHandle> {
        let id = self.foreground?;
        self.sessions.values().map(|entry| &entry.handle).find(|handle| handle.id == id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Close one session's input, wait for it to exit and forget it.
    pub async fn close(&mut self, handle: &SessionHandle) -> Result<Option<i32>, TransportError> {
        self.entry_mut(handle)?;
        let mut entry = self
            .sessions
            .remove(&handle.name)
            .ok_or_else(|| TransportError::UnknownSession(handle.id))?;
        if self.foreground == Some(handle.id) {
            self.foreground = None;
        }
        entry.process.finish().await
    }

    /// Close every session's input and wait for all of them to exit.
    pub async fn finish(&mut self) -> Result<(), TransportError> {
        let mut names: Vec<String> = self.sessions.keys().cloned().collect();
        names.sort();
        for name in names {
            if let Some(mut entry) = self.sessions.remove(&name) {
                let code = entry.process.finish().await?;
                debug!(session = %name, ?code, "session finished");
            }
        }
        self.foreground = None;
        Ok(())
    }

    /// Kill every session still running and forget them. Idempotent.
    pub async fn dispose(&mut self) {
        for (name, mut entry) in self.sessions.drain() {
            if let Err(e) = entry.process.terminate().await {
                warn!(session = %name, error = %e, "failed to terminate session");
            }
        }
        self.foreground = None;
    }

    fn entry_mut(&mut self, handle: &SessionHandle) -> Result<&mut SessionEntry, TransportError> {
        match self.sessions.get_mut(&handle.name) {
            Some(entry) if entry.handle.id == handle.id => Ok(entry),
            _ => Err(TransportError::UnknownSession(handle.id)),
        }
    }
}
