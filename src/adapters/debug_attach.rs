use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use minijinja::{Environment, UndefinedBehavior, context};
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::{DebugEndpoint, ShellKind, TransportError};
use crate::ports::{DebugHost, EndpointProbe};

/// Starts debugging by running the user's attach command, or by telling the
/// user where the debug adapter listens when no command is configured.
#[derive(Debug, Clone)]
pub struct CommandDebugHost {
    attach_command: Option<String>,
    shell: ShellKind,
}

impl CommandDebugHost {
    pub fn new(attach_command: Option<String>, shell: ShellKind) -> Self {
        Self { attach_command, shell }
    }

    /// Render the attach command for `endpoint`. `{{ host }}` and `{{ port }}` are available.
    pub fn render_command(
        template: &str,
        endpoint: &DebugEndpoint,
    ) -> Result<String, TransportError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.render_str(template, context! { host => &endpoint.host, port => endpoint.port })
            .map_err(|e| TransportError::Attach {
                endpoint: endpoint.to_string(),
                details: format!("invalid attach command template: {}", e),
            })
    }
}

#[async_trait]
impl DebugHost for CommandDebugHost {
    async fn start_debugging(&self, endpoint: &DebugEndpoint) -> Result<(), TransportError> {
        let Some(template) = &self.attach_command else {
            info!(%endpoint, "debug start requested without an attach command");
            println!("🐞 Debug adapter expected at {}; attach your debugger now", endpoint);
            return Ok(());
        };

        let command_line = Self::render_command(template, endpoint)?;
        let (program, flags) = self.shell.one_shot();
        let attach_error = |details: String| TransportError::Attach {
            endpoint: endpoint.to_string(),
            details,
        };
        let mut child = Command::new(program)
            .args(flags)
            .arg(&command_line)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| attach_error(e.to_string()))?;
        info!(pid = ?child.id(), command = %command_line, "debugger started");

        let status = child.wait().await.map_err(|e| attach_error(e.to_string()))?;
        if !status.success() {
            return Err(attach_error(format!("'{}' failed with {}", command_line, status)));
        }
        debug!(command = %command_line, "debugger exited");
        Ok(())
    }
}

/// Checks an endpoint by opening (and immediately dropping) a TCP connection.
#[derive(Debug, Clone)]
pub struct TcpEndpointProbe {
    connect_timeout: Duration,
}

impl TcpEndpointProbe {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for TcpEndpointProbe {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[async_trait]
impl EndpointProbe for TcpEndpointProbe {
    async fn is_listening(&self, endpoint: &DebugEndpoint) -> bool {
        let address = (endpoint.host.as_str(), endpoint.port);
        matches!(
            tokio::time::timeout(self.connect_timeout, TcpStream::connect(address)).await,
            Ok(Ok(_))
        )
    }
}
