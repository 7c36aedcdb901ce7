use std::fmt;
use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_DEBUG_HOST: &str = "localhost";
pub const DEFAULT_DEBUG_PORT: u16 = 63321;
pub const DEFAULT_DEBUG_DELAY: Duration = Duration::from_millis(6000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Where the emulator's debug-adapter server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugEndpoint {
    pub host: String,
    pub port: u16,
}

impl Default for DebugEndpoint {
    fn default() -> Self {
        Self { host: DEFAULT_DEBUG_HOST.to_string(), port: DEFAULT_DEBUG_PORT }
    }
}

impl fmt::Display for DebugEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// How the debug start waits for the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Readiness {
    /// Fire once the delay elapses.
    Delay,
    /// Probe the endpoint every `interval`; fire on the first accepted
    /// connection, or when the delay elapses.
    Poll {
        #[serde(with = "millis")]
        interval: Duration,
    },
}

/// Identifies one armed debug trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LaunchToken(pub(crate) u64);

impl fmt::Display for LaunchToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of the debug trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Armed(LaunchToken),
    Fired(LaunchToken),
}

/// Debug handoff settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugSettings {
    pub endpoint: DebugEndpoint,
    #[serde(with = "millis")]
    pub delay: Duration,
    pub readiness: Readiness,
    /// Command template started when debugging should begin.
    pub attach_command: Option<String>,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            endpoint: DebugEndpoint::default(),
            delay: DEFAULT_DEBUG_DELAY,
            readiness: Readiness::Delay,
            attach_command: None,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
