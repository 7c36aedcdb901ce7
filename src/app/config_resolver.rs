//! Turns the settings lookup into a typed launch configuration.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::domain::debug::{DEFAULT_DEBUG_DELAY, DEFAULT_POLL_INTERVAL};
use crate::domain::settings::{DEFAULT_SESSION_NAME, keys};
use crate::domain::{
    ConfigError, DebugEndpoint, DebugSettings, Readiness, Sequencing, ShellKind, ToolPaths,
};
use crate::ports::SettingsSource;

/// Session naming and lifetime policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSettings {
    pub name: String,
    pub close_on_exit: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { name: DEFAULT_SESSION_NAME.to_string(), close_on_exit: true }
    }
}

/// Everything a launch needs from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub tool_paths: ToolPaths,
    pub shell: ShellKind,
    pub sequencing: Sequencing,
    pub session: SessionSettings,
    pub debug: DebugSettings,
}

/// Resolve the launch configuration.
///
/// `None` means the lookup capability itself is unavailable.
pub fn resolve<S>(source: Option<&S>) -> Result<ResolvedConfig, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    let source = source.ok_or(ConfigError::MissingConfiguration)?;

    let root_path = [keys::NAME_PATH, keys::TOOL_ROOT_PATH]
        .into_iter()
        .filter_map(|key| source.get(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingRootPath)?;

    let shell = match source.get(keys::SHELL) {
        Some(value) => ShellKind::from_name(&value).ok_or_else(|| {
            invalid(keys::SHELL, &value, "expected one of: posix, cmd, powershell")
        })?,
        None => ShellKind::platform_default(),
    };

    let sequencing = match source.get(keys::SEQUENCING) {
        Some(value) => Sequencing::from_name(&value)
            .ok_or_else(|| invalid(keys::SEQUENCING, &value, "expected 'stream' or 'gated'"))?,
        None => Sequencing::default(),
    };

    let session = resolve_session(source)?;
    let debug = resolve_debug(source)?;
    let tool_paths = ToolPaths::derive(&root_path, shell);

    debug!(
        origin = %source.origin(),
        root = %tool_paths.root_path,
        %shell,
        ?sequencing,
        "resolved launch configuration"
    );

    Ok(ResolvedConfig { tool_paths, shell, sequencing, session, debug })
}

/// Debug handoff settings alone. Needs no tool root path; an unavailable
/// source yields the defaults.
pub fn resolve_debug_settings<S>(source: Option<&S>) -> Result<DebugSettings, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    match source {
        Some(source) => resolve_debug(source),
        None => Ok(DebugSettings::default()),
    }
}

fn resolve_session<S>(source: &S) -> Result<SessionSettings, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    let defaults = SessionSettings::default();
    let name = match source.get(keys::TERMINAL_NAME) {
        Some(value) if value.trim().is_empty() => {
            return Err(invalid(keys::TERMINAL_NAME, &value, "session name must not be empty"));
        }
        Some(value) => value,
        None => defaults.name,
    };
    let close_on_exit = match source.get(keys::TERMINAL_CLOSE_ON_EXIT) {
        Some(value) => parse_bool(keys::TERMINAL_CLOSE_ON_EXIT, &value)?,
        None => defaults.close_on_exit,
    };
    Ok(SessionSettings { name, close_on_exit })
}

fn resolve_debug<S>(source: &S) -> Result<DebugSettings, ConfigError>
where
    S: SettingsSource + ?Sized,
{
    let mut endpoint = DebugEndpoint::default();
    if let Some(host) = source.get(keys::DEBUG_HOST) {
        if host.trim().is_empty() {
            return Err(invalid(keys::DEBUG_HOST, &host, "host must not be empty"));
        }
        endpoint.host = host.trim().to_string();
    }
    if let Some(port) = source.get(keys::DEBUG_PORT) {
        endpoint.port = match port.trim().parse::<u16>() {
            Ok(value) if value > 0 => value,
            _ => return Err(invalid(keys::DEBUG_PORT, &port, "expected a port between 1 and 65535")),
        };
    }

    let delay = match source.get(keys::DEBUG_DELAY_MS) {
        Some(value) => Duration::from_millis(parse_millis(keys::DEBUG_DELAY_MS, &value)?),
        None => DEFAULT_DEBUG_DELAY,
    };

    let interval = match source.get(keys::DEBUG_POLL_INTERVAL_MS) {
        Some(value) => {
            let millis = parse_millis(keys::DEBUG_POLL_INTERVAL_MS, &value)?;
            if millis == 0 {
                return Err(invalid(
                    keys::DEBUG_POLL_INTERVAL_MS,
                    &value,
                    "poll interval must be greater than 0",
                ));
            }
            Duration::from_millis(millis)
        }
        None => DEFAULT_POLL_INTERVAL,
    };

    let readiness = match source.get(keys::DEBUG_READINESS).as_deref().map(str::trim) {
        None | Some("delay") => Readiness::Delay,
        Some("poll") => Readiness::Poll { interval },
        Some(other) => {
            return Err(invalid(keys::DEBUG_READINESS, other, "expected 'delay' or 'poll'"));
        }
    };

    let attach_command =
        source.get(keys::DEBUG_ATTACH_COMMAND).filter(|value| !value.trim().is_empty());

    Ok(DebugSettings { endpoint, delay, readiness, attach_command })
}

fn parse_millis(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| invalid(key, value, "expected milliseconds"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
