//! `endpoint`: where the emulator's debug adapter listens.

use serde::Serialize;

use crate::app::config_resolver;
use crate::domain::{AppError, DebugEndpoint};
use crate::ports::{EndpointProbe, SettingsSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointReport {
    pub endpoint: DebugEndpoint,
    /// Whether the endpoint accepted a connection; `None` when not probed.
    pub listening: Option<bool>,
}

pub async fn execute<S, P>(source: Option<&S>, probe: Option<&P>) -> Result<EndpointReport, AppError>
where
    S: SettingsSource + ?Sized,
    P: EndpointProbe,
{
    let endpoint = config_resolver::resolve_debug_settings(source)?.endpoint;
    let listening = match probe {
        Some(probe) => Some(probe.is_listening(&endpoint).await),
        None => None,
    };
    Ok(EndpointReport { endpoint, listening })
}
