use async_trait::async_trait;

use crate::domain::{DebugEndpoint, TransportError};

/// Port for the "start debugging" action.
#[async_trait]
pub trait DebugHost: Send + Sync {
    async fn start_debugging(&self, endpoint: &DebugEndpoint) -> Result<(), TransportError>;
}

/// Port for checking whether a debug endpoint accepts connections.
#[async_trait]
pub trait EndpointProbe: Send + Sync {
    async fn is_listening(&self, endpoint: &DebugEndpoint) -> bool;
}
