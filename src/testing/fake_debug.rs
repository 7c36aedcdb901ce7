use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{DebugEndpoint, TransportError};
use crate::ports::{DebugHost, EndpointProbe};

/// Debug host that records every start request.
#[derive(Clone, Default)]
pub struct RecordingDebugHost {
    endpoints: Arc<Mutex<Vec<DebugEndpoint>>>,
    fail: bool,
}

impl RecordingDebugHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the request, then reports an attach failure.
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.endpoints.lock().unwrap().len()
    }

    pub fn endpoints(&self) -> Vec<DebugEndpoint> {
        self.endpoints.lock().unwrap().clone()
    }
}

#[async_trait]
impl DebugHost for RecordingDebugHost {
    async fn start_debugging(&self, endpoint: &DebugEndpoint) -> Result<(), TransportError> {
        self.endpoints.lock().unwrap().push(endpoint.clone());
        if self.fail {
            return Err(TransportError::Attach {
                endpoint: endpoint.to_string(),
                details: "no debugger".into(),
            });
        }
        Ok(())
    }
}

/// Probe that starts answering after a number of attempts.
#[derive(Clone)]
pub struct FakeProbe {
    answers_from: Option<usize>,
    attempts: Arc<AtomicUsize>,
}

impl FakeProbe {
    pub fn never() -> Self {
        Self { answers_from: None, attempts: Arc::new(AtomicUsize::new(0)) }
    }

    /// Attempt number `attempt` (1-based) and every later one succeed.
    pub fn listening_after(attempt: usize) -> Self {
        Self { answers_from: Some(attempt), attempts: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EndpointProbe for FakeProbe {
    async fn is_listening(&self, _endpoint: &DebugEndpoint) -> bool {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.answers_from.is_some_and(|from| attempt >= from)
    }
}
