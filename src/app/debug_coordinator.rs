//! One-shot "start debugging" trigger for the emulator's debug adapter.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::domain::{DebugEndpoint, LaunchToken, Readiness, TriggerState};
use crate::ports::{DebugHost, EndpointProbe};

/// Arms, fires and cancels the debug start.
///
/// At most one trigger is armed at a time. Scheduling while armed replaces the
/// previous trigger, so the host action runs at most once per armed token.
pub struct DebugLaunchCoordinator<H, P>
where
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    host: Arc<H>,
    probe: Arc<P>,
    endpoint: DebugEndpoint,
    state: Arc<Mutex<TriggerState>>,
    armed: Option<JoinHandle<()>>,
    next_token: u64,
}

impl<H, P> DebugLaunchCoordinator<H, P>
where
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    pub fn new(host: H, probe: P, endpoint: DebugEndpoint) -> Self {
        Self {
            host: Arc::new(host),
            probe: Arc::new(probe),
            endpoint,
            state: Arc::new(Mutex::new(TriggerState::Idle)),
            armed: None,
            next_token: 1,
        }
    }

    /// Arm the trigger. Must be called from within a tokio runtime.
    pub fn schedule_debug_start(&mut self, delay: Duration, readiness: Readiness) -> LaunchToken {
        if let Some(previous) = self.armed.take() {
            previous.abort();
        }

        let token = LaunchToken(self.next_token);
        self.next_token += 1;
        *lock(&self.state) = TriggerState::Armed(token);
        info!(%token, endpoint = %self.endpoint, delay_ms = delay.as_millis() as u64, "debug start armed");

        let trigger = Trigger {
            host: Arc::clone(&self.host),
            probe: Arc::clone(&self.probe),
            endpoint: self.endpoint.clone(),
            state: Arc::clone(&self.state),
            token,
        };
        self.armed = Some(tokio::spawn(trigger.run(delay, readiness)));
        token
    }

    /// Disarm `token` if it has not fired yet. Returns whether it was disarmed.
    pub fn cancel(&mut self, token: LaunchToken) -> bool {
        let mut state = lock(&self.state);
        if *state != TriggerState::Armed(token) {
            return false;
        }
        *state = TriggerState::Idle;
        drop(state);

        if let Some(task) = self.armed.take() {
            task.abort();
        }
        info!(%token, "debug start cancelled");
        true
    }

    pub fn state(&self) -> TriggerState {
        *lock(&self.state)
    }

    pub fn describe_endpoint(&self) -> &DebugEndpoint {
        &self.endpoint
    }

    /// Abort any armed trigger. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(task) = self.armed.take() {
            task.abort();
        }
        let mut state = lock(&self.state);
        if let TriggerState::Armed(token) = *state {
            debug!(%token, "debug start disposed");
            *state = TriggerState::Idle;
        }
    }
}

impl<H, P> Drop for DebugLaunchCoordinator<H, P>
where
    H: DebugHost + 'static,
    P: EndpointProbe + 'static,
{
    fn drop(&mut self) {
        self.dispose();
    }
}

struct Trigger<H, P> {
    host: Arc<H>,
    probe: Arc<P>,
    endpoint: DebugEndpoint,
    state: Arc<Mutex<TriggerState>>,
    token: LaunchToken,
}

impl<H: DebugHost, P: EndpointProbe> Trigger<H, P> {
    async fn run(self, delay: Duration, readiness: Readiness) {
        match readiness {
            Readiness::Delay => sleep(delay).await,
            Readiness::Poll { interval } => self.poll_until_ready(delay, interval).await,
        }

        {
            let mut state = lock(&self.state);
            if *state != TriggerState::Armed(self.token) {
                return;
            }
            *state = TriggerState::Fired(self.token);
        }

        info!(token = %self.token, endpoint = %self.endpoint, "starting debugger");
        if let Err(e) = self.host.start_debugging(&self.endpoint).await {
            warn!(token = %self.token, error = %e, "debug start failed");
        }
    }

    /// Returns once the endpoint accepts a connection or `delay` has elapsed.
    async fn poll_until_ready(&self, delay: Duration, interval: Duration) {
        let deadline = Instant::now() + delay;
        loop {
            if self.probe.is_listening(&self.endpoint).await {
                debug!(token = %self.token, "debug endpoint is listening");
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                debug!(token = %self.token, "debug endpoint never answered, using fixed delay");
                return;
            }
            sleep(interval.min(deadline - now)).await;
        }
    }
}

fn lock(state: &Mutex<TriggerState>) -> MutexGuard<'_, TriggerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
