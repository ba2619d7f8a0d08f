//! Async driver for the session lifecycle
//!
//! `SessionController` owns the two network activities: the create request
//! and the fixed-interval state poll. Both run as tasks on a tokio runtime so
//! the UI thread never waits on the backend. Results are applied to
//! [`SessionLifecycle`](super::SessionLifecycle) under the shared state lock.
//!
//! Polling is tied to session-id identity: starting a new session or
//! resetting aborts the previous poll task, and every result is checked
//! against the current id before it is applied.

use super::lifecycle::{CreateAttempt, PollControl};
use crate::backend::{PollOutcome, SessionBackend};
use crate::config::AgentConfig;
use crate::state::{BackendHealth, SharedConsoleState};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

struct PollTask {
    session_id: String,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Tasks {
    create: Option<JoinHandle<()>>,
    poll: Option<PollTask>,
}

/// Drives session creation, polling and reset
#[derive(Clone)]
pub struct SessionController {
    shared: SharedConsoleState,
    backend: Arc<dyn SessionBackend>,
    runtime: Handle,
    poll_interval: Duration,
    tasks: Arc<Mutex<Tasks>>,
}

impl SessionController {
    pub fn new(
        shared: SharedConsoleState,
        backend: Arc<dyn SessionBackend>,
        runtime: Handle,
        poll_interval: Duration,
    ) -> Self {
        Self {
            shared,
            backend,
            runtime,
            poll_interval,
            tasks: Arc::new(Mutex::new(Tasks::default())),
        }
    }

    pub fn state(&self) -> &SharedConsoleState {
        &self.shared
    }

    /// Start a session with the current config.
    ///
    /// Returns false if a create request is already in flight.
    pub fn start_session(&self) -> bool {
        let (attempt, config) = {
            let mut state = self.shared.write();
            match state.session.begin_create() {
                Some(attempt) => {
                    state.log("Starting session");
                    (attempt, state.config.clone())
                }
                None => {
                    debug!("[SESSION] Create already in flight, ignoring start");
                    return false;
                }
            }
        };

        info!("[SESSION] Creating session");
        let this = self.clone();
        let handle = self
            .runtime
            .spawn(async move { this.run_create(attempt, config).await });
        self.tasks.lock().create = Some(handle);
        true
    }

    async fn run_create(&self, attempt: CreateAttempt, config: AgentConfig) {
        match self.backend.create_session(&config).await {
            Ok(session) => {
                let session_id = session.session_id.clone();
                let applied = {
                    let mut state = self.shared.write();
                    let applied = state.session.apply_created(attempt, session);
                    if applied {
                        state.log(format!("Session {} started", session_id));
                    }
                    applied
                };

                if applied {
                    info!("[SESSION] Session {} active", session_id);
                    self.start_polling(session_id);
                } else {
                    debug!(
                        "[SESSION] Dropping create result {} for abandoned attempt",
                        session_id
                    );
                }
            }
            Err(e) => {
                warn!("[SESSION] Session creation failed: {}", e);
                let mut state = self.shared.write();
                if state.session.apply_create_failed(attempt, &e) {
                    state.log(format!("Session creation failed: {}", e));
                }
            }
        }
    }

    fn start_polling(&self, session_id: String) {
        let mut tasks = self.tasks.lock();
        if let Some(old) = tasks.poll.take() {
            debug!("[POLL] Cancelling poll loop for {}", old.session_id);
            old.handle.abort();
        }

        if self.shared.session_id().as_deref() != Some(session_id.as_str()) {
            debug!("[POLL] Session {} no longer current, not polling", session_id);
            return;
        }

        let handle = self.runtime.spawn(poll_loop(
            self.shared.clone(),
            Arc::clone(&self.backend),
            session_id.clone(),
            self.poll_interval,
        ));
        tasks.poll = Some(PollTask { session_id, handle });
    }

    /// Drop the current session and stop all session work. Idempotent.
    pub fn reset_session(&self) {
        {
            let mut tasks = self.tasks.lock();
            if let Some(create) = tasks.create.take() {
                create.abort();
            }
            if let Some(poll) = tasks.poll.take() {
                debug!("[POLL] Cancelling poll loop for {}", poll.session_id);
                poll.handle.abort();
            }
        }

        let mut state = self.shared.write();
        let had_session = state.session.session().is_some() || state.session.is_creating();
        state.session.reset();
        if had_session {
            info!("[SESSION] Session reset");
            state.log("Session reset");
        }
    }

    /// Probe the backend health endpoint in the background
    pub fn check_backend(&self) {
        self.shared.write().backend_health = BackendHealth::Checking;

        let shared = self.shared.clone();
        let backend = Arc::clone(&self.backend);
        self.runtime.spawn(async move {
            let health = match backend.health().await {
                Ok(true) => BackendHealth::Reachable,
                Ok(false) => BackendHealth::Unreachable,
                Err(e) => {
                    warn!("[BACKEND] Health probe failed: {}", e);
                    BackendHealth::Unreachable
                }
            };
            info!("[BACKEND] Backend {}", health);
            let mut state = shared.write();
            state.backend_health = health;
            state.log(format!("Backend {}", health));
        });
    }

    /// Session id the poll loop is currently running for
    pub fn polling_session(&self) -> Option<String> {
        self.tasks
            .lock()
            .poll
            .as_ref()
            .filter(|p| !p.handle.is_finished())
            .map(|p| p.session_id.clone())
    }

    /// Abort every background task
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock();
        if let Some(create) = tasks.create.take() {
            create.abort();
        }
        if let Some(poll) = tasks.poll.take() {
            poll.handle.abort();
        }
    }
}

async fn poll_loop(
    shared: SharedConsoleState,
    backend: Arc<dyn SessionBackend>,
    session_id: String,
    period: Duration,
) {
    debug!("[POLL] Polling {} every {:?}", session_id, period);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let outcome = backend.fetch_state(&session_id).await;

        let control = {
            let mut state = shared.write();
            if state.session.session_id() == Some(session_id.as_str()) {
                match &outcome {
                    Ok(PollOutcome::Expired) => {
                        info!("[POLL] Session {} expired", session_id);
                        state.log(format!("Session {} expired", session_id));
                    }
                    Err(e) if state.session.last_poll_error.is_none() => {
                        warn!("[POLL] State fetch for {} failed: {}", session_id, e);
                        state.log(format!("State fetch failed: {}", e));
                    }
                    Err(e) => debug!("[POLL] State fetch for {} failed: {}", session_id, e),
                    Ok(PollOutcome::State(_)) => {}
                }
            }
            state.session.apply_poll(&session_id, outcome)
        };

        if control == PollControl::Stop {
            debug!("[POLL] Poll loop for {} finished", session_id);
            break;
        }
    }
}
