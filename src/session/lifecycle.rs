//! Session lifecycle state machine
//!
//! Pure state: no I/O, no timers. The async driver in
//! [`controller`](super::controller) feeds it backend results and it decides
//! what the console shows.
//!
//! ```text
//! Idle --start--> Creating --ok--> Active --404 / reset--> Idle
//!                    |                ^  \
//!                    +--fail--> Idle  |   +-- poll ok / transient failure
//!                                     +------+
//! ```

use crate::backend::{BotStateReport, PollOutcome, SessionInfo};
use crate::ConsoleError;
use std::fmt;

/// Message shown when a poll reports the session gone
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired — click Start Session again.";

/// Message shown when session creation fails
pub const CREATE_FAILED_MESSAGE: &str = "Failed to start session. Check backend logs.";

/// Lifecycle phase derived from the session fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// No session
    Idle,
    /// Create request in flight
    Creating,
    /// Session identifiers held; polling runs
    Active,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::Idle => write!(f, "Idle"),
            LifecyclePhase::Creating => write!(f, "Creating"),
            LifecyclePhase::Active => write!(f, "Active"),
        }
    }
}

/// Whether the poll loop should keep going after applying a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Continue,
    Stop,
}

/// Identifies one create attempt so late answers for abandoned attempts are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateAttempt(u64);

/// State of one session attempt and its latest poll result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionLifecycle {
    session: Option<SessionInfo>,
    creating: Option<CreateAttempt>,
    next_attempt: u64,
    /// Latest poll result, if any for the current session
    pub report: Option<BotStateReport>,
    /// "Session expired" text, set on 404
    pub expiry_message: Option<String>,
    /// Creation failure text, kept until the next start
    pub create_error: Option<String>,
    /// Last transient poll failure, cleared by the next good poll
    pub last_poll_error: Option<String>,
}

impl SessionLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LifecyclePhase {
        if self.creating.is_some() {
            LifecyclePhase::Creating
        } else if self.session.is_some() {
            LifecyclePhase::Active
        } else {
            LifecyclePhase::Idle
        }
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.session_id.as_str())
    }

    pub fn is_creating(&self) -> bool {
        self.creating.is_some()
    }

    /// Room URL and token for the transport, if a session is held
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.session
            .as_ref()
            .map(|s| (s.room_url.as_str(), s.token.as_str()))
    }

    // === Transitions ===

    /// Start a create attempt. Returns `None` if one is already in flight.
    pub fn begin_create(&mut self) -> Option<CreateAttempt> {
        if self.creating.is_some() {
            return None;
        }
        self.next_attempt += 1;
        let attempt = CreateAttempt(self.next_attempt);
        self.creating = Some(attempt);
        self.create_error = None;
        Some(attempt)
    }

    /// Apply a successful create response.
    ///
    /// Returns false when the attempt was abandoned (reset while in flight);
    /// the response is then ignored.
    pub fn apply_created(&mut self, attempt: CreateAttempt, info: SessionInfo) -> bool {
        if self.creating != Some(attempt) {
            return false;
        }
        self.creating = None;
        self.session = Some(info);
        self.report = None;
        self.expiry_message = None;
        self.create_error = None;
        self.last_poll_error = None;
        true
    }

    /// Apply a failed create. Any previously held session stays as it was.
    pub fn apply_create_failed(&mut self, attempt: CreateAttempt, _error: &ConsoleError) -> bool {
        if self.creating != Some(attempt) {
            return false;
        }
        self.creating = None;
        self.create_error = Some(CREATE_FAILED_MESSAGE.to_string());
        true
    }

    /// Apply the result of a poll issued for `session_id`.
    pub fn apply_poll(
        &mut self,
        session_id: &str,
        outcome: crate::Result<PollOutcome>,
    ) -> PollControl {
        if self.session_id() != Some(session_id) {
            return PollControl::Stop;
        }

        match outcome {
            Ok(PollOutcome::State(report)) => {
                self.report = Some(report);
                self.last_poll_error = None;
                PollControl::Continue
            }
            Ok(PollOutcome::Expired) => {
                self.session = None;
                self.expiry_message = Some(SESSION_EXPIRED_MESSAGE.to_string());
                self.report = Some(BotStateReport::idle());
                self.last_poll_error = None;
                PollControl::Stop
            }
            Err(e) => {
                self.last_poll_error = Some(e.to_string());
                PollControl::Continue
            }
        }
    }

    /// Drop the session and any expiry message, abandoning an in-flight
    /// create. Safe to call in any phase, any number of times.
    pub fn reset(&mut self) {
        self.session = None;
        self.creating = None;
        self.report = None;
        self.expiry_message = None;
        self.last_poll_error = None;
    }
}
