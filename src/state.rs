//! Shared console state
//!
//! This module provides the thread-safe state shared by:
//! - **SessionController**: writes lifecycle transitions from backend results
//! - **UI**: reads a snapshot every frame, writes config edits
//! - **TransportBinder** (via the UI loop): mirrors the connection phase
//!
//! Writers hold the lock only for the duration of one transition.

use crate::config::AgentConfig;
use crate::session::SessionLifecycle;
use chrono::{DateTime, Local};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Activity log capacity
const MAX_ACTIVITY_ENTRIES: usize = 100;

/// Result of the backend health probe
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendHealth {
    #[default]
    Unknown,
    Checking,
    Reachable,
    Unreachable,
}

impl fmt::Display for BackendHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendHealth::Unknown => write!(f, "unknown"),
            BackendHealth::Checking => write!(f, "checking"),
            BackendHealth::Reachable => write!(f, "reachable"),
            BackendHealth::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// One line of the activity log
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Bounded log of recent lifecycle events shown in the activity panel
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, message: impl Into<String>) {
        if self.entries.len() >= MAX_ACTIVITY_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(ActivityEntry {
            at: Local::now(),
            message: message.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ActivityEntry> {
        self.entries.back()
    }
}

/// Everything the console renders
#[derive(Clone, Debug, PartialEq)]
pub struct ConsoleState {
    /// Agent configuration being edited
    pub config: AgentConfig,
    /// Session lifecycle and latest poll result
    pub session: SessionLifecycle,
    /// Real-time connection phase, display only
    pub transport_state: String,
    /// Audio output status line, display only
    pub audio_status: Option<String>,
    /// Backend health probe result
    pub backend_health: BackendHealth,
    /// Backend origin, display only
    pub backend_url: String,
    /// Recent events
    pub activity: ActivityLog,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl ConsoleState {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            session: SessionLifecycle::new(),
            transport_state: "idle".to_string(),
            audio_status: None,
            backend_health: BackendHealth::Unknown,
            backend_url: String::new(),
            activity: ActivityLog::default(),
        }
    }

    pub fn log(&mut self, message: impl Into<String>) {
        self.activity.push(message);
    }
}

/// Thread-safe shared console state
///
/// This wraps `ConsoleState` in `Arc<RwLock<>>` for access from the UI
/// thread and the tokio tasks.
#[derive(Clone, Default)]
pub struct SharedConsoleState {
    inner: Arc<RwLock<ConsoleState>>,
}

impl SharedConsoleState {
    pub fn new(state: ConsoleState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Get a read lock on the state
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, ConsoleState> {
        self.inner.read()
    }

    /// Get a write lock on the state
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, ConsoleState> {
        self.inner.write()
    }

    /// Get a copy of the current state (no lock held after return)
    pub fn snapshot(&self) -> ConsoleState {
        self.inner.read().clone()
    }

    // === Convenience read methods ===

    pub fn session_id(&self) -> Option<String> {
        self.inner.read().session.session_id().map(str::to_string)
    }

    pub fn is_creating(&self) -> bool {
        self.inner.read().session.is_creating()
    }

    pub fn config(&self) -> AgentConfig {
        self.inner.read().config.clone()
    }
}
