//! Session backend contract
//!
//! The backend issues sessions and reports the bot's coarse state. Only its
//! HTTP contract matters here:
//!
//! - `POST /sessions` with the agent config, answering `{session_id, room_url, token}`
//! - `GET /sessions/{id}/state`, where 404 means the session is gone
//! - `GET /health`

mod http;

pub use http::HttpBackend;

use crate::config::AgentConfig;
use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifiers of one live session. All three exist together or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub room_url: String,
    pub token: String,
}

/// Coarse bot state as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum BotState {
    #[default]
    Idle,
    Listening,
    Thinking,
    Speaking,
    Error,
    /// Anything the backend sends that we don't know
    Unknown,
}

impl BotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotState::Idle => "idle",
            BotState::Listening => "listening",
            BotState::Thinking => "thinking",
            BotState::Speaking => "speaking",
            BotState::Error => "error",
            BotState::Unknown => "unknown",
        }
    }
}

/// Null or empty means idle.
impl From<Option<String>> for BotState {
    fn from(s: Option<String>) -> Self {
        match s.as_deref().unwrap_or("") {
            "" | "idle" => BotState::Idle,
            "listening" => BotState::Listening,
            "thinking" => BotState::Thinking,
            "speaking" => BotState::Speaking,
            "error" => BotState::Error,
            _ => BotState::Unknown,
        }
    }
}

impl From<BotState> for String {
    fn from(state: BotState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for BotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One state poll result
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BotStateReport {
    #[serde(default)]
    pub state: BotState,
    #[serde(default)]
    pub round_trip_latency_ms: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl BotStateReport {
    /// Report shown for the tick on which a session expired
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Outcome of a state poll that got an answer the controller acts on
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// 2xx with a state payload
    State(BotStateReport),
    /// 404: the backend no longer knows this session
    Expired,
}

/// The backend service the console talks to
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Create a session for `config`. Any non-success answer is an error.
    async fn create_session(&self, config: &AgentConfig) -> Result<SessionInfo>;

    /// Fetch the bot state of `session_id`.
    ///
    /// 404 is `Ok(PollOutcome::Expired)`; every other non-success status is
    /// `Err(ConsoleError::StateFetch)`.
    async fn fetch_state(&self, session_id: &str) -> Result<PollOutcome>;

    /// Whether the backend answers its health probe
    async fn health(&self) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_deserializes_without_error_message() {
        let report: BotStateReport =
            serde_json::from_str(r#"{"state":"speaking","round_trip_latency_ms":120}"#).unwrap();
        assert_eq!(report.state, BotState::Speaking);
        assert_eq!(report.round_trip_latency_ms, Some(120.0));
        assert_eq!(report.error_message, None);
    }

    #[test]
    fn test_report_with_null_latency() {
        let report: BotStateReport = serde_json::from_str(
            r#"{"state":"error","round_trip_latency_ms":null,"error_message":"ASR timeout"}"#,
        )
        .unwrap();
        assert_eq!(report.state, BotState::Error);
        assert_eq!(report.round_trip_latency_ms, None);
        assert_eq!(report.error_message.as_deref(), Some("ASR timeout"));
    }

    #[test]
    fn test_unknown_state_string() {
        let report: BotStateReport = serde_json::from_str(r#"{"state":"dreaming"}"#).unwrap();
        assert_eq!(report.state, BotState::Unknown);
    }

    #[test]
    fn test_missing_or_null_state_is_idle() {
        for body in [
            r#"{"round_trip_latency_ms":80}"#,
            r#"{"state":null,"round_trip_latency_ms":80}"#,
            r#"{"state":"","round_trip_latency_ms":80}"#,
        ] {
            let report: BotStateReport = serde_json::from_str(body).unwrap();
            assert_eq!(report.state, BotState::Idle, "body: {}", body);
            assert_eq!(report.round_trip_latency_ms, Some(80.0));
        }
    }

    #[test]
    fn test_idle_report() {
        let report = BotStateReport::idle();
        assert_eq!(report.state, BotState::Idle);
        assert!(report.round_trip_latency_ms.is_none());
        assert!(report.error_message.is_none());
    }
}
