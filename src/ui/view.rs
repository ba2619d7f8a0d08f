//! Display values derived from console state
//!
//! Kept free of egui so the rendering rules can be tested directly.

use crate::backend::{BotState, BotStateReport};
use crate::session::{LifecyclePhase, SessionLifecycle};

/// Style of the bot status dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotStyle {
    Default,
    Listening,
    Thinking,
    Speaking,
}

impl DotStyle {
    pub fn for_state(state: BotState) -> Self {
        match state {
            BotState::Listening => DotStyle::Listening,
            BotState::Thinking => DotStyle::Thinking,
            BotState::Speaking => DotStyle::Speaking,
            _ => DotStyle::Default,
        }
    }
}

/// Bot state panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub state: BotState,
    pub dot: DotStyle,
    pub latency_text: String,
    /// Only present when the bot reports an error
    pub error_text: Option<String>,
}

impl StatusView {
    /// No report yet renders as idle.
    pub fn from_report(report: Option<&BotStateReport>) -> Self {
        let state = report.map(|r| r.state).unwrap_or_default();
        let latency = report
            .and_then(|r| r.round_trip_latency_ms)
            .map(|ms| format!("{}", ms))
            .unwrap_or_else(|| "-".to_string());

        let error_text = (state == BotState::Error).then(|| {
            let message = report
                .and_then(|r| r.error_message.as_deref())
                .filter(|m| !m.is_empty())
                .unwrap_or("Unknown error");
            format!("Error: {}", message)
        });

        Self {
            state,
            dot: DotStyle::for_state(state),
            latency_text: format!("Round Trip Latency: {} ms", latency),
            error_text,
        }
    }
}

/// Start button label and whether it can be clicked
pub fn start_button(session: &SessionLifecycle) -> (&'static str, bool) {
    match session.phase() {
        LifecyclePhase::Creating => ("Starting...", false),
        _ => ("Start Session", true),
    }
}
