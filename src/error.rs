//! Error types for the agent console
//!
//! Every failure the console can hit ends up as a `ConsoleError` and is
//! turned into UI-visible state; nothing here is allowed to take the window
//! down.

use thiserror::Error;

/// Agent console errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConsoleError {
    /// Request never produced an HTTP response (connect, timeout, decode)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Backend answered the create request with a non-success status
    #[error("Session creation failed with status {status}")]
    SessionCreate { status: u16 },

    /// Backend answered a state poll with a non-success, non-404 status
    #[error("State fetch failed with status {status}")]
    StateFetch { status: u16 },

    /// Real-time transport failed to connect or disconnect
    #[error("Transport error: {0}")]
    Transport(String),

    /// Audio output device initialization or operation error
    #[error("Audio device error: {0}")]
    AudioDevice(String),

    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote audio could not be converted for playback
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),
}

impl From<reqwest::Error> for ConsoleError {
    fn from(e: reqwest::Error) -> Self {
        ConsoleError::Http(e.to_string())
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(e: std::io::Error) -> Self {
        ConsoleError::Config(e.to_string())
    }
}

impl ConsoleError {
    /// Check if this error is recoverable
    ///
    /// Recoverable errors leave the console usable as-is (the next poll tick
    /// or a manual retry may succeed). Non-recoverable ones need the operator
    /// to change something first.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConsoleError::Http(_) => true,
            ConsoleError::SessionCreate { .. } => true,
            ConsoleError::StateFetch { .. } => true,
            ConsoleError::Transport(_) => true,
            ConsoleError::AudioDevice(_) => false,
            ConsoleError::Config(_) => false,
            ConsoleError::AudioProcessing(_) => false,
        }
    }

    /// Get a user-friendly description of the error
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Http(_) => "Backend unreachable. Check the backend URL.".to_string(),
            ConsoleError::SessionCreate { .. } => {
                "Failed to start session. Check backend logs.".to_string()
            }
            ConsoleError::StateFetch { .. } => {
                "Failed to fetch session state. Retrying.".to_string()
            }
            ConsoleError::Transport(_) => {
                "Voice connection failed. Reset and start a new session.".to_string()
            }
            ConsoleError::AudioDevice(_) => {
                "Audio device error. Please check your speakers.".to_string()
            }
            ConsoleError::Config(_) => "Configuration error. Please check settings.".to_string(),
            ConsoleError::AudioProcessing(_) => {
                "Agent audio could not be played. Audio is muted for this session.".to_string()
            }
        }
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
