//! Agent console: configure a voice agent, start a backend session, watch
//! its live state and join its realtime room.

pub mod audio;
pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod transport;
pub mod ui;

pub use backend::{BotState, BotStateReport, HttpBackend, SessionBackend, SessionInfo};
pub use config::{AgentConfig, ConsoleSettings};
pub use error::{ConsoleError, Result};
pub use session::{SessionController, SessionLifecycle};
pub use state::{ConsoleState, SharedConsoleState};
pub use transport::TransportBinder;
