//! Console settings: where the backend lives and how often to poll it
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional TOML
//! file named by `AGENT_CONSOLE_CONFIG`, then `NEXT_PUBLIC_BACKEND_URL`.

use crate::config::agent::AgentConfig;
use crate::{ConsoleError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable selecting the backend origin
pub const BACKEND_URL_ENV: &str = "NEXT_PUBLIC_BACKEND_URL";

/// Environment variable pointing at an optional settings file
pub const CONFIG_PATH_ENV: &str = "AGENT_CONSOLE_CONFIG";

/// Backend origin used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Settings for the console itself
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Backend origin, without trailing slash
    pub backend_url: String,
    /// State poll period while a session is active
    pub poll_interval_ms: u64,
    /// Per-request timeout for backend calls
    pub request_timeout_ms: u64,
    /// Play remote agent audio through the default output device
    pub audio_output: bool,
    /// Initial agent configuration shown in the form
    pub agent: AgentConfig,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            poll_interval_ms: 500,
            request_timeout_ms: 10_000,
            audio_output: true,
            agent: AgentConfig::default(),
        }
    }
}

impl ConsoleSettings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load settings using `lookup` for environment variables
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            Some(path) => Self::from_file(path.trim())?,
            None => Self::default(),
        };

        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|u| !u.trim().is_empty()) {
            debug!("Backend URL overridden by {}", BACKEND_URL_ENV);
            settings.backend_url = url;
        }

        settings = settings.normalized();
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ConsoleError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let settings: ConsoleSettings = toml::from_str(&content).map_err(|e| {
            ConsoleError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        info!("Loaded console settings from {}", path.display());
        Ok(settings.normalized())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.is_empty() {
            return Err(ConsoleError::Config("Backend URL is required".to_string()));
        }
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "Backend URL must start with http:// or https://: {}",
                self.backend_url
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConsoleError::Config(
                "Poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.backend_url = self.backend_url.trim().trim_end_matches('/').to_string();
        self.agent = self.agent.clamped();
        self
    }
}
