//! reqwest implementation of [`SessionBackend`]

use super::{BotStateReport, PollOutcome, SessionBackend, SessionInfo};
use crate::config::AgentConfig;
use crate::{ConsoleError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

/// HTTP client for the session backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }
}

#[async_trait]
impl SessionBackend for HttpBackend {
    async fn create_session(&self, config: &AgentConfig) -> Result<SessionInfo> {
        let url = format!("{}/sessions", self.base_url);
        info!("[BACKEND] Creating session via {}", url);

        let resp = self.http.post(&url).json(config).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!("[BACKEND] Session creation answered {}", status);
            return Err(ConsoleError::SessionCreate {
                status: status.as_u16(),
            });
        }

        let session = resp.json::<SessionInfo>().await?;
        Ok(session)
    }

    async fn fetch_state(&self, session_id: &str) -> Result<PollOutcome> {
        let url = format!("{}/sessions/{}/state", self.base_url, session_id);

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(PollOutcome::Expired);
        }
        if !status.is_success() {
            debug!("[BACKEND] State fetch for {} answered {}", session_id, status);
            return Err(ConsoleError::StateFetch {
                status: status.as_u16(),
            });
        }

        let report = resp.json::<BotStateReport>().await?;
        Ok(PollOutcome::State(report))
    }

    async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.http.get(&url).send().await?;
        Ok(resp.status().is_success())
    }
}
