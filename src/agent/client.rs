use anyhow::{Context, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap};
use std::time::Duration;
use tracing::{debug, error};

use crate::agent::types::{AgentEnvelope, AgentRequest};
use crate::agent::{AgentErrorKind, classify_error};
use crate::config::AgentConfig;

#[derive(Debug, Clone)]
pub struct AgentClient {
    pub base_url: String,
    pub api_key: Option<String>,
    inner: reqwest::Client,
    pub agent_cfg: AgentConfig,
}

impl AgentClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let inner = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url: base_url.into(),
            api_key,
            inner,
            agent_cfg: AgentConfig::default(),
        })
    }

    /// Rebuild the underlying reqwest client with the configured timeouts.
    pub fn with_agent_config(mut self, cfg: AgentConfig) -> Self {
        let builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.request_timeout_ms));
        // Keep the existing client if the rebuild fails; it should not in normal cases.
        if let Ok(c) = builder.build() {
            self.inner = c;
        }
        self.agent_cfg = cfg;
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        let mut base = self.base_url.trim_end_matches('/').to_string();
        if let Some(pos) = base.rfind("/v1") {
            base.truncate(pos);
            base = base.trim_end_matches('/').to_string();
        }
        format!("{base}/v1/agents/invoke")
    }

    /// One analysis request, one response envelope. No retries: the caller
    /// surfaces failures to the user instead.
    pub async fn analyze(&self, agent_id: &str, username: &str) -> Result<AgentEnvelope> {
        let url = self.endpoint();
        let req = AgentRequest {
            agent_id: agent_id.to_string(),
            message: username.to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "application/json".parse()?);
        if let Some(key) = &self.api_key {
            headers.insert(AUTHORIZATION, format!("Bearer {key}").parse()?);
        }

        if let Ok(payload) = serde_json::to_string(&req) {
            debug!(payload=%payload, endpoint=%url, timeout_ms=self.agent_cfg.request_timeout_ms, "sending agent invoke payload");
        }

        let resp = match self.inner.post(&url).headers(headers).json(&req).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let err = anyhow::Error::new(e).context("send analyze request");
                error!(kind=?classify_error(None, &err), err=%err, "agent analyze send error");
                return Err(err);
            }
        };

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let e = anyhow::anyhow!("agent error: {} - {}", status, text);
            error!(status=%status.as_u16(), kind=?classify_error(Some(status), &e), body=%text, "agent analyze non-success status");
            return Err(e);
        }

        let text = resp.text().await.context("read agent response body")?;
        debug!("agent analyze response received");
        match serde_json::from_str::<AgentEnvelope>(&text) {
            Ok(envelope) => Ok(envelope),
            Err(e) => {
                error!(kind=?AgentErrorKind::Deserialize, err=%e, "agent analyze deserialize error");
                Err(anyhow::Error::new(e).context("parse agent response"))
            }
        }
    }
}
