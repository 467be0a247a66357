mod client;
pub mod types;

use reqwest::StatusCode;

pub use client::*;
pub use types::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentErrorKind {
    RateLimited,
    Server,
    Network,
    Timeout,
    Client,
    Deserialize,
    Unknown,
}

pub fn classify_error(status: Option<StatusCode>, err: &anyhow::Error) -> AgentErrorKind {
    if let Some(st) = status {
        if st == StatusCode::TOO_MANY_REQUESTS {
            return AgentErrorKind::RateLimited;
        }
        if st.is_server_error() {
            return AgentErrorKind::Server;
        }
        if st.is_client_error() {
            return AgentErrorKind::Client;
        }
    }
    if let Some(e) = err.downcast_ref::<reqwest::Error>() {
        if e.is_timeout() {
            return AgentErrorKind::Timeout;
        }
        if e.is_connect() || e.is_body() || e.is_request() {
            return AgentErrorKind::Network;
        }
    }
    AgentErrorKind::Unknown
}
