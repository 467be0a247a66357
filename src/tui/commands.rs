use anyhow::Result;
use tracing::error;

use crate::agent::AgentClient;
use crate::config::AppConfig;
use crate::controller::STEP_ADVANCE_INTERVAL;
use crate::tui::view::TuiApp;

pub trait CommandHandler {
    fn handle(&mut self, line: &str, ui: &mut TuiApp);
}

pub struct TuiExecutor {
    pub(crate) cfg: AppConfig,
    pub(crate) client: AgentClient,
    pub(crate) ui_tx: Option<std::sync::mpsc::Sender<String>>,
}

impl TuiExecutor {
    pub fn new(cfg: AppConfig) -> Result<Self> {
        let client = AgentClient::new(cfg.base_url.clone(), cfg.api_key.clone())?
            .with_agent_config(cfg.agent.clone());
        Ok(Self {
            cfg,
            client,
            ui_tx: None,
        })
    }
}

impl CommandHandler for TuiExecutor {
    fn handle(&mut self, line: &str, ui: &mut TuiApp) {
        if self.ui_tx.is_none() {
            self.ui_tx = ui.sender();
        }
        let line = line.trim();
        match line {
            "/reset" => ui.controller.reset(),
            _ if line.starts_with('/') => {
                // Unknown slash command; not a username, nothing to do.
            }
            _ => {
                // Validation happens in the controller; an empty buffer sets
                // the inline error and never reaches the network.
                let Some(username) = ui.controller.submit() else {
                    return;
                };
                let client = self.client.clone();
                let agent_id = self.cfg.agent_id.clone();
                let tx = self.ui_tx.clone();
                let rt = tokio::runtime::Handle::current();
                rt.spawn(async move {
                    // The ticker lives inside this select loop: when the call
                    // resolves the loop breaks and the ticker is dropped with
                    // it, so it stops exactly once, before the outcome is sent.
                    let mut ticker = tokio::time::interval(STEP_ADVANCE_INTERVAL);
                    ticker.tick().await; // first tick completes immediately
                    let call = client.analyze(&agent_id, &username);
                    tokio::pin!(call);
                    let outcome = loop {
                        tokio::select! {
                            res = &mut call => break res,
                            _ = ticker.tick() => {
                                if let Some(tx) = &tx {
                                    let _ = tx.send("::progress:tick".into());
                                }
                            }
                        }
                    };
                    let Some(tx) = tx else { return };
                    match outcome {
                        Ok(envelope) => match serde_json::to_string(&envelope) {
                            Ok(js) => {
                                let _ = tx.send(format!("::result:{js}"));
                            }
                            Err(e) => {
                                error!(err=%e, "serialize agent envelope");
                                let _ = tx.send("::status:error".into());
                            }
                        },
                        Err(e) => {
                            error!(err=%e, username=%username, "agent analyze failed");
                            let _ = tx.send("::status:error".into());
                        }
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::types::AgentEnvelope;
    use crate::config::AgentConfig;
    use crate::controller::RequestState;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use std::time::Duration;

    fn test_config(base_url: String) -> AppConfig {
        AppConfig {
            base_url,
            api_key: None,
            agent_id: "agent-1".into(),
            no_tui: false,
            agent: AgentConfig::default(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn submit_dispatches_call_and_reports_result() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/agents/invoke")).respond_with(
                json_encoded(serde_json::json!({
                    "success": true,
                    "response": {"result": {"developer_summary": "summary"}}
                })),
            ),
        );

        let mut app = TuiApp::new("test");
        let rx = app.inbox_rx.take().unwrap();
        let mut executor = TuiExecutor::new(test_config(server.url_str(""))).unwrap();

        app.controller.username = "torvalds".into();
        executor.handle("torvalds", &mut app);
        assert_eq!(app.controller.state, RequestState::Loading);

        // Any ticks arrive strictly before the outcome on the same channel.
        let result = loop {
            let msg = tokio::task::block_in_place(|| rx.recv_timeout(Duration::from_secs(5)))
                .expect("worker message");
            if let Some(js) = msg.strip_prefix("::result:") {
                break js.to_string();
            }
            assert_eq!(msg, "::progress:tick");
        };
        let envelope: AgentEnvelope = serde_json::from_str(&result).unwrap();
        assert!(envelope.success);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn transport_failure_reports_error_status() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/agents/invoke"))
                .respond_with(status_code(502).body("bad gateway")),
        );

        let mut app = TuiApp::new("test");
        let rx = app.inbox_rx.take().unwrap();
        let mut executor = TuiExecutor::new(test_config(server.url_str(""))).unwrap();

        app.controller.username = "torvalds".into();
        executor.handle("torvalds", &mut app);

        let msg = loop {
            let msg = tokio::task::block_in_place(|| rx.recv_timeout(Duration::from_secs(5)))
                .expect("worker message");
            if msg != "::progress:tick" {
                break msg;
            }
        };
        assert_eq!(msg, "::status:error");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_submit_never_touches_the_network() {
        let mut app = TuiApp::new("test");
        let rx = app.inbox_rx.take().unwrap();
        // Unroutable base URL: any request would fail loudly rather than pass.
        let mut executor = TuiExecutor::new(test_config("http://127.0.0.1:1".into())).unwrap();

        executor.handle("   ", &mut app);
        assert_eq!(app.controller.state, RequestState::Idle);
        assert_eq!(
            app.controller.error.as_deref(),
            Some("Please enter a GitHub username")
        );
        // No task was spawned, so nothing ever lands in the inbox.
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
