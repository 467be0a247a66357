mod agent;
mod config;
mod controller;
mod logging;
mod tui;

use anyhow::Result;
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use tracing::{error, info};

use crate::agent::AgentClient;
use crate::config::AppConfig;
use crate::controller::ProfileRequestController;
use crate::tui::commands::TuiExecutor;
use crate::tui::profile_view::profile_lines;
use crate::tui::view::TuiApp;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "skillsync",
    version,
    about = "Analyze GitHub developer profiles through an AI agent (TUI/CLI)"
)]
pub struct Cli {
    /// GitHub username to analyze once in plain CLI mode
    pub username: Option<String>,

    /// Use plain CLI mode (disable TUI); requires a username
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_tui: bool,

    /// Orchestrator base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Identifier of the profile-analysis agent
    #[arg(long)]
    pub agent_id: Option<String>,

    /// API key (set via env SKILLSYNC_API_KEY recommended)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;

    let username = cli.username.clone();
    let cfg = AppConfig::from_cli(cli)?;
    info!(base_url=%cfg.base_url, agent_id=%cfg.agent_id, no_tui=cfg.no_tui, "app config");

    match username {
        Some(username) => run_once(cfg, &username).await,
        None if cfg.no_tui => anyhow::bail!("--no-tui requires a username"),
        None => run_tui(cfg),
    }
}

fn run_tui(cfg: AppConfig) -> Result<()> {
    let executor = TuiExecutor::new(cfg)?;
    let mut app = TuiApp::new("SkillSync — Empathize at Scale").with_handler(Box::new(executor));
    app.run()
}

/// One-shot mode: same lifecycle as the TUI, driven to completion inline.
async fn run_once(cfg: AppConfig, username: &str) -> Result<()> {
    let mut ctl = ProfileRequestController::new();
    ctl.username = username.to_string();
    let Some(username) = ctl.submit() else {
        anyhow::bail!(
            ctl.error
                .unwrap_or_else(|| "Please enter a GitHub username".to_string())
        );
    };

    let client = AgentClient::new(cfg.base_url.clone(), cfg.api_key.clone())?
        .with_agent_config(cfg.agent.clone());
    eprintln!("Analyzing GitHub profile for {username}...");

    match client.analyze(&cfg.agent_id, &username).await {
        Ok(envelope) => ctl.complete(envelope),
        Err(e) => {
            error!(err=%e, username=%username, "agent analyze failed");
            ctl.fail_network();
        }
    }

    match ctl.profile.as_ref() {
        Some(profile) => {
            for line in profile_lines(profile) {
                println!("{line}");
            }
            Ok(())
        }
        None => anyhow::bail!(
            ctl.error
                .unwrap_or_else(|| "Failed to analyze profile".to_string())
        ),
    }
}
