use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://agents.skillsync.dev/v1";

/// Opaque identifier of the profile-analysis agent on the orchestrator.
pub const DEFAULT_AGENT_ID: &str = "6966b2f01f8ceefab631347f";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub agent_id: String,
    pub no_tui: bool,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            // Profile analysis walks a whole GitHub account; allow it time.
            request_timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub agent_id: Option<String>,
    pub agent: Option<PartialAgentConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PartialAgentConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Resolution order per field: CLI flag, environment, config file, default.
    pub fn from_cli(cli: crate::Cli) -> Result<Self> {
        let file_cfg = load_file_config().unwrap_or_default();

        let api_key = cli
            .api_key
            .or_else(|| std::env::var("SKILLSYNC_API_KEY").ok())
            .or(file_cfg.api_key);
        let base_url = cli
            .base_url
            .or_else(|| std::env::var("SKILLSYNC_BASE_URL").ok())
            .or(file_cfg.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let agent_id = cli
            .agent_id
            .or_else(|| std::env::var("SKILLSYNC_AGENT_ID").ok())
            .or(file_cfg.agent_id)
            .unwrap_or_else(|| DEFAULT_AGENT_ID.to_string());

        let defaults = AgentConfig::default();
        let agent = match file_cfg.agent {
            Some(p) => AgentConfig {
                connect_timeout_ms: p.connect_timeout_ms.unwrap_or(defaults.connect_timeout_ms),
                request_timeout_ms: p.request_timeout_ms.unwrap_or(defaults.request_timeout_ms),
            },
            None => defaults,
        };

        Ok(Self {
            base_url,
            api_key,
            agent_id,
            no_tui: cli.no_tui,
            agent,
        })
    }
}

pub fn load_file_config() -> Result<FileConfig> {
    use std::env;
    use std::path::PathBuf;

    fn candidate_paths() -> Vec<PathBuf> {
        let mut v = Vec::new();
        if let Ok(p) = env::var("SKILLSYNC_CONFIG") {
            v.push(PathBuf::from(p));
        }
        if let Ok(xdg_home) = env::var("XDG_CONFIG_HOME") {
            v.push(Path::new(&xdg_home).join("skillsync/config.toml"));
        } else if let Ok(home) = env::var("HOME") {
            v.push(Path::new(&home).join(".config/skillsync/config.toml"));
        }
        if let Ok(dirs) = env::var("XDG_CONFIG_DIRS") {
            for d in dirs.split(':') {
                if !d.is_empty() {
                    v.push(Path::new(d).join("skillsync/config.toml"));
                }
            }
        }
        v
    }

    for p in candidate_paths() {
        if p.exists() {
            match read_config_file(&p) {
                Ok(cfg) => {
                    info!(path=%p.display(), "loaded config file");
                    return Ok(cfg);
                }
                Err(e) => {
                    warn!(path=%p.display(), error=%e.to_string(), "parse config failed");
                    continue;
                }
            }
        }
    }
    Ok(FileConfig::default())
}

pub fn read_config_file(path: &Path) -> Result<FileConfig> {
    let s =
        fs::read_to_string(path).with_context(|| format!("read config file: {}", path.display()))?;
    toml::from_str::<FileConfig>(&s)
        .with_context(|| format!("parse config file: {}", path.display()))
}
