//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub workflows: WorkflowsConfig,

    /// Remote tools, keyed by tool name.
    #[serde(default)]
    pub tools: HashMap<String, RemoteToolConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Workflow engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum number of steps of one batch running at the same time.
    #[serde(default = "default_max_concurrent_steps")]
    pub max_concurrent_steps: usize,

    /// Per-step timeout in seconds.
    #[serde(default = "default_step_timeout")]
    pub step_timeout_secs: u64,

    /// Whole-execution timeout in seconds (0 = unlimited).
    #[serde(default)]
    pub workflow_timeout_secs: u64,

    /// Capacity of the progress event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_steps: default_max_concurrent_steps(),
            step_timeout_secs: default_step_timeout(),
            workflow_timeout_secs: 0,
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_max_concurrent_steps() -> usize {
    8
}

fn default_step_timeout() -> u64 {
    300
}

fn default_event_buffer() -> usize {
    256
}

/// Workflow definitions registered at start-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowsConfig {
    /// Files or directories containing `.json` / `.toml` definitions.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

/// A tool served by a remote HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteToolConfig {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_tool_timeout() -> u64 {
    60
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files.
    #[serde(default = "default_log_dir")]
    pub dir: String,

    /// Whether to write log files at all.
    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            file: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    dirs::home_dir()
        .map(|home| home.join(".unified-thinking").join("logs"))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/.unified-thinking/logs".to_string())
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.orchestrator.max_concurrent_steps, 8);
        assert_eq!(config.orchestrator.step_timeout_secs, 300);
        assert_eq!(config.orchestrator.workflow_timeout_secs, 0);
        assert_eq!(config.orchestrator.event_buffer, 256);
        assert!(config.workflows.paths.is_empty());
        assert!(config.tools.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file);
        assert!(config.logging.dir.contains(".unified-thinking"));
    }

    #[test]
    fn test_remote_tool_defaults() {
        let tool: RemoteToolConfig = toml::from_str(r#"url = "http://localhost:9000""#).unwrap();
        assert_eq!(tool.timeout_secs, 60);
        assert!(tool.description.is_none());
        assert!(tool.headers.is_empty());
    }

    #[test]
    fn test_remote_tool_requires_url() {
        let result: Result<RemoteToolConfig, _> = toml::from_str("timeout_secs = 5");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.logging.dir, config.logging.dir);
    }
}
