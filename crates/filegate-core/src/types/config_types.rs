//! Gateway configuration types

use crate::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TOOL_PROGRAM: &str = "osc";
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;

/// External removal tool invocation settings
///
/// The tool is expected to accept `[--config <path>] rm -f <filename>` and
/// to record the removal in its own bookkeeping in addition to deleting the
/// file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalToolConfig {
    pub program: String,
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_tool_timeout_secs() -> u64 {
    DEFAULT_TOOL_TIMEOUT_SECS
}

impl Default for RemovalToolConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_TOOL_PROGRAM.to_string(),
            timeout_secs: DEFAULT_TOOL_TIMEOUT_SECS,
        }
    }
}

impl RemovalToolConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Credentials the removal tool needs to talk to its service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCredentials {
    pub api_url: String,
    pub username: String,
    pub password: String,
}

/// Process-wide gateway configuration, set once per deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Directory all operations must stay inside
    pub sandbox_root: PathBuf,
    #[serde(default)]
    pub tool: RemovalToolConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<ToolCredentials>,
}

impl GatewayConfig {
    pub fn new(sandbox_root: impl Into<PathBuf>) -> Self {
        Self {
            sandbox_root: sandbox_root.into(),
            tool: RemovalToolConfig::default(),
            credentials: None,
        }
    }

    /// Load configuration from the process environment.
    ///
    /// `FILEGATE_ROOT` is required. `FILEGATE_TOOL` and
    /// `FILEGATE_TOOL_TIMEOUT_SECS` override the tool defaults. Credentials
    /// are picked up only when `FILEGATE_API_URL`, `FILEGATE_USER` and
    /// `FILEGATE_PASSWORD` are all present.
    pub fn from_env() -> Result<Self> {
        let sandbox_root = std::env::var("FILEGATE_ROOT")
            .map_err(|_| Error::Config(ConfigError::MissingEnv("FILEGATE_ROOT")))?;

        let mut tool = RemovalToolConfig::default();
        if let Ok(program) = std::env::var("FILEGATE_TOOL") {
            tool.program = program;
        }
        if let Ok(timeout) = std::env::var("FILEGATE_TOOL_TIMEOUT_SECS") {
            tool.timeout_secs = timeout.parse().map_err(|e| {
                Error::Config(ConfigError::InvalidValue {
                    var: "FILEGATE_TOOL_TIMEOUT_SECS",
                    reason: format!("{}", e),
                })
            })?;
        }

        let credentials = match (
            std::env::var("FILEGATE_API_URL"),
            std::env::var("FILEGATE_USER"),
            std::env::var("FILEGATE_PASSWORD"),
        ) {
            (Ok(api_url), Ok(username), Ok(password)) => Some(ToolCredentials {
                api_url,
                username,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            sandbox_root: PathBuf::from(sandbox_root),
            tool,
            credentials,
        })
    }
}
