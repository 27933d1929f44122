//! Configuration loading for triaged.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.disaster-triage/config.toml` (user)
//! 3. `/etc/disaster-triage/config.toml` (system)
//!
//! If none of these exist the built-in defaults are used.
//!
//! The provider credential is loaded separately:
//! 1. `~/.disaster-triage/secrets.toml` (user, must be 0600)
//! 2. `/etc/disaster-triage/secrets.toml` (system, must be 0600)
//! 3. `OPENAI_API_KEY`, then `OPENAI__API_KEY` environment variables

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::fusion::FusionRule;
use crate::pipeline::{ClassificationPipeline, Dispatch, FailurePolicy};
use crate::providers::openai::DEFAULT_BASE_URL;
use crate::types::DEFAULT_MODEL;
use crate::{Result, TriageError};

/// Directory name under `$HOME` and `/etc`.
const CONFIG_DIR: &str = "disaster-triage";

/// Environment variables consulted for the provider key, in order.
const API_KEY_ENV_VARS: &[&str] = &["OPENAI_API_KEY", "OPENAI__API_KEY"];

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Largest accepted request body in bytes (default: 10 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
    /// Allowed CORS origins. Empty allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            max_upload_bytes: default_max_upload(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_max_upload() -> usize {
    10 * 1024 * 1024
}

/// Completion provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// OpenAI-compatible base URL (default: https://api.openai.com/v1).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name (default: gpt-4o-mini).
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-call timeout in seconds (default: 60). Must be non-zero.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Optional cap on reply tokens.
    #[serde(default)]
    pub max_tokens: Option<usize>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_tokens: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

/// Classification policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub fusion_rule: FusionRule,
    #[serde(default)]
    pub dispatch: Dispatch,
    #[serde(default)]
    pub on_modality_failure: FailurePolicy,
}

/// Secrets configuration (provider key).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path that does not exist is an error. Without an explicit
    /// path, a missing file means defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TriageError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            TriageError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(TriageError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(format!(".{CONFIG_DIR}")).join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc").join(CONFIG_DIR).join("config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Resolve the listen address, replacing the port with `port_override`
    /// when given (hosting platforms pass it as `PORT`).
    pub fn listen_address(&self, port_override: Option<&str>) -> Result<SocketAddr> {
        let mut addr: SocketAddr = self.server.address.parse().map_err(|e| {
            TriageError::Configuration(format!(
                "Invalid address '{}': {e}",
                self.server.address
            ))
        })?;

        if let Some(port) = port_override {
            let port: u16 = port.trim().parse().map_err(|e| {
                TriageError::Configuration(format!("Invalid port '{port}': {e}"))
            })?;
            addr.set_port(port);
        }

        Ok(addr)
    }

    /// Build the classification pipeline described by this config.
    pub fn build_pipeline(&self, api_key: impl Into<String>) -> Result<ClassificationPipeline> {
        let mut builder = ClassificationPipeline::builder()
            .openai(api_key)
            .base_url(&self.provider.base_url)
            .model(&self.provider.model)
            .timeout(Duration::from_secs(self.provider.timeout_secs))
            .fusion_rule(self.pipeline.fusion_rule)
            .dispatch(self.pipeline.dispatch)
            .failure_policy(self.pipeline.on_modality_failure);

        if let Some(max) = self.provider.max_tokens {
            builder = builder.max_tokens(max);
        }

        builder.build()
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (the key may come from the
    /// environment).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(format!(".{CONFIG_DIR}")).join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc").join(CONFIG_DIR).join("secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Parse a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            TriageError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            TriageError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            TriageError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(TriageError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Provider key from the secrets file, falling back to the environment.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with(|var| std::env::var(var).ok())
    }

    /// Like [`api_key`](Self::api_key) with an injectable environment lookup.
    pub fn api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.openai
            .as_ref()
            .map(|s| s.api_key.clone())
            .or_else(|| API_KEY_ENV_VARS.iter().find_map(|var| env(var)))
            .filter(|key| !key.trim().is_empty())
    }

    /// The provider key, or a configuration error naming where it was looked for.
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key().ok_or_else(|| {
            TriageError::Configuration(format!(
                "no provider API key: set [openai] api_key in secrets.toml or one of {}",
                API_KEY_ENV_VARS.join(", ")
            ))
        })
    }
}
