//! Service configuration

use crate::cli::ServeArgs;
use moodring_classifiers::{ModelSource, PretrainedConfig};
use moodring_core::Backend;
use moodring_history::{DEFAULT_CAPACITY, EXCERPT_MAX_CHARS};
use serde::{Deserialize, Deserializer, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Backend used when a request does not name one
    #[serde(default, deserialize_with = "deserialize_backend")]
    pub default_backend: Backend,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub cors: CorsConfig,

    #[serde(default)]
    pub pretrained: PretrainedConfig,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, args: &ServeArgs) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if !config_path.is_empty() && Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", config_path, e))?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(listen) = &args.listen {
            config.listen = listen.clone();
        }

        if let Some(port) = args.port {
            config.port = port;
        }

        if let Some(backend) = &args.backend {
            config.default_backend = Backend::from_name(backend);
        }

        if args.pretrained {
            config.pretrained.enabled = true;
        }

        if let Some(path) = &args.model_path {
            config.pretrained.enabled = true;
            config.pretrained.source = ModelSource::Local { path: path.clone() };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.history.capacity == 0 {
            anyhow::bail!("history.capacity must be at least 1");
        }
        if self.history.excerpt_chars == 0 {
            anyhow::bail!("history.excerpt_chars must be at least 1");
        }
        if self.pretrained.max_length == 0 {
            anyhow::bail!("pretrained.max_length must be at least 1");
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.listen, self.port).parse()?)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            default_backend: Backend::default(),
            history: HistoryConfig::default(),
            cors: CorsConfig::default(),
            pretrained: PretrainedConfig::default(),
        }
    }
}

/// History ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Maximum number of retained entries
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Length of the stored text excerpt in characters
    #[serde(default = "default_excerpt_chars")]
    pub excerpt_chars: usize,

    /// Entries returned by `GET /history` when no limit is given
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            excerpt_chars: default_excerpt_chars(),
            default_limit: default_limit(),
        }
    }
}

/// Cross-origin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allow any origin
    #[serde(default = "default_true")]
    pub allow_any_origin: bool,

    /// Origins allowed when `allow_any_origin` is off
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_any_origin: true,
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn deserialize_backend<'de, D>(deserializer: D) -> Result<Backend, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(Backend::from_name(&name))
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_excerpt_chars() -> usize {
    EXCERPT_MAX_CHARS
}

fn default_limit() -> usize {
    50
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:8501".to_string(),
        "http://127.0.0.1:8501".to_string(),
    ]
}

fn default_true() -> bool {
    true
}
