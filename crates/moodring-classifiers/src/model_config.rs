//! Pretrained model configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the pretrained sentiment backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PretrainedConfig {
    /// Load the model at startup. When false the backend is unavailable and
    /// requests for it are served by the lexicon scorer.
    #[serde(default)]
    pub enabled: bool,

    /// Display name reported in results
    #[serde(default = "default_name")]
    pub name: String,

    /// Where to load the checkpoint from
    #[serde(default)]
    pub source: ModelSource,

    /// Device to run on (cpu, cuda, metal)
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum input length in tokens
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for PretrainedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            name: default_name(),
            source: ModelSource::default(),
            device: default_device(),
            max_length: default_max_length(),
        }
    }
}

impl PretrainedConfig {
    /// Enabled configuration reading a checkpoint from a local directory
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            source: ModelSource::Local { path: path.into() },
            ..Default::default()
        }
    }

    /// Enabled configuration downloading a checkpoint from the Hugging Face Hub
    pub fn from_hf(repo: impl Into<String>) -> Self {
        Self {
            enabled: true,
            source: ModelSource::HuggingFace {
                repo: repo.into(),
                revision: default_revision(),
            },
            ..Default::default()
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }
}

/// Model source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Load from a local directory holding config.json, weights and tokenizer
    Local { path: PathBuf },

    /// Download from HuggingFace Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::HuggingFace {
            repo: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            revision: default_revision(),
        }
    }
}

fn default_name() -> String {
    "distilbert-sst2".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_device() -> String {
    "cpu".to_string()
}

fn default_max_length() -> usize {
    crate::pretrained::MAX_INPUT_TOKENS
}
