/*!
common/src/lib.rs

Shared configuration types and model presets for Sumlens.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file with default/override merging
- The built-in registry of known summarization checkpoints
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Article store configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON article file (e.g. "data/sample_texts.json")
    pub path: String,
}

/// Remote summarizer configuration.
///
/// Generation parameters left unset fall back to the defaults of the
/// selected model preset, or to the application-wide defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    /// Preset key (e.g. "bart-large-cnn") or a raw checkpoint id
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_length: Option<u32>,
    pub min_length: Option<u32>,
    pub do_sample: Option<bool>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub repetition_penalty: Option<f32>,
    pub length_penalty: Option<f32>,
    pub early_stopping: Option<bool>,
}

/// Input-length bounds enforced before any summarization call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub min_text_chars: Option<usize>,
    pub max_text_chars: Option<usize>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub summarizer: Option<SummarizerConfig>,
    pub limits: Option<LimitsConfig>,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value =
                    toml::from_str(&data).context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

/// Descriptor for a known summarization checkpoint
#[derive(Debug, Clone)]
pub struct ModelPreset {
    /// Short key used in configuration files and on the command line
    pub key: &'static str,
    /// Human-readable display name
    pub name: &'static str,
    /// Checkpoint id as published on the inference hub
    pub model_id: &'static str,
    pub description: &'static str,
    /// Recommended generation bounds for this checkpoint
    pub max_length: u32,
    pub min_length: u32,
    pub recommended_for: &'static [&'static str],
}

/// Preset selected when the configuration does not name a model
pub const DEFAULT_MODEL_KEY: &str = "bart-large-cnn";

const MODEL_PRESETS: &[ModelPreset] = &[
    ModelPreset {
        key: "bart-large-cnn",
        name: "BART Large CNN",
        model_id: "facebook/bart-large-cnn",
        description: "Best for news articles and general text summarization",
        max_length: 200,
        min_length: 30,
        recommended_for: &["news", "articles", "general"],
    },
    ModelPreset {
        key: "bart-base-cnn",
        name: "BART Base CNN",
        model_id: "facebook/bart-base-cnn",
        description: "Faster alternative with good quality",
        max_length: 150,
        min_length: 25,
        recommended_for: &["news", "articles", "general"],
    },
    ModelPreset {
        key: "t5-small",
        name: "T5 Small",
        model_id: "t5-small",
        description: "Google's Text-to-Text Transfer Transformer (small)",
        max_length: 100,
        min_length: 20,
        recommended_for: &["general", "short_text"],
    },
    ModelPreset {
        key: "t5-base",
        name: "T5 Base",
        model_id: "t5-base",
        description: "Google's Text-to-Text Transfer Transformer (base)",
        max_length: 150,
        min_length: 30,
        recommended_for: &["general", "long_text"],
    },
    ModelPreset {
        key: "pegasus-cnn",
        name: "Pegasus CNN",
        model_id: "google/pegasus-cnn_dailymail",
        description: "Specialized for news summarization",
        max_length: 200,
        min_length: 30,
        recommended_for: &["news", "articles"],
    },
];

/// All built-in checkpoint presets, in display order.
pub fn model_presets() -> &'static [ModelPreset] {
    MODEL_PRESETS
}

/// Look up a preset by its key.
pub fn find_preset(key: &str) -> Option<&'static ModelPreset> {
    MODEL_PRESETS.iter().find(|p| p.key == key)
}
