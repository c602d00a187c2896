//! Engine configuration, loadable from TOML.

use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Generation backend sampling and retry policy.
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`EngineError::Config`](crate::EngineError::Config) if the
    /// TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::EngineError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// General engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Fixed RNG seed. When unset, the engine seeds from entropy;
    /// tests set this for deterministic runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            seed: None,
        }
    }
}

/// Sampling parameters and retry policy for the generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Temperature for the first attempt.
    #[serde(default = "default_base_temperature")]
    pub base_temperature: f32,
    /// Temperature increase per retry.
    #[serde(default = "default_temperature_step")]
    pub temperature_step: f32,
    /// How many candidates to request before giving up and using the last.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Maximum new tokens per candidate.
    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,
    /// Nucleus sampling threshold.
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Top-k sampling cutoff.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// No-repeat n-gram constraint size.
    #[serde(default = "default_no_repeat_ngram")]
    pub no_repeat_ngram: u32,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_temperature: 0.7,
            temperature_step: 0.1,
            max_attempts: 3,
            max_new_tokens: 100,
            top_p: 0.85,
            top_k: 40,
            no_repeat_ngram: 3,
            timeout_ms: 5000,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_base_temperature() -> f32 {
    0.7
}
fn default_temperature_step() -> f32 {
    0.1
}
fn default_max_attempts() -> u32 {
    3
}
fn default_max_new_tokens() -> u32 {
    100
}
fn default_top_p() -> f32 {
    0.85
}
fn default_top_k() -> u32 {
    40
}
fn default_no_repeat_ngram() -> u32 {
    3
}
fn default_timeout_ms() -> u64 {
    5000
}
