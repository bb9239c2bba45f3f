//! Configuration management for the ExamForge engine
//!
//! Supports loading configuration from:
//! - Environment variables (prefixed with APP__)
//! - Configuration files (config.toml)
//! - Default values

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseConfig,

    /// Text provider configuration
    pub provider: ProviderConfig,

    /// Enrichment pipeline tuning
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

/// Generative-text provider configuration
///
/// An absent API key is a valid configuration: the engine falls back to
/// the deterministic local provider instead of failing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Provider mode: "groq" or "mock"
    #[serde(default = "default_provider_mode")]
    pub mode: String,

    /// API key; when missing the local fallback provider is used
    pub api_key: Option<String>,

    /// OpenAI-compatible chat-completions base URL
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// Fast model, used for translation
    #[serde(default = "default_model_fast")]
    pub model_fast: String,

    /// Smart model, used for paraphrasing and explanations
    #[serde(default = "default_model_smart")]
    pub model_smart: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,

    /// Maximum attempts per request (retries with exponential backoff)
    #[serde(default = "default_provider_max_retries")]
    pub max_retries: u32,
}

/// Batch sizes, inter-batch delays and sequential-fallback thresholds for
/// each enrichment stage. Tunable, not contractual.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_rewrite_batch_size")]
    pub rewrite_batch_size: usize,

    #[serde(default = "default_translate_batch_size")]
    pub translate_batch_size: usize,

    #[serde(default = "default_explain_batch_size")]
    pub explain_batch_size: usize,

    #[serde(default = "default_adapt_batch_size")]
    pub adapt_batch_size: usize,

    /// Courtesy delay between rewrite batches, in milliseconds
    #[serde(default = "default_rewrite_delay_ms")]
    pub rewrite_delay_ms: u64,

    #[serde(default = "default_translate_delay_ms")]
    pub translate_delay_ms: u64,

    #[serde(default = "default_explain_delay_ms")]
    pub explain_delay_ms: u64,

    #[serde(default = "default_adapt_delay_ms")]
    pub adapt_delay_ms: u64,

    /// Item counts at or below which a stage runs sequentially
    #[serde(default = "default_rewrite_sequential_threshold")]
    pub rewrite_sequential_threshold: usize,

    #[serde(default = "default_translate_sequential_threshold")]
    pub translate_sequential_threshold: usize,

    #[serde(default = "default_explain_sequential_threshold")]
    pub explain_sequential_threshold: usize,

    #[serde(default = "default_adapt_sequential_threshold")]
    pub adapt_sequential_threshold: usize,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Provider request timeout as a Duration
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost/examforge".to_string(),
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                connect_timeout_secs: default_connect_timeout(),
                idle_timeout_secs: default_idle_timeout(),
            },
            provider: ProviderConfig::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: default_provider_mode(),
            api_key: None,
            base_url: default_provider_base_url(),
            model_fast: default_model_fast(),
            model_smart: default_model_smart(),
            timeout_secs: default_provider_timeout(),
            max_retries: default_provider_max_retries(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            rewrite_batch_size: default_rewrite_batch_size(),
            translate_batch_size: default_translate_batch_size(),
            explain_batch_size: default_explain_batch_size(),
            adapt_batch_size: default_adapt_batch_size(),
            rewrite_delay_ms: default_rewrite_delay_ms(),
            translate_delay_ms: default_translate_delay_ms(),
            explain_delay_ms: default_explain_delay_ms(),
            adapt_delay_ms: default_adapt_delay_ms(),
            rewrite_sequential_threshold: default_rewrite_sequential_threshold(),
            translate_sequential_threshold: default_translate_sequential_threshold(),
            explain_sequential_threshold: default_explain_sequential_threshold(),
            adapt_sequential_threshold: default_adapt_sequential_threshold(),
        }
    }
}

// Default value functions

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_provider_mode() -> String {
    "groq".to_string()
}

fn default_provider_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model_fast() -> String {
    "mixtral-8x7b-32768".to_string()
}

fn default_model_smart() -> String {
    "llama3-70b-8192".to_string()
}

fn default_provider_timeout() -> u64 {
    30
}

fn default_provider_max_retries() -> u32 {
    3
}

fn default_rewrite_batch_size() -> usize {
    5
}

fn default_translate_batch_size() -> usize {
    3
}

fn default_explain_batch_size() -> usize {
    3
}

fn default_adapt_batch_size() -> usize {
    4
}

fn default_rewrite_delay_ms() -> u64 {
    500
}

fn default_translate_delay_ms() -> u64 {
    300
}

fn default_explain_delay_ms() -> u64 {
    400
}

fn default_adapt_delay_ms() -> u64 {
    300
}

fn default_rewrite_sequential_threshold() -> usize {
    3
}

fn default_translate_sequential_threshold() -> usize {
    0
}

fn default_explain_sequential_threshold() -> usize {
    2
}

fn default_adapt_sequential_threshold() -> usize {
    2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider.model_smart, "llama3-70b-8192");
        assert_eq!(config.enrichment.rewrite_batch_size, 5);
        assert_eq!(config.enrichment.translate_delay_ms, 300);
    }

    #[test]
    fn test_missing_api_key_is_valid() {
        let config = AppConfig::default();
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.provider.mode, "groq");
    }
}
