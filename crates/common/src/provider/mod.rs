//! Generative-text provider abstraction
//!
//! Enrichment stages talk to a single `TextProvider` seam. The live
//! implementation calls an OpenAI-compatible chat-completions API; the
//! fallback produces deterministic text locally so the engine works
//! without credentials and tests stay reproducible.

mod fallback;
mod groq;
pub mod prompts;

pub use fallback::FallbackProvider;
pub use groq::GroqProvider;

use crate::config::ProviderConfig;
use crate::errors::Result;
use crate::models::Subject;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// What kind of text a stage wants back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Rewrite a question preserving its educational objective
    Paraphrase,
    /// Translate (and culturally adapt) into a target language
    Translate,
    /// Produce a student-facing explanation for question and answer
    Explain,
}

/// A single generation request from an enrichment stage
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub intent: Intent,
    pub text: String,
    /// Correct answer, consumed by explanation requests
    pub answer: Option<String>,
    pub subject: Subject,
    /// Target language for translation requests
    pub target_language: Option<String>,
}

impl TextRequest {
    pub fn paraphrase(text: impl Into<String>, subject: Subject) -> Self {
        Self {
            intent: Intent::Paraphrase,
            text: text.into(),
            answer: None,
            subject,
            target_language: None,
        }
    }

    pub fn translate(
        text: impl Into<String>,
        subject: Subject,
        language: impl Into<String>,
    ) -> Self {
        Self {
            intent: Intent::Translate,
            text: text.into(),
            answer: None,
            subject,
            target_language: Some(language.into()),
        }
    }

    pub fn explain(
        text: impl Into<String>,
        answer: impl Into<String>,
        subject: Subject,
    ) -> Self {
        Self {
            intent: Intent::Explain,
            text: text.into(),
            answer: Some(answer.into()),
            subject,
            target_language: None,
        }
    }
}

/// Trait for generative text providers
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text for a request. Errors describe the provider
    /// failure; callers decide whether to degrade or propagate.
    async fn generate(&self, request: &TextRequest) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Create a provider based on configuration.
///
/// A missing API key is not an error: the engine degrades to the
/// deterministic fallback, matching the credential-less deployments.
pub fn create_provider(config: &ProviderConfig) -> Arc<dyn TextProvider> {
    match (config.mode.as_str(), &config.api_key) {
        ("mock", _) => Arc::new(FallbackProvider::new()),
        (_, Some(key)) if !key.is_empty() => Arc::new(GroqProvider::new(config, key.clone())),
        _ => {
            warn!("Provider API key not found, using deterministic fallback");
            Arc::new(FallbackProvider::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[test]
    fn test_missing_key_selects_fallback() {
        let config = ProviderConfig::default();
        let provider = create_provider(&config);
        assert_eq!(provider.name(), "fallback");
    }

    #[test]
    fn test_mock_mode_selects_fallback_even_with_key() {
        let config = ProviderConfig {
            mode: "mock".to_string(),
            api_key: Some("gsk_test".to_string()),
            ..ProviderConfig::default()
        };
        let provider = create_provider(&config);
        assert_eq!(provider.name(), "fallback");
    }

    #[test]
    fn test_key_selects_live_provider() {
        let config = ProviderConfig {
            api_key: Some("gsk_test".to_string()),
            ..ProviderConfig::default()
        };
        let provider = create_provider(&config);
        assert_eq!(provider.name(), "groq");
    }
}
