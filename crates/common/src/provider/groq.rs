//! Groq chat-completions provider

use crate::config::ProviderConfig;
use crate::errors::{AppError, Result};
use crate::provider::{prompts, Intent, TextProvider, TextRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for an OpenAI-compatible chat-completions endpoint
pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model_fast: String,
    model_smart: String,
    timeout: Duration,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl GroqProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url: config.base_url.clone(),
            model_fast: config.model_fast.clone(),
            model_smart: config.model_smart.clone(),
            timeout,
            max_retries: config.max_retries.max(1),
        }
    }

    /// Model and sampling parameters per intent. Translation runs on
    /// the fast model with low temperature; paraphrasing and
    /// explanations use the smart model.
    fn chat_request(&self, request: &TextRequest) -> ChatRequest {
        let subject = request.subject.as_str();
        match request.intent {
            Intent::Paraphrase => ChatRequest {
                model: self.model_smart.clone(),
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: prompts::paraphrase_system(subject),
                    },
                    ChatMessage {
                        role: "user",
                        content: prompts::paraphrase_user(&request.text),
                    },
                ],
                temperature: 0.7,
                max_tokens: 300,
            },
            Intent::Translate => {
                let language = request.target_language.as_deref().unwrap_or("nepali");
                ChatRequest {
                    model: self.model_fast.clone(),
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompts::translate(&request.text, language, subject),
                    }],
                    temperature: 0.3,
                    max_tokens: 250,
                }
            }
            Intent::Explain => {
                let answer = request.answer.as_deref().unwrap_or_default();
                ChatRequest {
                    model: self.model_smart.clone(),
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompts::explain(&request.text, answer, subject),
                    }],
                    temperature: 0.5,
                    max_tokens: 400,
                }
            }
        }
    }

    /// Make request with retry
    async fn request_with_retry(&self, body: &ChatRequest) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff
                let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
                tokio::time::sleep(delay).await;
            }

            match self.make_request(body).await {
                Ok(content) => return Ok(content),
                Err(e @ AppError::ProviderRateLimited { .. }) => {
                    // The endpoint asked us to slow down, retrying
                    // immediately would only extend the penalty
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        error = %e,
                        "Provider request failed, retrying"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| AppError::ProviderUnavailable {
            message: "Unknown error after retries".to_string(),
        }))
    }

    async fn make_request(&self, body: &ChatRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::ProviderTimeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    }
                } else {
                    AppError::ProviderUnavailable {
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            return Err(AppError::ProviderRateLimited { retry_after_secs });
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderUnavailable {
                message: format!("API error {}: {}", status, text),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| AppError::ProviderResponse {
                    message: format!("Failed to parse response: {}", e),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AppError::ProviderResponse {
                message: "Empty completion".to_string(),
            });
        }

        Ok(content)
    }
}

#[async_trait]
impl TextProvider for GroqProvider {
    async fn generate(&self, request: &TextRequest) -> Result<String> {
        debug!(
            intent = ?request.intent,
            text = %request.text.chars().take(50).collect::<String>(),
            "Provider request"
        );

        let body = self.chat_request(request);
        let content = self.request_with_retry(&body).await?;

        Ok(match request.intent {
            Intent::Paraphrase => prompts::clean_paraphrase(&content),
            Intent::Translate => prompts::clean_translation(&content),
            Intent::Explain => content,
        })
    }

    fn name(&self) -> &str {
        "groq"
    }
}
