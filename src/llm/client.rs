use std::time::Duration;
use tracing::{debug, error, warn};

use super::messages::{GenerateRequest, GenerateResponse};
use crate::config::TextGenerationConfig;

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, TextGenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextGenerationError {
    #[error("no models configured")]
    NoModels,
    #[error("all models failed: {}", .0.join("; "))]
    AllModelsFailed(Vec<String>),
}

/// Gemini `generateContent` client with a ranked model fallback list.
///
/// Each model is tried in order; a transport error, non-success status,
/// error body or missing text moves on to the next one.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    models: Vec<String>,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &TextGenerationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            models: config.models.clone(),
            temperature: config.temperature,
        }
    }

    async fn try_model(&self, model: &str, body: &GenerateRequest) -> Result<String, String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GenerateResponse>()
                .await
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(format!("status {}: {}", status, message));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response: {}", e))?;

        if let Some(text) = parsed.first_text() {
            return Ok(text.to_string());
        }
        match parsed.error {
            Some(err) => Err(format!("api error: {}", err.message)),
            None => Err("response carried no text".to_string()),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, TextGenerationError> {
        if self.models.is_empty() {
            return Err(TextGenerationError::NoModels);
        }

        let body = GenerateRequest::user_prompt(prompt, max_tokens, self.temperature);
        let mut failures = Vec::with_capacity(self.models.len());

        for model in &self.models {
            match self.try_model(model, &body).await {
                Ok(text) => {
                    debug!(model = %model, chars = text.len(), "Text generated");
                    return Ok(text);
                }
                Err(reason) => {
                    warn!(model = %model, "Model failed: {}", reason);
                    failures.push(format!("{}: {}", model, reason));
                }
            }
        }

        error!("All text-generation models failed; callers will use fallback data");
        Err(TextGenerationError::AllModelsFailed(failures))
    }
}
