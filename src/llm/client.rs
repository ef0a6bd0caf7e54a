//! HTTP client for OpenAI-compatible chat completion endpoints.
//!
//! Every failure is turned into [`FeedbackOutcome::Unavailable`] here, so callers
//! never see a transport error.

use crate::config::FeedbackConfig;
use crate::llm::feedback::{FeedbackGenerator, FeedbackOutcome, FeedbackRequest, FeedbackUnavailable};
use crate::llm::prompts::{PromptTemplates, SYSTEM_PROMPT};
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication failed (status {status}), check the API key")]
    Auth { status: u16 },

    #[error("quota or rate limit exceeded, check billing on the provider account")]
    Quota,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned no content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ChatResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

pub struct OpenAiFeedbackClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
    prompts: PromptTemplates,
}

impl OpenAiFeedbackClient {
    pub fn new(api_key: String, config: &FeedbackConfig) -> Result<Self, FeedbackError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            prompts: PromptTemplates::default(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One request, no retries.
    async fn request(&self, request: &FeedbackRequest<'_>) -> Result<String, FeedbackError> {
        let prompt = self.prompts.render_feedback(request);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
        };

        debug!("POST {} (model {}, prompt {} chars)", self.endpoint(), self.model, prompt.len());

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let parsed: ChatResponse = response.json().await?;
        if let Some(usage) = &parsed.usage {
            debug!(
                "Feedback call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed.into_text().ok_or(FeedbackError::EmptyContent)
    }
}

impl FeedbackGenerator for OpenAiFeedbackClient {
    async fn generate(&self, request: &FeedbackRequest<'_>) -> FeedbackOutcome {
        let started = Instant::now();

        match self.request(request).await {
            Ok(text) => {
                info!("Feedback generated in {}ms", started.elapsed().as_millis());
                FeedbackOutcome::Generated {
                    text,
                    model: self.model.clone(),
                }
            }
            Err(e) => {
                warn!("Feedback generation failed: {}", e);
                FeedbackOutcome::unavailable(FeedbackUnavailable::Service(e.to_string()))
            }
        }
    }
}

fn classify_failure(status: StatusCode, body: &str) -> FeedbackError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FeedbackError::Auth {
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => FeedbackError::Quota,
        _ => {
            let message = serde_json::from_str::<ApiErrorResponse>(body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.to_string());
            FeedbackError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base() {
        let mut config = FeedbackConfig::default();
        config.api_base = "https://example.test/v1/".to_string();

        let client = OpenAiFeedbackClient::new("sk-test".to_string(), &config).unwrap();
        assert_eq!(client.endpoint(), "https://example.test/v1/chat/completions");
        assert_eq!(client.model(), config.model);
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure(StatusCode::UNAUTHORIZED, ""),
            FeedbackError::Auth { status: 401 }
        ));
        assert!(matches!(
            classify_failure(StatusCode::TOO_MANY_REQUESTS, ""),
            FeedbackError::Quota
        ));

        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"message": "model not found", "type": "invalid_request_error"}}"#,
        );
        assert_eq!(err.to_string(), "API error (status 400): model not found");

        let err = classify_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "API error (status 502): upstream down");
    }

    #[test]
    fn test_response_text_extraction() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  Add Kubernetes.\n"}}],
                "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Add Kubernetes."));

        let empty: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(empty.into_text().is_none());

        let none: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(none.into_text().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades() {
        let mut config = FeedbackConfig::default();
        config.api_base = "http://127.0.0.1:9".to_string();
        config.timeout_secs = 2;

        let client = OpenAiFeedbackClient::new("sk-test".to_string(), &config).unwrap();
        let request = FeedbackRequest {
            resume_text: "Rust developer",
            job_text: "Rust engineer",
            style: Default::default(),
        };

        let outcome = client.generate(&request).await;
        assert!(matches!(
            outcome,
            FeedbackOutcome::Unavailable {
                reason: FeedbackUnavailable::Service(_)
            }
        ));
    }
}
