//! Feedback generation interface and style options

use crate::config::FeedbackConfig;
use crate::llm::client::OpenAiFeedbackClient;
use clap::ValueEnum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Confident,
    Simple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Detail {
    Short,
    #[default]
    Medium,
    Detailed,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tone::Professional => "Professional",
            Tone::Confident => "Confident",
            Tone::Simple => "Simple",
        })
    }
}

impl fmt::Display for Detail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Detail::Short => "Short",
            Detail::Medium => "Medium",
            Detail::Detailed => "Detailed",
        })
    }
}

/// How the feedback should read. Only the feedback generator looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeedbackStyle {
    pub tone: Tone,
    pub detail: Detail,
}

/// Raw documents handed to a feedback generator.
#[derive(Debug, Clone)]
pub struct FeedbackRequest<'a> {
    pub resume_text: &'a str,
    pub job_text: &'a str,
    pub style: FeedbackStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FeedbackUnavailable {
    MissingApiKey,
    Disabled,
    Service(String),
}

impl fmt::Display for FeedbackUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackUnavailable::MissingApiKey => {
                write!(f, "AI feedback is off because no API key was provided.")
            }
            FeedbackUnavailable::Disabled => write!(f, "AI feedback was disabled for this run."),
            FeedbackUnavailable::Service(reason) => write!(f, "AI feedback unavailable: {}", reason),
        }
    }
}

/// Result of asking for feedback. Never an error: analysis continues either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeedbackOutcome {
    Generated { text: String, model: String },
    Unavailable { reason: FeedbackUnavailable },
}

impl FeedbackOutcome {
    pub fn unavailable(reason: FeedbackUnavailable) -> Self {
        FeedbackOutcome::Unavailable { reason }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            FeedbackOutcome::Generated { text, .. } => Some(text),
            FeedbackOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, FeedbackOutcome::Generated { .. })
    }
}

/// Produces a natural-language critique of a resume against a job description.
pub trait FeedbackGenerator {
    fn generate(&self, request: &FeedbackRequest<'_>) -> impl Future<Output = FeedbackOutcome> + Send;
}

/// Generator that never calls out and reports why.
#[derive(Debug, Clone)]
pub struct DisabledFeedback {
    reason: FeedbackUnavailable,
}

impl DisabledFeedback {
    pub fn new(reason: FeedbackUnavailable) -> Self {
        Self { reason }
    }
}

impl FeedbackGenerator for DisabledFeedback {
    async fn generate(&self, _request: &FeedbackRequest<'_>) -> FeedbackOutcome {
        FeedbackOutcome::unavailable(self.reason.clone())
    }
}

/// The generator chosen for a run.
pub enum FeedbackBackend {
    OpenAi(OpenAiFeedbackClient),
    Disabled(DisabledFeedback),
}

impl FeedbackBackend {
    /// Pick a backend from config, an optional API key, and the `--no-feedback` switch.
    pub fn select(config: &FeedbackConfig, api_key: Option<String>, force_disabled: bool) -> Self {
        if force_disabled || !config.enabled {
            debug!("Feedback disabled by configuration");
            return FeedbackBackend::Disabled(DisabledFeedback::new(FeedbackUnavailable::Disabled));
        }

        let Some(api_key) = api_key else {
            debug!("No API key found, feedback disabled");
            return FeedbackBackend::Disabled(DisabledFeedback::new(FeedbackUnavailable::MissingApiKey));
        };

        match OpenAiFeedbackClient::new(api_key, config) {
            Ok(client) => FeedbackBackend::OpenAi(client),
            Err(e) => {
                warn!("Could not build feedback client: {}", e);
                FeedbackBackend::Disabled(DisabledFeedback::new(FeedbackUnavailable::Service(e.to_string())))
            }
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FeedbackBackend::OpenAi(_))
    }
}

impl FeedbackGenerator for FeedbackBackend {
    async fn generate(&self, request: &FeedbackRequest<'_>) -> FeedbackOutcome {
        match self {
            FeedbackBackend::OpenAi(client) => client.generate(request).await,
            FeedbackBackend::Disabled(disabled) => disabled.generate(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FeedbackRequest<'static> {
        FeedbackRequest {
            resume_text: "Rust developer",
            job_text: "Rust engineer",
            style: FeedbackStyle::default(),
        }
    }

    #[tokio::test]
    async fn test_disabled_feedback_reports_reason() {
        let generator = DisabledFeedback::new(FeedbackUnavailable::MissingApiKey);
        let outcome = generator.generate(&request()).await;

        assert_eq!(outcome, FeedbackOutcome::unavailable(FeedbackUnavailable::MissingApiKey));
        assert!(outcome.text().is_none());
    }

    #[test]
    fn test_backend_selection() {
        let mut config = FeedbackConfig::default();

        let backend = FeedbackBackend::select(&config, None, false);
        assert!(matches!(
            backend,
            FeedbackBackend::Disabled(ref d) if d.reason == FeedbackUnavailable::MissingApiKey
        ));

        let backend = FeedbackBackend::select(&config, Some("sk-test".to_string()), true);
        assert!(matches!(
            backend,
            FeedbackBackend::Disabled(ref d) if d.reason == FeedbackUnavailable::Disabled
        ));

        config.enabled = false;
        let backend = FeedbackBackend::select(&config, Some("sk-test".to_string()), false);
        assert!(!backend.is_active());

        config.enabled = true;
        let backend = FeedbackBackend::select(&config, Some("sk-test".to_string()), false);
        assert!(backend.is_active());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = FeedbackOutcome::unavailable(FeedbackUnavailable::Service("quota exceeded".to_string()));
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"]["kind"], "service");
        assert_eq!(json["reason"]["detail"], "quota exceeded");
    }

    #[test]
    fn test_style_display() {
        assert_eq!(Tone::Confident.to_string(), "Confident");
        assert_eq!(Detail::Detailed.to_string(), "Detailed");
        assert_eq!(FeedbackStyle::default().tone, Tone::Professional);
        assert_eq!(FeedbackStyle::default().detail, Detail::Medium);
    }
}
