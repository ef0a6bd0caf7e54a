//! Configuration management for jobfit

use crate::error::{JobFitError, Result};
use crate::llm::feedback::{Detail, FeedbackStyle, Tone};
use anyhow::{anyhow, Context};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feedback: FeedbackConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub enabled: bool,
    pub api_base: String,
    pub model: String,
    /// Environment variable holding the API key. The key itself is never stored.
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub tone: Tone,
    pub detail: Detail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub display_limit: usize,
    pub color_output: bool,
    pub include_metadata: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
            tone: Tone::default(),
            detail: Detail::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            display_limit: 25,
            color_output: true,
            include_metadata: true,
        }
    }
}

impl FeedbackConfig {
    pub fn style(&self) -> FeedbackStyle {
        FeedbackStyle {
            tone: self.tone,
            detail: self.detail,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file is created with defaults. A missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(JobFitError::Configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                Self::read_from(path)
            }
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::read_from(&config_path)
                } else {
                    let config = Self::default();
                    config.save_to(&config_path)?;
                    Ok(config)
                }
            }
        }
    }

    fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| JobFitError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobFitError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("jobfit")
            .join("config.toml")
    }

    /// `--api-key` wins over the configured environment variable. Blank keys count as absent.
    pub fn resolve_api_key(&self, cli_key: Option<String>) -> Option<String> {
        cli_key
            .or_else(|| std::env::var(&self.feedback.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Update one scalar setting by its dotted key, e.g. `feedback.tone`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)
            .with_context(|| format!("Cannot set '{}' to '{}'", key, value))?;
        Ok(())
    }

    fn apply(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "feedback.enabled" => self.feedback.enabled = value.parse()?,
            "feedback.api_base" => self.feedback.api_base = value.to_string(),
            "feedback.model" => self.feedback.model = value.to_string(),
            "feedback.api_key_env" => self.feedback.api_key_env = value.to_string(),
            "feedback.timeout_secs" => self.feedback.timeout_secs = value.parse()?,
            "feedback.tone" => {
                self.feedback.tone = Tone::from_str(value, true).map_err(|e| anyhow!(e))?
            }
            "feedback.detail" => {
                self.feedback.detail = Detail::from_str(value, true).map_err(|e| anyhow!(e))?
            }
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value).map_err(|e| anyhow!(e))?
            }
            "output.display_limit" => self.output.display_limit = value.parse()?,
            "output.color_output" => self.output.color_output = value.parse()?,
            "output.include_metadata" => self.output.include_metadata = value.parse()?,
            _ => return Err(anyhow!("unknown configuration key")),
        }
        Ok(())
    }
}
