//! CLI interface for jobfit

use crate::config::OutputFormat;
use crate::llm::feedback::{Detail, Tone};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jobfit")]
#[command(version)]
#[command(about = "Score how well a resume fits a job description")]
#[command(long_about = "Compare resume and job description keywords, report matched and missing skills, and optionally ask a language model for improvement feedback")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long, required_unless_present = "resume_text", conflicts_with = "resume_text")]
        resume: Option<PathBuf>,

        /// Resume text given inline
        #[arg(long)]
        resume_text: Option<String>,

        /// Path to job description file (PDF, DOCX, TXT, MD)
        #[arg(short, long, required_unless_present = "job_text", conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description text given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Feedback tone
        #[arg(long, value_enum)]
        tone: Option<Tone>,

        /// Feedback detail level
        #[arg(long, value_enum)]
        detail: Option<Detail>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// How many matched/missing keywords to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// API key for the feedback model (overrides the configured environment variable)
        #[arg(long)]
        api_key: Option<String>,

        /// Skip AI feedback (score and keywords only)
        #[arg(long)]
        no_feedback: bool,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "feedback.tone")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_files() {
        let cli = Cli::try_parse_from([
            "jobfit", "analyze", "--resume", "cv.pdf", "--job", "job.txt", "--tone", "simple", "--detail", "short",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze { resume, job, tone, detail, no_feedback, .. } => {
                assert_eq!(resume, Some(PathBuf::from("cv.pdf")));
                assert_eq!(job, Some(PathBuf::from("job.txt")));
                assert_eq!(tone, Some(Tone::Simple));
                assert_eq!(detail, Some(Detail::Short));
                assert!(!no_feedback);
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_both_documents() {
        assert!(Cli::try_parse_from(["jobfit", "analyze", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from(["jobfit", "analyze", "--job-text", "Rust"]).is_err());
        assert!(Cli::try_parse_from([
            "jobfit", "analyze", "--resume", "cv.pdf", "--resume-text", "Rust", "--job-text", "Rust",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["jobfit", "analyze", "--resume-text", "Rust", "--job-text", "Rust"]).is_ok());
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        let allowed = ["pdf", "docx"];
        assert!(validate_file_extension(Path::new("resume.PDF"), &allowed).is_ok());
        assert!(validate_file_extension(Path::new("resume.odt"), &allowed).is_err());
        assert!(validate_file_extension(Path::new("resume"), &allowed).is_err());
    }
}
