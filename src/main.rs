//! jobfit: resume vs job description keyword fit scoring

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use jobfit::cli::{self, Cli, Commands, ConfigAction};
use jobfit::config::{Config, OutputFormat};
use jobfit::error::{JobFitError, Result};
use jobfit::input::file_detector::SUPPORTED_EXTENSIONS;
use jobfit::input::manager::InputManager;
use jobfit::llm::feedback::{Detail, FeedbackBackend, FeedbackStyle, Tone};
use jobfit::output::formatter::{save_report_to_file, ReportGenerator};
use jobfit::processing::analyzer::{AnalysisEngine, DocumentInput};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Options of one `analyze` invocation.
struct AnalyzeArgs {
    resume: Option<PathBuf>,
    resume_text: Option<String>,
    job: Option<PathBuf>,
    job_text: Option<String>,
    tone: Option<Tone>,
    detail: Option<Detail>,
    output: Option<String>,
    save: Option<PathBuf>,
    limit: Option<usize>,
    api_key: Option<String>,
    no_feedback: bool,
}

async fn run_command(command: Commands, mut config: Config, config_file: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            resume_text,
            job,
            job_text,
            tone,
            detail,
            output,
            save,
            limit,
            api_key,
            no_feedback,
        } => {
            let args = AnalyzeArgs {
                resume,
                resume_text,
                job,
                job_text,
                tone,
                detail,
                output,
                save,
                limit,
                api_key,
                no_feedback,
            };
            run_analyze(args, &config).await
        }

        Commands::Config { action } => {
            let config_path = config_file.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| JobFitError::Configuration(e.to_string()))?;
                    println!("⚙️  Current Configuration ({})\n", config_path.display());
                    println!("{}", rendered);
                }

                Some(ConfigAction::Path) => {
                    println!("{}", config_path.display());
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&config_path)?;
                    println!("✅ Configuration reset to defaults: {}", config_path.display());
                }

                Some(ConfigAction::Set { key, value }) => {
                    config.set(&key, &value)?;
                    config.save_to(&config_path)?;
                    println!("✅ Set {} = {}", key, value);
                }
            }
            Ok(())
        }
    }
}

async fn run_analyze(args: AnalyzeArgs, config: &Config) -> Result<()> {
    let output_format = match &args.output {
        Some(format) => cli::parse_output_format(format).map_err(JobFitError::InvalidInput)?,
        None => config.output.format,
    };
    let display_limit = args.limit.unwrap_or(config.output.display_limit);

    let mut input_manager = InputManager::new();
    let resume = load_document(&mut input_manager, args.resume.as_deref(), args.resume_text, "Resume").await?;
    let job = load_document(&mut input_manager, args.job.as_deref(), args.job_text, "Job description").await?;

    let defaults = config.feedback.style();
    let style = FeedbackStyle {
        tone: args.tone.unwrap_or(defaults.tone),
        detail: args.detail.unwrap_or(defaults.detail),
    };

    let api_key = config.resolve_api_key(args.api_key);
    let backend = FeedbackBackend::select(&config.feedback, api_key, args.no_feedback);

    let spinner = if backend.is_active() && output_format == OutputFormat::Console {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::default_spinner());
        spinner.set_message("Generating AI feedback...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        Some(spinner)
    } else {
        None
    };

    let engine = AnalysisEngine::new();
    let result = engine.run(&resume, &job, &backend, style).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let report = result?;

    let saving = args.save.is_some();
    let use_colors = config.output.color_output && !saving;
    let generator = ReportGenerator::new(use_colors, config.output.include_metadata, display_limit);
    let rendered = generator.generate_report(&report, output_format)?;

    match args.save {
        Some(path) => {
            save_report_to_file(&rendered, &path)?;
            info!("Report written to {}", path.display());
            println!(
                "✅ Report saved to {} (fit score {}%)",
                path.display(),
                report.summary.score
            );
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

/// Read a document from a file or take it inline.
async fn load_document(
    input_manager: &mut InputManager,
    path: Option<&Path>,
    inline: Option<String>,
    role: &str,
) -> Result<DocumentInput> {
    match (path, inline) {
        (Some(path), _) => {
            cli::validate_file_extension(path, SUPPORTED_EXTENSIONS)
                .map_err(|e| JobFitError::InvalidInput(format!("{} file: {}", role, e)))?;
            let document = input_manager.load(path).await?;
            info!("{} loaded: {} characters", role, document.text.len());
            Ok(document)
        }
        (None, Some(text)) => Ok(DocumentInput::inline(text)),
        (None, None) => Err(JobFitError::InvalidInput(format!(
            "{} is required: pass a file or inline text",
            role
        ))),
    }
}
