//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::{JobFitError, Result};
use crate::llm::feedback::FeedbackOutcome;
use crate::output::report::*;
use crate::processing::keyword_matcher::{FitLabel, RankedKeyword};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
}

/// Terminal formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    include_metadata: bool,
    display_limit: usize,
}

/// JSON formatter for scripting; always carries the full keyword lists
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    display_limit: usize,
}

pub struct HtmlFormatter {
    include_metadata: bool,
    display_limit: usize,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>JobFit Analysis Report</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 14px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 15px; margin: 20px 0; }
        .metric { background: #f8f9fa; padding: 15px; border-radius: 8px; border-left: 4px solid #007acc; }
        .metric .value { font-size: 1.6em; font-weight: bold; }
        .label-strong { border-left-color: #28a745; }
        .label-good { border-left-color: #ffc107; }
        .label-low { border-left-color: #dc3545; }
        .card { padding: 16px; border: 1px solid rgba(120,120,120,0.25); border-radius: 14px; margin: 15px 0; }
        .warning { background: #fff3cd; padding: 12px; border-radius: 8px; margin: 10px 0; }
        .skills { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
        .feedback { white-space: pre-wrap; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
</head>
<body>
    <div class="container">
        <h1>JobFit Analysis Report</h1>

        <div class="metrics">
            <div class="metric"><div>Job Fit Score</div><div class="value">{{ score }}%</div></div>
            <div class="metric"><div>Matched Skills</div><div class="value">{{ matched_count }}</div></div>
            <div class="metric"><div>Missing Skills</div><div class="value">{{ missing_count }}</div></div>
            <div class="metric {{ label_class }}"><div>Status</div><div><strong>{{ status }}</strong></div></div>
        </div>

        {% if !has_job_keywords %}
        <div class="warning">{{ no_keywords_warning }}</div>
        {% endif %}

        <div class="card"><strong>What this means</strong><br>{{ explanation }}</div>

        <div class="skills">
            <div>
                <h2>Matched Skills (top {{ display_limit }})</h2>
                {% if matched_count == 0 %}
                <p>No strong matches detected yet.</p>
                {% else %}
                <ul>
                {% for kw in matched %}
                    <li>{{ kw.keyword }}</li>
                {% endfor %}
                {% if matched_more > 0 %}
                    <li>... and {{ matched_more }} more</li>
                {% endif %}
                </ul>
                {% endif %}
            </div>
            <div>
                <h2>Missing Skills (top {{ display_limit }})</h2>
                {% if missing_count == 0 %}
                <p>Great! No major keyword gaps found.</p>
                {% else %}
                <ul>
                {% for kw in missing %}
                    <li>{{ kw.keyword }} <small>({{ kw.job_count }}x in job)</small></li>
                {% endfor %}
                {% if missing_more > 0 %}
                    <li>... and {{ missing_more }} more</li>
                {% endif %}
                </ul>
                {% endif %}
            </div>
        </div>

        <h2>AI Feedback</h2>
        {% if has_feedback %}
        <div class="card"><p><small>Model: {{ feedback_model }}</small></p><div class="feedback">{{ feedback_text }}</div></div>
        {% else %}
        <div class="warning">{{ feedback_text }}<br>{{ fallback_note }}</div>
        {% endif %}

        {% if include_metadata %}
        <div class="metadata">
            <p><strong>Generated by JobFit v{{ version }}</strong> on {{ generated_at }}</p>
            <p><strong>Resume:</strong> {{ resume_source }} | <strong>Job:</strong> {{ job_source }}</p>
        </div>
        {% endif %}
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate<'a> {
    score: u8,
    matched_count: usize,
    missing_count: usize,
    status: &'a str,
    label_class: &'static str,
    has_job_keywords: bool,
    no_keywords_warning: &'static str,
    explanation: &'static str,
    display_limit: usize,
    matched: &'a [RankedKeyword],
    missing: &'a [RankedKeyword],
    matched_more: usize,
    missing_more: usize,
    has_feedback: bool,
    feedback_text: String,
    feedback_model: String,
    fallback_note: &'static str,
    include_metadata: bool,
    version: &'a str,
    generated_at: String,
    resume_source: &'a str,
    job_source: &'a str,
}

fn format_timestamp(report: &AnalysisReport) -> String {
    report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, include_metadata: bool, display_limit: usize) -> Self {
        Self { use_colors, include_metadata, display_limit }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn label_color(label: FitLabel) -> Color {
        match label {
            FitLabel::StrongMatch => Color::Green,
            FitLabel::GoodMatch => Color::Yellow,
            FitLabel::LowMatch => Color::Red,
        }
    }

    fn format_keyword_list(&self, keywords: &[RankedKeyword], total: usize, empty_message: &str, color: Color) -> String {
        let mut output = String::new();
        if total == 0 {
            output.push_str(&format!("  {}\n", empty_message));
            return output;
        }

        for keyword in keywords {
            output.push_str(&format!(
                "  • {} {}\n",
                self.colorize(&keyword.keyword, color),
                self.colorize(&format!("({}x in job)", keyword.job_count), Color::BrightBlack)
            ));
        }
        if total > keywords.len() {
            output.push_str(&format!("  ... and {} more\n", total - keywords.len()));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str(&self.format_header("🧠 JOBFIT ANALYSIS", 1));
        if self.include_metadata {
            output.push_str(&format!(
                "Generated: {} | Processing time: {}ms\n",
                format_timestamp(report),
                report.metadata.processing_time_ms
            ));
        }

        output.push_str(&self.format_header("Summary", 2));
        let status = if self.use_colors {
            summary.status.color(Self::label_color(summary.label)).bold().to_string()
        } else {
            summary.status.clone()
        };
        output.push_str(&format!("Job Fit Score:  {}%  [{}]\n", summary.score, status));
        output.push_str(&format!(
            "Matched Skills: {} | Missing Skills: {}\n",
            summary.matched_count, summary.missing_count
        ));
        output.push_str(&format!(
            "Keywords found: {} in resume, {} in job description\n",
            summary.resume_keyword_count, summary.job_keyword_count
        ));
        if !summary.has_job_keywords {
            output.push_str(&format!("⚠️  {}\n", self.colorize(NO_JOB_KEYWORDS_WARNING, Color::Yellow)));
        }
        output.push_str(&format!("\n{}\n", self.colorize(SCORE_EXPLANATION, Color::Cyan)));

        output.push_str(&self.format_header(&format!("✅ Matched Skills (top {})", self.display_limit), 3));
        output.push_str(&self.format_keyword_list(
            report.top_matched(self.display_limit),
            summary.matched_count,
            "No strong matches detected yet.",
            Color::Green,
        ));

        output.push_str(&self.format_header(&format!("❌ Missing Skills (top {})", self.display_limit), 3));
        output.push_str(&self.format_keyword_list(
            report.top_missing(self.display_limit),
            summary.missing_count,
            "Great! No major keyword gaps found.",
            Color::Red,
        ));

        output.push_str(&self.format_header("🤖 AI Feedback", 2));
        match &report.feedback {
            FeedbackOutcome::Generated { text, model } => {
                output.push_str(&format!("{}\n\n", self.colorize(&format!("Model: {}", model), Color::BrightBlack)));
                output.push_str(text);
                output.push('\n');
            }
            FeedbackOutcome::Unavailable { reason } => {
                output.push_str(&format!("⚠️  {}\n", self.colorize(&reason.to_string(), Color::Yellow)));
                output.push_str(&format!("   {}\n", FEEDBACK_FALLBACK_NOTE));
            }
        }

        if self.include_metadata {
            output.push_str(&format!(
                "\n{} Generated by JobFit v{}\n",
                self.colorize("ℹ️", Color::Blue),
                report.metadata.version
            ));
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, display_limit: usize) -> Self {
        Self { include_metadata, display_limit }
    }

    fn keyword_section(title: &str, keywords: &[RankedKeyword], total: usize, empty_message: &str) -> String {
        let mut output = format!("### {}\n\n", title);
        if total == 0 {
            output.push_str(&format!("_{}_\n\n", empty_message));
            return output;
        }
        for keyword in keywords {
            output.push_str(&format!("- `{}` ({}x in job)\n", keyword.keyword, keyword.job_count));
        }
        if total > keywords.len() {
            output.push_str(&format!("- ... and {} more\n", total - keywords.len()));
        }
        output.push('\n');
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str("# 🧠 JobFit Analysis Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Resume:** `{}` | **Job:** `{}`\n\n",
                format_timestamp(report),
                report.metadata.resume_source,
                report.metadata.job_source
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Job Fit Score | Matched Skills | Missing Skills | Status |\n");
        output.push_str("|---------------|----------------|----------------|--------|\n");
        output.push_str(&format!(
            "| {}% | {} | {} | {} |\n\n",
            summary.score, summary.matched_count, summary.missing_count, summary.status
        ));
        if !summary.has_job_keywords {
            output.push_str(&format!("> ⚠️ {}\n\n", NO_JOB_KEYWORDS_WARNING));
        }
        output.push_str(&format!("{}\n\n", SCORE_EXPLANATION));

        output.push_str("## 🧩 Skills\n\n");
        output.push_str(&Self::keyword_section(
            &format!("✅ Matched Skills (top {})", self.display_limit),
            report.top_matched(self.display_limit),
            summary.matched_count,
            "No strong matches detected yet.",
        ));
        output.push_str(&Self::keyword_section(
            &format!("❌ Missing Skills (top {})", self.display_limit),
            report.top_missing(self.display_limit),
            summary.missing_count,
            "Great! No major keyword gaps found.",
        ));

        output.push_str("## 🤖 AI Feedback\n\n");
        match &report.feedback {
            FeedbackOutcome::Generated { text, model } => {
                output.push_str(&format!("_Model: {}_\n\n{}\n\n", model, text));
            }
            FeedbackOutcome::Unavailable { reason } => {
                output.push_str(&format!("> ⚠️ {}\n>\n> {}\n\n", reason, FEEDBACK_FALLBACK_NOTE));
            }
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!("*Generated by JobFit v{}*\n", report.metadata.version));
        }

        Ok(output)
    }
}

impl HtmlFormatter {
    pub fn new(include_metadata: bool, display_limit: usize) -> Self {
        Self { include_metadata, display_limit }
    }

    fn create_template_data<'a>(&self, report: &'a AnalysisReport) -> HtmlTemplate<'a> {
        let label_class = match report.summary.label {
            FitLabel::StrongMatch => "label-strong",
            FitLabel::GoodMatch => "label-good",
            FitLabel::LowMatch => "label-low",
        };

        let (has_feedback, feedback_text, feedback_model) = match &report.feedback {
            FeedbackOutcome::Generated { text, model } => (true, text.clone(), model.clone()),
            FeedbackOutcome::Unavailable { reason } => (false, reason.to_string(), String::new()),
        };

        let matched = report.top_matched(self.display_limit);
        let missing = report.top_missing(self.display_limit);

        HtmlTemplate {
            score: report.summary.score,
            matched_count: report.summary.matched_count,
            missing_count: report.summary.missing_count,
            status: &report.summary.status,
            label_class,
            has_job_keywords: report.summary.has_job_keywords,
            no_keywords_warning: NO_JOB_KEYWORDS_WARNING,
            explanation: SCORE_EXPLANATION,
            display_limit: self.display_limit,
            matched,
            missing,
            matched_more: report.summary.matched_count - matched.len(),
            missing_more: report.summary.missing_count - missing.len(),
            has_feedback,
            feedback_text,
            feedback_model,
            fallback_note: FEEDBACK_FALLBACK_NOTE,
            include_metadata: self.include_metadata,
            version: &report.metadata.version,
            generated_at: format_timestamp(report),
            resume_source: &report.metadata.resume_source,
            job_source: &report.metadata.job_source,
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| JobFitError::OutputFormatting(e.to_string()))
    }
}

impl ReportGenerator {
    pub fn new(use_colors: bool, include_metadata: bool, display_limit: usize) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, include_metadata, display_limit),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(include_metadata, display_limit),
            html_formatter: HtmlFormatter::new(include_metadata, display_limit),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(true, true, 25)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::feedback::{FeedbackStyle, FeedbackUnavailable};
    use crate::processing::analyzer::AnalysisEngine;

    fn sample_report(feedback: FeedbackOutcome) -> AnalysisReport {
        let analysis = AnalysisEngine::new()
            .analyze(
                "Python developer with SQL experience",
                "Looking for Python and SQL expert. Python <script> required",
            )
            .unwrap();
        AnalysisReport::new(
            &analysis,
            feedback,
            ReportMetadata::new("resume.txt", "job.txt", FeedbackStyle::default()),
        )
    }

    fn generated() -> FeedbackOutcome {
        FeedbackOutcome::Generated {
            text: "Mention <b>SQL</b> projects.".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }

    #[test]
    fn test_console_plain_output() {
        let formatter = ConsoleFormatter::new(false, true, 25);
        let output = formatter
            .format_report(&sample_report(FeedbackOutcome::unavailable(FeedbackUnavailable::MissingApiKey)))
            .unwrap();

        assert!(output.contains("Job Fit Score:  33%  [Low match, needs fixes]"));
        assert!(output.contains("• python (2x in job)"));
        assert!(output.contains("• script (1x in job)"));
        assert!(output.contains("no API key was provided"));
        assert!(output.contains(FEEDBACK_FALLBACK_NOTE));
        assert!(output.contains(SCORE_EXPLANATION));
    }

    #[test]
    fn test_console_truncates_lists() {
        let formatter = ConsoleFormatter::new(false, true, 1);
        let output = formatter.format_report(&sample_report(generated())).unwrap();

        assert!(output.contains("(top 1)"));
        assert!(output.contains("... and 3 more"));
        assert!(output.contains("Mention <b>SQL</b> projects."));
    }

    #[test]
    fn test_console_empty_list_messages() {
        let text = "Rust engineer";
        let analysis = AnalysisEngine::new().analyze(text, text).unwrap();
        let report = AnalysisReport::new(
            &analysis,
            generated(),
            ReportMetadata::new("a", "b", FeedbackStyle::default()),
        );

        let output = ConsoleFormatter::new(false, true, 25).format_report(&report).unwrap();
        assert!(output.contains("Great! No major keyword gaps found."));
        assert!(output.contains("[Strong match]"));
    }

    #[test]
    fn test_json_contains_full_lists() {
        let output = JsonFormatter::new(false).format_report(&sample_report(generated())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["summary"]["score"], 33);
        assert_eq!(value["missing_keywords"].as_array().unwrap().len(), 4);
        assert_eq!(value["feedback"]["status"], "generated");
    }

    #[test]
    fn test_markdown_output() {
        let output = MarkdownFormatter::new(true, 25)
            .format_report(&sample_report(generated()))
            .unwrap();

        assert!(output.contains("| 33% | 2 | 4 | Low match, needs fixes |"));
        assert!(output.contains("- `python` (2x in job)"));
        assert!(output.contains("_Model: gpt-4o-mini_"));
        assert!(output.contains("`resume.txt`"));
    }

    #[test]
    fn test_html_escapes_feedback() {
        let output = HtmlFormatter::new(true, 25)
            .format_report(&sample_report(generated()))
            .unwrap();

        assert!(output.contains("<!DOCTYPE html>"));
        assert!(output.contains("33%"));
        assert!(output.contains("label-low"));
        assert!(output.contains("<li>python</li>"));
        assert!(output.contains("&#60;b&#62;SQL"));
        assert!(!output.contains("<b>SQL</b>"));
    }

    #[test]
    fn test_html_unavailable_feedback() {
        let output = HtmlFormatter::new(false, 25)
            .format_report(&sample_report(FeedbackOutcome::unavailable(FeedbackUnavailable::Disabled)))
            .unwrap();

        assert!(output.contains("AI feedback was disabled for this run."));
        assert!(!output.contains("Generated by JobFit"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::new(false, true, 25);
        let report = sample_report(generated());

        for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown, OutputFormat::Html] {
            assert!(!generator.generate_report(&report, format).unwrap().is_empty());
        }
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");

        save_report_to_file("# report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# report");
    }

    fn kafka_report() -> AnalysisReport {
        let analysis = AnalysisEngine::new()
            .analyze("kafka", "rust kafka terraform aws")
            .unwrap();
        AnalysisReport::new(
            &analysis,
            FeedbackOutcome::unavailable(FeedbackUnavailable::Disabled),
            ReportMetadata::new("resume.txt", "job.txt", FeedbackStyle::default()),
        )
    }

    #[test]
    fn test_zero_limit_keeps_counts_honest() {
        let report = kafka_report();
        assert_eq!(report.summary.matched_count, 1);
        assert_eq!(report.summary.missing_count, 3);

        let console = ConsoleFormatter::new(false, true, 0).format_report(&report).unwrap();
        assert!(!console.contains("Great! No major keyword gaps found."));
        assert!(!console.contains("No strong matches detected yet."));
        assert!(console.contains("  ... and 1 more"));
        assert!(console.contains("  ... and 3 more"));
        assert!(!console.contains("• kafka"));

        let markdown = MarkdownFormatter::new(false, 0).format_report(&report).unwrap();
        assert!(!markdown.contains("Great! No major keyword gaps found."));
        assert!(!markdown.contains("No strong matches detected yet."));
        assert!(markdown.contains("- ... and 3 more"));

        let html = HtmlFormatter::new(false, 0).format_report(&report).unwrap();
        assert!(!html.contains("Great! No major keyword gaps found."));
        assert!(!html.contains("No strong matches detected yet."));
        assert!(html.contains("<li>... and 1 more</li>"));
        assert!(html.contains("<li>... and 3 more</li>"));
    }

    #[test]
    fn test_console_metadata_can_be_hidden() {
        let report = kafka_report();

        let with_metadata = ConsoleFormatter::new(false, true, 25).format_report(&report).unwrap();
        assert!(with_metadata.contains("Generated: "));
        assert!(with_metadata.contains("Generated by JobFit v"));

        let without = ConsoleFormatter::new(false, false, 25).format_report(&report).unwrap();
        assert!(!without.contains("Generated: "));
        assert!(!without.contains("Processing time"));
        assert!(!without.contains("Generated by JobFit"));
        assert!(without.contains("Job Fit Score:  25%"));
    }
}
