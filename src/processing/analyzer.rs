//! Analysis engine: input validation, keyword scoring and feedback collection

use crate::error::{JobFitError, Result};
use crate::llm::feedback::{FeedbackGenerator, FeedbackRequest, FeedbackStyle};
use crate::output::report::{AnalysisReport, ReportMetadata};
use crate::processing::keyword_matcher::{compute_match, MatchResult};
use crate::processing::text_processor::{KeywordFrequencies, TextProcessor};
use log::{debug, info, warn};
use std::time::Instant;

/// A document's text plus where it came from (a path or "inline text").
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub text: String,
    pub source: String,
}

impl DocumentInput {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }

    pub fn inline(text: impl Into<String>) -> Self {
        Self::new(text, "inline text")
    }
}

/// Keyword frequencies of both documents and their comparison.
#[derive(Debug, Clone)]
pub struct KeywordAnalysis {
    pub resume_keywords: KeywordFrequencies,
    pub job_keywords: KeywordFrequencies,
    pub result: MatchResult,
}

pub struct AnalysisEngine {
    text_processor: TextProcessor,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            text_processor: TextProcessor::new(),
        }
    }

    /// Score the resume against the job description.
    ///
    /// Fails with [`JobFitError::EmptyInput`] when either text is blank.
    pub fn analyze(&self, resume_text: &str, job_text: &str) -> Result<KeywordAnalysis> {
        if resume_text.trim().is_empty() {
            return Err(JobFitError::EmptyInput("resume"));
        }
        if job_text.trim().is_empty() {
            return Err(JobFitError::EmptyInput("job description"));
        }

        let resume_keywords = self.text_processor.normalize_and_count(resume_text);
        let job_keywords = self.text_processor.normalize_and_count(job_text);
        debug!(
            "Extracted {} resume keywords and {} job keywords",
            resume_keywords.len(),
            job_keywords.len()
        );

        let result = compute_match(&resume_keywords, &job_keywords);
        if !result.has_job_keywords() {
            warn!("Job description produced no keywords");
        }

        Ok(KeywordAnalysis {
            resume_keywords,
            job_keywords,
            result,
        })
    }

    /// Full run: score, ask for feedback, assemble the report.
    pub async fn run<G: FeedbackGenerator>(
        &self,
        resume: &DocumentInput,
        job: &DocumentInput,
        generator: &G,
        style: FeedbackStyle,
    ) -> Result<AnalysisReport> {
        let start_time = Instant::now();

        let analysis = self.analyze(&resume.text, &job.text)?;
        info!(
            "Fit score {}% ({}), {} matched, {} missing",
            analysis.result.score,
            analysis.result.label,
            analysis.result.matched.len(),
            analysis.result.missing.len()
        );

        let request = FeedbackRequest {
            resume_text: &resume.text,
            job_text: &job.text,
            style,
        };
        let feedback = generator.generate(&request).await;

        let mut metadata = ReportMetadata::new(&resume.source, &job.source, style);
        metadata.processing_time_ms = start_time.elapsed().as_millis() as u64;

        Ok(AnalysisReport::new(&analysis, feedback, metadata))
    }
}
