//! Report structures produced by one analysis run

use crate::llm::feedback::{FeedbackOutcome, FeedbackStyle};
use crate::processing::analyzer::KeywordAnalysis;
use crate::processing::keyword_matcher::{rank_keywords, FitLabel, RankedKeyword};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown next to every score so readers know what it measures.
pub const SCORE_EXPLANATION: &str =
    "This score is based on keyword overlap. Improve by adding relevant skills and rewriting bullets with impact.";

/// Shown when the job description yields no keywords.
pub const NO_JOB_KEYWORDS_WARNING: &str =
    "No keywords could be extracted from the job description, so the score says nothing about the resume.";

/// Shown whenever feedback could not be produced.
pub const FEEDBACK_FALLBACK_NOTE: &str = "Score and skill breakdown are still valid.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,

    /// Every matched keyword, most frequent in the job description first
    pub matched_keywords: Vec<RankedKeyword>,

    /// Every missing keyword, most frequent in the job description first
    pub missing_keywords: Vec<RankedKeyword>,

    pub feedback: FeedbackOutcome,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Fit score (0-100)
    pub score: u8,
    pub label: FitLabel,
    /// Human-readable label
    pub status: String,
    pub matched_count: usize,
    pub missing_count: usize,
    pub resume_keyword_count: usize,
    pub job_keyword_count: usize,
    pub has_job_keywords: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub resume_source: String,
    pub job_source: String,
    pub style: FeedbackStyle,
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(resume_source: &str, job_source: &str, style: FeedbackStyle) -> Self {
        Self {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            resume_source: resume_source.to_string(),
            job_source: job_source.to_string(),
            style,
            processing_time_ms: 0,
        }
    }
}

impl AnalysisReport {
    pub fn new(analysis: &KeywordAnalysis, feedback: FeedbackOutcome, metadata: ReportMetadata) -> Self {
        let result = &analysis.result;

        let summary = AnalysisSummary {
            score: result.score,
            label: result.label,
            status: result.label.to_string(),
            matched_count: result.matched.len(),
            missing_count: result.missing.len(),
            resume_keyword_count: result.resume_keyword_count,
            job_keyword_count: result.job_keyword_count,
            has_job_keywords: result.has_job_keywords(),
        };

        Self {
            summary,
            matched_keywords: rank_keywords(&result.matched, &analysis.job_keywords, &analysis.resume_keywords),
            missing_keywords: rank_keywords(&result.missing, &analysis.job_keywords, &analysis.resume_keywords),
            feedback,
            metadata,
        }
    }

    pub fn top_matched(&self, limit: usize) -> &[RankedKeyword] {
        &self.matched_keywords[..limit.min(self.matched_keywords.len())]
    }

    pub fn top_missing(&self, limit: usize) -> &[RankedKeyword] {
        &self.missing_keywords[..limit.min(self.missing_keywords.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::feedback::FeedbackUnavailable;
    use crate::processing::analyzer::AnalysisEngine;

    fn report(resume: &str, job: &str) -> AnalysisReport {
        let analysis = AnalysisEngine::new().analyze(resume, job).unwrap();
        AnalysisReport::new(
            &analysis,
            FeedbackOutcome::unavailable(FeedbackUnavailable::Disabled),
            ReportMetadata::new("resume.txt", "job.txt", FeedbackStyle::default()),
        )
    }

    #[test]
    fn test_summary_mirrors_match_result() {
        let report = report(
            "Python developer with SQL experience",
            "Looking for Python and SQL expert",
        );

        assert_eq!(report.summary.score, 50);
        assert_eq!(report.summary.status, "Low match, needs fixes");
        assert_eq!(report.summary.matched_count, 2);
        assert_eq!(report.summary.missing_count, 2);
        assert_eq!(report.summary.job_keyword_count, 4);
        assert!(report.summary.has_job_keywords);
    }

    #[test]
    fn test_top_lists_are_truncated_in_rank_order() {
        let report = report(
            "kafka",
            "rust rust rust go go kafka terraform terraform aws helm",
        );

        let top: Vec<&str> = report.top_missing(2).iter().map(|k| k.keyword.as_str()).collect();
        assert_eq!(top, vec!["rust", "terraform"]);
        assert_eq!(report.missing_keywords.len(), 4);
        assert_eq!(report.top_matched(25).len(), 1);
        assert!(report.top_matched(0).is_empty());
    }

    #[test]
    fn test_report_json_shape() {
        let report = report("Rust", "Rust Kafka");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["summary"]["score"], 50);
        assert_eq!(json["summary"]["label"], "low_match");
        assert_eq!(json["matched_keywords"][0]["keyword"], "rust");
        assert_eq!(json["missing_keywords"][0]["keyword"], "kafka");
        assert_eq!(json["feedback"]["status"], "unavailable");
        assert_eq!(json["metadata"]["style"]["tone"], "professional");
    }
}
