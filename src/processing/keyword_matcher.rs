//! Keyword overlap scoring between a resume and a job description

use crate::processing::text_processor::KeywordFrequencies;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Scores at or above this are a strong match.
pub const STRONG_MATCH_THRESHOLD: u8 = 80;
/// Scores at or above this (and below strong) are a good match.
pub const GOOD_MATCH_THRESHOLD: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitLabel {
    StrongMatch,
    GoodMatch,
    LowMatch,
}

impl FitLabel {
    pub fn from_score(score: u8) -> Self {
        if score >= STRONG_MATCH_THRESHOLD {
            FitLabel::StrongMatch
        } else if score >= GOOD_MATCH_THRESHOLD {
            FitLabel::GoodMatch
        } else {
            FitLabel::LowMatch
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitLabel::StrongMatch => "Strong match",
            FitLabel::GoodMatch => "Good match, needs improvement",
            FitLabel::LowMatch => "Low match, needs fixes",
        }
    }
}

impl fmt::Display for FitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of comparing two keyword sets.
///
/// `matched` and `missing` partition the job keyword set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub score: u8,
    pub label: FitLabel,
    pub resume_keyword_count: usize,
    pub job_keyword_count: usize,
}

impl MatchResult {
    /// False when the job description produced no keywords at all, in which
    /// case the score of 0 says nothing about the resume.
    pub fn has_job_keywords(&self) -> bool {
        self.job_keyword_count > 0
    }
}

/// A keyword with its counts in both documents, used for display ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedKeyword {
    pub keyword: String,
    pub job_count: usize,
    pub resume_count: usize,
}

/// Compare resume keywords against job keywords.
pub fn compute_match(resume: &KeywordFrequencies, job: &KeywordFrequencies) -> MatchResult {
    let mut matched = BTreeSet::new();
    let mut missing = BTreeSet::new();
    for keyword in job.keywords() {
        if resume.contains(keyword) {
            matched.insert(keyword.to_string());
        } else {
            missing.insert(keyword.to_string());
        }
    }

    let score = fit_score(matched.len(), job.len());

    MatchResult {
        label: FitLabel::from_score(score),
        score,
        matched,
        missing,
        resume_keyword_count: resume.len(),
        job_keyword_count: job.len(),
    }
}

/// `round(100 * matched / max(total, 1))` with halves rounding up.
pub fn fit_score(matched: usize, total: usize) -> u8 {
    let denominator = total.max(1);
    let rounded = (200 * matched + denominator) / (2 * denominator);
    rounded.min(100) as u8
}

/// Order keywords by job-description frequency (highest first), then alphabetically.
pub fn rank_keywords<'a, I>(
    keywords: I,
    job: &KeywordFrequencies,
    resume: &KeywordFrequencies,
) -> Vec<RankedKeyword>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut ranked: Vec<RankedKeyword> = keywords
        .into_iter()
        .map(|keyword| RankedKeyword {
            keyword: keyword.clone(),
            job_count: job.get(keyword),
            resume_count: resume.get(keyword),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.job_count
            .cmp(&a.job_count)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    ranked
}
