//! Prompt text for resume feedback

use crate::llm::feedback::FeedbackRequest;
use regex::{Captures, Regex};

pub const SYSTEM_PROMPT: &str = "You help users improve resumes honestly and clearly.";

/// Feedback prompt template with `{tone}`, `{detail}`, `{resume}` and `{job}` slots.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub feedback: String,
    placeholder_regex: Regex,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            feedback: FEEDBACK_TEMPLATE.to_string(),
            placeholder_regex: Regex::new(r"\{(tone|detail|resume|job)\}")
                .expect("Invalid placeholder regex"),
        }
    }
}

impl PromptTemplates {
    /// Fill every slot in one pass, so document text is never re-substituted.
    pub fn render_feedback(&self, request: &FeedbackRequest<'_>) -> String {
        let tone = request.style.tone.to_string();
        let detail = request.style.detail.to_string();

        self.placeholder_regex
            .replace_all(&self.feedback, |caps: &Captures| match &caps[1] {
                "tone" => tone.clone(),
                "detail" => detail.clone(),
                "resume" => request.resume_text.to_string(),
                _ => request.job_text.to_string(),
            })
            .into_owned()
    }
}

const FEEDBACK_TEMPLATE: &str = r#"You are JobFit, an honest career assistant.

Rules:
- Do NOT invent experience.
- Give actionable, specific feedback.
- Tone: {tone}
- Detail level: {detail}

Tasks:
1) Explain why the resume matches or doesn't match this job.
2) List TOP missing skills/keywords (only if relevant).
3) Suggest 3 resume improvements (content + structure).
4) Rewrite 2 bullet points ATS-friendly using ONLY existing information.

RESUME:
{resume}

JOB DESCRIPTION:
{job}
"#;
