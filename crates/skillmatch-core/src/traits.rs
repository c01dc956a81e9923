//! Trait definitions for the AI-backed collaborators.
//!
//! These async traits are implemented by the `skillmatch-providers`
//! crate. The engine and CLI only ever see these seams, never a concrete
//! backend.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::{Question, RecommendedProject, ResumeAnalysis};

// ---------------------------------------------------------------------------
// Question source trait
// ---------------------------------------------------------------------------

/// Supplies assessment questions for a skill domain.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Fetch an ordered question sequence for a domain. Implementations
    /// must return only payloads that pass [`validate_questions`]; the
    /// engine re-checks regardless.
    async fn fetch_questions(&self, domain: &str, count: u32)
        -> Result<Vec<Question>, FetchError>;
}

// ---------------------------------------------------------------------------
// Career advisor trait
// ---------------------------------------------------------------------------

/// AI advisor for resume analysis and portfolio project recommendations.
#[async_trait]
pub trait CareerAdvisor: Send + Sync {
    /// Analyze resume text for ATS compatibility, optionally against a
    /// target role.
    async fn analyze_resume(
        &self,
        resume_text: &str,
        target_role: Option<&str>,
    ) -> Result<ResumeAnalysis, FetchError>;

    /// Recommend portfolio projects for a skill set and career goal.
    async fn recommend_projects(
        &self,
        skills: &[String],
        goal: &str,
    ) -> Result<Vec<RecommendedProject>, FetchError>;
}

// ---------------------------------------------------------------------------
// Payload validation
// ---------------------------------------------------------------------------

/// Gate a question payload before it may enter a session. An empty list
/// or any malformed question rejects the whole payload; nothing is
/// partially accepted.
pub fn validate_questions(
    domain: &str,
    questions: Vec<Question>,
) -> Result<Vec<Question>, FetchError> {
    if questions.is_empty() {
        return Err(FetchError::EmptyQuestionSet {
            domain: domain.to_string(),
        });
    }
    for (i, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|reason| FetchError::MalformedResponse(format!("question {i}: {reason}")))?;
    }
    Ok(questions)
}

/// Validate a numeric score field from an AI payload into [0, 100].
/// Out-of-range or non-finite values reject the payload.
pub fn validate_score(value: f64, field: &str) -> Result<u8, FetchError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(FetchError::MalformedResponse(format!(
            "{field} {value} outside [0, 100]"
        )));
    }
    Ok(value.round() as u8)
}
