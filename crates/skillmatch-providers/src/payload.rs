//! Prompt construction and payload decoding shared by the HTTP backends.
//!
//! Both backends speak the same JSON contract for each operation; what
//! differs is transport. Decoding rejects the whole payload on the first
//! structural mismatch — a missing field, an out-of-range index, an
//! unknown difficulty — so nothing malformed reaches a session.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use skillmatch_core::error::FetchError;
use skillmatch_core::model::{Difficulty, Question, RecommendedProject, ResumeAnalysis};
use skillmatch_core::traits::validate_score;

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

pub fn question_prompt(domain: &str, count: u32) -> String {
    format!(
        "Generate a {count}-question multiple choice test for the skill: {domain}. \
         Include diverse difficulties (Easy, Medium, Hard). \
         Respond with a JSON array of objects with fields \"question\", \"options\", \
         \"correctAnswer\" (0-based index of the correct option), and \"difficulty\"."
    )
}

pub fn resume_prompt(resume_text: &str, target_role: Option<&str>) -> String {
    let target = target_role
        .map(|role| format!(" Target Job: {role}."))
        .unwrap_or_default();
    format!(
        "Analyze this resume content: \"{resume_text}\".{target} \
         Evaluate based on ATS compatibility, keyword matching, formatting, and skill relevance. \
         Respond with a JSON object with fields \"atsScore\", \"missingKeywords\", \
         \"improvements\", \"relevanceToRole\", and \"suggestedSummary\"."
    )
}

pub fn projects_prompt(skills: &[String], goal: &str) -> String {
    format!(
        "Suggest 3 real-world portfolio projects for a developer with skills: {}. Goal: {goal}. \
         Respond with a JSON array of objects with fields \"title\", \"difficulty\", \
         \"techStack\", \"roadmap\", and \"githubTemplate\".",
        skills.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct McqDto {
    question: String,
    options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer: i64,
    difficulty: String,
}

#[derive(Deserialize)]
struct ResumeAnalysisDto {
    #[serde(rename = "atsScore")]
    ats_score: f64,
    #[serde(rename = "missingKeywords")]
    missing_keywords: Vec<String>,
    improvements: Vec<String>,
    #[serde(rename = "relevanceToRole")]
    relevance_to_role: f64,
    #[serde(rename = "suggestedSummary", default)]
    suggested_summary: Option<String>,
}

#[derive(Deserialize)]
struct ProjectDto {
    title: String,
    difficulty: String,
    #[serde(rename = "techStack")]
    tech_stack: Vec<String>,
    roadmap: Vec<String>,
    #[serde(rename = "githubTemplate", default)]
    github_template: Option<String>,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parse a JSON array, tolerating backends that wrap the array in a
/// single-key object (e.g. `{"questions": [...]}`).
fn decode_array<T: DeserializeOwned>(raw: &str, wrapper_key: &str) -> Result<Vec<T>, FetchError> {
    if let Ok(list) = serde_json::from_str::<Vec<T>>(raw) {
        return Ok(list);
    }
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {e}")))?;
    let inner = value
        .get(wrapper_key)
        .cloned()
        .ok_or_else(|| {
            FetchError::MalformedResponse(format!("expected array or {{\"{wrapper_key}\": [...]}}"))
        })?;
    serde_json::from_value(inner)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid {wrapper_key} array: {e}")))
}

/// Decode a question payload. Structural problems (negative answer
/// index, unknown difficulty) reject the whole payload; range and count
/// invariants are enforced again by `validate_questions` at the engine
/// boundary.
pub fn decode_questions(raw: &str) -> Result<Vec<Question>, FetchError> {
    let dtos: Vec<McqDto> = decode_array(raw, "questions")?;
    dtos.into_iter()
        .enumerate()
        .map(|(i, dto)| {
            if dto.correct_answer < 0 {
                return Err(FetchError::MalformedResponse(format!(
                    "question {i}: negative correct answer index"
                )));
            }
            let difficulty: Difficulty = dto.difficulty.parse().map_err(|e| {
                FetchError::MalformedResponse(format!("question {i}: {e}"))
            })?;
            Ok(Question {
                text: dto.question,
                options: dto.options,
                correct_index: dto.correct_answer as usize,
                difficulty,
            })
        })
        .collect()
}

/// Decode a resume analysis payload, validating scores into [0, 100].
pub fn decode_resume_analysis(raw: &str) -> Result<ResumeAnalysis, FetchError> {
    let dto: ResumeAnalysisDto = serde_json::from_str(raw)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid analysis: {e}")))?;
    Ok(ResumeAnalysis {
        ats_score: validate_score(dto.ats_score, "atsScore")?,
        missing_keywords: dto.missing_keywords,
        improvements: dto.improvements,
        relevance_to_role: validate_score(dto.relevance_to_role, "relevanceToRole")?,
        suggested_summary: dto.suggested_summary,
    })
}

/// Decode a project recommendation payload. An empty list is rejected.
pub fn decode_projects(raw: &str) -> Result<Vec<RecommendedProject>, FetchError> {
    let dtos: Vec<ProjectDto> = decode_array(raw, "projects")?;
    if dtos.is_empty() {
        return Err(FetchError::MalformedResponse(
            "no projects in response".into(),
        ));
    }
    Ok(dtos
        .into_iter()
        .map(|dto| RecommendedProject {
            title: dto.title,
            difficulty: dto.difficulty,
            tech_stack: dto.tech_stack,
            roadmap: dto.roadmap,
            github_template: dto.github_template,
        })
        .collect())
}
