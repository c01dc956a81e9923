//! Gemini API provider implementation.
//!
//! Uses `generateContent` with a JSON response MIME type and a response
//! schema, so the model is constrained to the wire contract before
//! decoding even starts.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use skillmatch_core::error::FetchError;
use skillmatch_core::model::{Question, RecommendedProject, ResumeAnalysis};
use skillmatch_core::traits::{validate_questions, CareerAdvisor, QuestionSource};

use crate::payload;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: Option<String>, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }

    /// Issue a `generateContent` request constrained to JSON output and
    /// return the first candidate's text.
    async fn generate_json(
        &self,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<String, FetchError> {
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    FetchError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(FetchError::RateLimited {
                retry_after_ms: retry_after,
            });
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(FetchError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(FetchError::ApiError { status, message });
        }

        let api_response: GeminiResponse = response.json().await.map_err(|e| {
            FetchError::MalformedResponse(format!("failed to parse response envelope: {e}"))
        })?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| FetchError::MalformedResponse("no candidates in response".into()))
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn question_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": {"type": "STRING"},
                "options": {"type": "ARRAY", "items": {"type": "STRING"}},
                "correctAnswer": {"type": "INTEGER", "description": "0-based index of the correct option"},
                "difficulty": {"type": "STRING"}
            },
            "required": ["question", "options", "correctAnswer", "difficulty"]
        }
    })
}

fn resume_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "atsScore": {"type": "NUMBER"},
            "missingKeywords": {"type": "ARRAY", "items": {"type": "STRING"}},
            "improvements": {"type": "ARRAY", "items": {"type": "STRING"}},
            "relevanceToRole": {"type": "NUMBER"},
            "suggestedSummary": {"type": "STRING"}
        },
        "required": ["atsScore", "missingKeywords", "improvements", "relevanceToRole"]
    })
}

fn projects_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {"type": "STRING"},
                "difficulty": {"type": "STRING"},
                "techStack": {"type": "ARRAY", "items": {"type": "STRING"}},
                "roadmap": {"type": "ARRAY", "items": {"type": "STRING"}},
                "githubTemplate": {"type": "STRING"}
            },
            "required": ["title", "difficulty", "techStack", "roadmap"]
        }
    })
}

#[async_trait]
impl QuestionSource for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn fetch_questions(
        &self,
        domain: &str,
        count: u32,
    ) -> Result<Vec<Question>, FetchError> {
        let text = self
            .generate_json(payload::question_prompt(domain, count), question_schema())
            .await?;
        let questions = payload::decode_questions(&text)?;
        validate_questions(domain, questions)
    }
}

#[async_trait]
impl CareerAdvisor for GeminiProvider {
    #[instrument(skip(self, resume_text), fields(model = %self.model))]
    async fn analyze_resume(
        &self,
        resume_text: &str,
        target_role: Option<&str>,
    ) -> Result<ResumeAnalysis, FetchError> {
        let text = self
            .generate_json(payload::resume_prompt(resume_text, target_role), resume_schema())
            .await?;
        payload::decode_resume_analysis(&text)
    }

    #[instrument(skip(self, skills), fields(model = %self.model))]
    async fn recommend_projects(
        &self,
        skills: &[String],
        goal: &str,
    ) -> Result<Vec<RecommendedProject>, FetchError> {
        let text = self
            .generate_json(payload::projects_prompt(skills, goal), projects_schema())
            .await?;
        payload::decode_projects(&text)
    }
}
