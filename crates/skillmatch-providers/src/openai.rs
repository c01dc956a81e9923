//! OpenAI-compatible API provider implementation.
//!
//! Speaks the chat-completions endpoint with `response_format:
//! json_object`, so it also works against self-hosted gateways that
//! expose the same surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use skillmatch_core::error::FetchError;
use skillmatch_core::model::{Question, RecommendedProject, ResumeAnalysis};
use skillmatch_core::traits::{validate_questions, CareerAdvisor, QuestionSource};

use crate::payload;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const SYSTEM_PROMPT: &str = "You are a career development assistant. Respond ONLY with the \
requested JSON. Do not include explanations or markdown formatting.";

/// OpenAI-compatible API provider.
pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    model: String,
    org_id: Option<String>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        api_key: &str,
        model: Option<String>,
        base_url: Option<String>,
        org_id: Option<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            org_id,
            client,
        }
    }

    /// Issue a chat completion constrained to JSON and return the first
    /// choice's content.
    async fn generate_json(&self, prompt: String) -> Result<String, FetchError> {
        let body = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(|e| {
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
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::AuthenticationFailed(body));
        }
        if status == 404 {
            return Err(FetchError::ModelNotFound(self.model.clone()));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::ApiError {
                status,
                message: body,
            });
        }

        let api_response: OpenAiResponse = response.json().await.map_err(|e| {
            FetchError::MalformedResponse(format!("failed to parse response envelope: {e}"))
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| FetchError::MalformedResponse("no choices in response".into()))
    }
}

#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Deserialize)]
struct OpenAiChoiceMessage {
    content: String,
}

#[async_trait]
impl QuestionSource for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn fetch_questions(
        &self,
        domain: &str,
        count: u32,
    ) -> Result<Vec<Question>, FetchError> {
        let text = self
            .generate_json(payload::question_prompt(domain, count))
            .await?;
        let questions = payload::decode_questions(&text)?;
        validate_questions(domain, questions)
    }
}

#[async_trait]
impl CareerAdvisor for OpenAiProvider {
    #[instrument(skip(self, resume_text), fields(model = %self.model))]
    async fn analyze_resume(
        &self,
        resume_text: &str,
        target_role: Option<&str>,
    ) -> Result<ResumeAnalysis, FetchError> {
        let text = self
            .generate_json(payload::resume_prompt(resume_text, target_role))
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
            .generate_json(payload::projects_prompt(skills, goal))
            .await?;
        payload::decode_projects(&text)
    }
}
