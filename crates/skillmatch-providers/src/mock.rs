//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use skillmatch_core::error::FetchError;
use skillmatch_core::model::{Difficulty, Question, RecommendedProject, ResumeAnalysis};
use skillmatch_core::traits::{CareerAdvisor, QuestionSource};

/// A mock AI provider for exercising the engine and CLI without real
/// API calls.
///
/// Returns configurable question banks keyed by domain, with canned
/// advisor responses.
pub struct MockProvider {
    /// Map of domain → question bank.
    banks: HashMap<String, Vec<Question>>,
    /// Bank used when no domain matches.
    default_bank: Vec<Question>,
    /// When set, every call fails with a network error.
    offline: bool,
    /// Number of calls made across all operations.
    call_count: AtomicU32,
    /// Last domain requested from the question source.
    last_domain: Mutex<Option<String>>,
}

/// A well-formed bank of `n` questions whose correct option is always 0.
pub fn fixed_bank(n: usize) -> Vec<Question> {
    (0..n)
        .map(|i| Question {
            text: format!("mock question {i}"),
            options: vec!["alpha".into(), "beta".into(), "gamma".into(), "delta".into()],
            correct_index: 0,
            difficulty: match i % 3 {
                0 => Difficulty::Easy,
                1 => Difficulty::Medium,
                _ => Difficulty::Hard,
            },
        })
        .collect()
}

impl MockProvider {
    /// Mock with per-domain question banks and a default bank of 5.
    pub fn new(banks: HashMap<String, Vec<Question>>) -> Self {
        Self {
            banks,
            default_bank: fixed_bank(5),
            offline: false,
            call_count: AtomicU32::new(0),
            last_domain: Mutex::new(None),
        }
    }

    /// Mock that serves the same `n`-question bank for every domain.
    pub fn with_fixed_questions(n: usize) -> Self {
        Self {
            banks: HashMap::new(),
            default_bank: fixed_bank(n),
            offline: false,
            call_count: AtomicU32::new(0),
            last_domain: Mutex::new(None),
        }
    }

    /// Mock where every call fails with a network error.
    pub fn offline() -> Self {
        Self {
            banks: HashMap::new(),
            default_bank: Vec::new(),
            offline: true,
            call_count: AtomicU32::new(0),
            last_domain: Mutex::new(None),
        }
    }

    /// Number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Last domain requested from the question source.
    pub fn last_domain(&self) -> Option<String> {
        self.last_domain.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.offline {
            Err(FetchError::NetworkError("mock provider offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl QuestionSource for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_questions(
        &self,
        domain: &str,
        count: u32,
    ) -> Result<Vec<Question>, FetchError> {
        self.check_online()?;
        *self.last_domain.lock().unwrap() = Some(domain.to_string());

        let bank = self
            .banks
            .get(domain)
            .cloned()
            .unwrap_or_else(|| self.default_bank.clone());
        Ok(bank.into_iter().take(count as usize).collect())
    }
}

#[async_trait]
impl CareerAdvisor for MockProvider {
    async fn analyze_resume(
        &self,
        _resume_text: &str,
        target_role: Option<&str>,
    ) -> Result<ResumeAnalysis, FetchError> {
        self.check_online()?;
        Ok(ResumeAnalysis {
            ats_score: 70,
            missing_keywords: vec!["Kubernetes".into()],
            improvements: vec!["Quantify achievements".into()],
            relevance_to_role: if target_role.is_some() { 75 } else { 50 },
            suggested_summary: Some("Mock summary.".into()),
        })
    }

    async fn recommend_projects(
        &self,
        skills: &[String],
        goal: &str,
    ) -> Result<Vec<RecommendedProject>, FetchError> {
        self.check_online()?;
        Ok(vec![RecommendedProject {
            title: format!("Portfolio project towards: {goal}"),
            difficulty: "Intermediate".into(),
            tech_stack: skills.to_vec(),
            roadmap: vec!["Scope it".into(), "Build it".into(), "Ship it".into()],
            github_template: None,
        }])
    }
}
