//! Core data model types for skillmatch.
//!
//! These are the fundamental types the entire skillmatch system uses to
//! represent assessment questions, user profiles, and AI advisor results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single multiple-choice question delivered during an assessment.
///
/// Immutable once validated; the engine never mutates a loaded question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The question text.
    pub text: String,
    /// Ordered answer options. A valid question has at least two.
    pub options: Vec<String>,
    /// Zero-based index of the correct option.
    pub correct_index: usize,
    /// Difficulty tier.
    pub difficulty: Difficulty,
}

impl Question {
    /// Check the structural invariants a question must satisfy before it
    /// may enter a session.
    pub fn validate(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text is empty".into());
        }
        if self.options.len() < 2 {
            return Err(format!(
                "question has {} option(s), need at least 2",
                self.options.len()
            ));
        }
        if self.correct_index >= self.options.len() {
            return Err(format!(
                "correct index {} out of range for {} options",
                self.correct_index,
                self.options.len()
            ));
        }
        Ok(())
    }
}

/// Question difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A user's career profile. The one record the application persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier.
    pub id: uuid::Uuid,
    /// Full display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Highest education attained.
    #[serde(default)]
    pub education: String,
    /// Self-reported skills, used for job matching and project advice.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Experience bracket.
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    /// Aggregate employability score in [0, 100].
    #[serde(default)]
    pub employability_score: u8,
    /// Account standing.
    #[serde(default)]
    pub status: AccountStatus,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Home location.
    #[serde(default)]
    pub location: Option<String>,
}

impl UserProfile {
    /// Fabricate a fresh profile record for a new user.
    pub fn new(full_name: &str, email: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            education: String::new(),
            skills: Vec::new(),
            experience_level: ExperienceLevel::Entry,
            employability_score: 50,
            status: AccountStatus::Normal,
            bio: None,
            location: None,
        }
    }
}

/// Experience brackets for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Mid,
    Senior,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Entry => write!(f, "Entry"),
            ExperienceLevel::Mid => write!(f, "Mid"),
            ExperienceLevel::Senior => write!(f, "Senior"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entry" | "junior" => Ok(ExperienceLevel::Entry),
            "mid" => Ok(ExperienceLevel::Mid),
            "senior" => Ok(ExperienceLevel::Senior),
            other => Err(format!("unknown experience level: {other}")),
        }
    }
}

/// Account standing, escalated by repeated proctoring violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    #[default]
    Normal,
    Warning,
    Restricted,
    Blocked,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Normal => write!(f, "Normal"),
            AccountStatus::Warning => write!(f, "Warning"),
            AccountStatus::Restricted => write!(f, "Restricted"),
            AccountStatus::Blocked => write!(f, "Blocked"),
        }
    }
}

/// ATS analysis of a resume, as returned by a `CareerAdvisor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    /// ATS compatibility score in [0, 100].
    pub ats_score: u8,
    /// Keywords the target role expects but the resume lacks.
    pub missing_keywords: Vec<String>,
    /// Concrete improvement suggestions.
    pub improvements: Vec<String>,
    /// Relevance to the target role in [0, 100].
    pub relevance_to_role: u8,
    /// A rewritten professional summary, when the advisor offers one.
    #[serde(default)]
    pub suggested_summary: Option<String>,
}

/// A portfolio project recommended by a `CareerAdvisor`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedProject {
    /// Project title.
    pub title: String,
    /// Free-form difficulty label (advisors use their own scale here).
    pub difficulty: String,
    /// Technologies the project exercises.
    pub tech_stack: Vec<String>,
    /// Ordered build steps.
    pub roadmap: Vec<String>,
    /// A starter repository, when the advisor knows one.
    #[serde(default)]
    pub github_template: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize, correct: usize) -> Question {
        Question {
            text: "What does the borrow checker enforce?".into(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            correct_index: correct,
            difficulty: Difficulty::Medium,
        }
    }

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Easy.to_string(), "Easy");
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("brutal".parse::<Difficulty>().is_err());
    }

    #[test]
    fn question_validate_accepts_well_formed() {
        assert!(question(4, 2).validate().is_ok());
    }

    #[test]
    fn question_validate_rejects_single_option() {
        assert!(question(1, 0).validate().is_err());
    }

    #[test]
    fn question_validate_rejects_out_of_range_answer() {
        assert!(question(4, 4).validate().is_err());
    }

    #[test]
    fn question_validate_rejects_blank_text() {
        let mut q = question(3, 0);
        q.text = "   ".into();
        assert!(q.validate().is_err());
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = question(4, 1);
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.correct_index, 1);
        assert_eq!(back.difficulty, Difficulty::Medium);
        assert_eq!(back.options.len(), 4);
    }

    #[test]
    fn new_profile_defaults() {
        let profile = UserProfile::new("Alex Chen", "alex.chen@example.com");
        assert_eq!(profile.experience_level, ExperienceLevel::Entry);
        assert_eq!(profile.status, AccountStatus::Normal);
        assert_eq!(profile.employability_score, 50);
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn profile_serde_tolerates_missing_optionals() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "full_name": "Alex Chen",
            "email": "alex.chen@example.com"
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.status, AccountStatus::Normal);
        assert!(profile.bio.is_none());
    }
}
