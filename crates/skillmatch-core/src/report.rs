//! Assessment result reports with JSON persistence.
//!
//! A report is cut the moment a session reaches a terminal phase. The
//! outcome distinguishes a normal submission from a violation
//! termination, so the result view can label the two differently even
//! though both carry a score.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{AssessmentSession, Phase, Violation};

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentOutcome {
    /// Submitted by the user (or by timer expiry).
    Completed,
    /// Terminated after reaching the violation limit; score forced to 0.
    TerminatedForViolations,
}

impl fmt::Display for AssessmentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentOutcome::Completed => write!(f, "submitted normally"),
            AssessmentOutcome::TerminatedForViolations => {
                write!(f, "terminated for violations")
            }
        }
    }
}

/// The persisted record of one assessment attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Session identifier.
    pub id: Uuid,
    /// When the report was cut.
    pub created_at: DateTime<Utc>,
    /// Skill domain assessed.
    pub domain: String,
    /// How the session ended.
    pub outcome: AssessmentOutcome,
    /// Final score in [0, 100].
    pub score: u8,
    /// Questions in the session.
    pub question_count: usize,
    /// Positions with a recorded answer.
    pub answered_count: usize,
    /// Positions answered correctly.
    pub correct_count: usize,
    /// The full anti-cheat log, in occurrence order.
    pub violations: Vec<Violation>,
    /// Wall-clock duration of the attempt in milliseconds.
    pub duration_ms: u64,
}

impl AssessmentReport {
    /// Cut a report from a session in a terminal phase. Returns `None`
    /// while the session is still live.
    pub fn from_session(session: &AssessmentSession) -> Option<Self> {
        let outcome = match session.phase() {
            Phase::Completed => AssessmentOutcome::Completed,
            Phase::Terminated => AssessmentOutcome::TerminatedForViolations,
            _ => return None,
        };
        let now = Utc::now();
        let duration_ms = (now - session.started_at()).num_milliseconds().max(0) as u64;
        Some(Self {
            id: session.id(),
            created_at: now,
            domain: session.domain().to_string(),
            outcome,
            score: session.score().unwrap_or(0),
            question_count: session.question_count(),
            answered_count: session.answered_count(),
            correct_count: session.correct_count(),
            violations: session.violations().to_vec(),
            duration_ms,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Human-readable result block for the terminal.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{} validation {}: {}%\n",
            self.domain, self.outcome, self.score
        ));
        out.push_str(&format!(
            "Answered {}/{} ({} correct)\n",
            self.answered_count, self.question_count, self.correct_count
        ));
        out.push_str(&format!(
            "Anti-cheat report: {} violation(s) recorded\n",
            self.violations.len()
        ));
        for v in &self.violations {
            out.push_str(&format!("  - {} at {}\n", v.kind, v.at.format("%H:%M:%S")));
        }
        out
    }
}
