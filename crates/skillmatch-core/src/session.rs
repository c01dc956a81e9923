//! The proctored assessment session state machine.
//!
//! One `AssessmentSession` represents a single attempt: created when a
//! domain is chosen, mutated by answer/navigation/violation events, and
//! frozen the moment it completes or is terminated. The session never
//! listens to the outside world itself; the engine feeds it already-typed
//! events one at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::model::Question;
use crate::scoring;

/// Number of violations that terminates a session. The increment that
/// *reaches* this count is terminal; the ones before it only warn.
pub const VIOLATION_LIMIT: u32 = 3;

/// Lifecycle phase of an assessment attempt.
///
/// `Idle` is the no-session state and only ever appears in snapshots; a
/// live `AssessmentSession` starts in `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Loading,
    InProgress,
    Completed,
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
            Phase::InProgress => write!(f, "in progress"),
            Phase::Completed => write!(f, "completed"),
            Phase::Terminated => write!(f, "terminated"),
        }
    }
}

/// Categories of anti-cheat violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    TabSwitch,
    FocusLoss,
    RightClick,
    ShortcutKey,
    FullscreenExit,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::TabSwitch => write!(f, "tab switching"),
            ViolationKind::FocusLoss => write!(f, "window focus loss"),
            ViolationKind::RightClick => write!(f, "right click"),
            ViolationKind::ShortcutKey => write!(f, "shortcut usage"),
            ViolationKind::FullscreenExit => write!(f, "fullscreen exit"),
        }
    }
}

/// One recorded violation, appended to the session's ordered log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub at: DateTime<Utc>,
}

/// What a violation event did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationOutcome {
    /// Phase was not `InProgress`; nothing was recorded.
    Ignored,
    /// Recorded; the session continues. `count` is the running total.
    Warning { count: u32 },
    /// Recorded; this violation reached the limit and terminated the
    /// session with a forced zero score.
    ThresholdReached { count: u32 },
}

/// Read-only view of session state handed to the presentation layer
/// after every transition.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub domain: String,
    pub cursor: usize,
    pub question_count: usize,
    pub current_question: Option<Question>,
    pub answers: Vec<Option<usize>>,
    pub violation_count: u32,
    pub score: Option<u8>,
}

impl SessionSnapshot {
    /// The snapshot shown when no session exists.
    pub fn idle() -> Self {
        Self {
            phase: Phase::Idle,
            domain: String::new(),
            cursor: 0,
            question_count: 0,
            current_question: None,
            answers: Vec::new(),
            violation_count: 0,
            score: None,
        }
    }
}

/// A single proctored assessment attempt.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    id: Uuid,
    domain: String,
    phase: Phase,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    cursor: usize,
    violations: Vec<Violation>,
    started_at: DateTime<Utc>,
}

impl AssessmentSession {
    /// Create a session in `Loading` for the given domain. Questions are
    /// not yet available; no answer or violation events are accepted.
    pub fn new(domain: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain: domain.to_string(),
            phase: Phase::Loading,
            questions: Vec::new(),
            answers: Vec::new(),
            cursor: 0,
            violations: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn violation_count(&self) -> u32 {
        self.violations.len() as u32
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn correct_count(&self) -> usize {
        scoring::correct_count(&self.questions, &self.answers)
    }

    /// `Loading -> InProgress`. Initializes the answer map to
    /// all-unanswered and the cursor to the first question. The caller
    /// has already validated the question payload.
    pub fn begin(&mut self, questions: Vec<Question>) {
        if self.phase != Phase::Loading {
            tracing::debug!(phase = %self.phase, "begin ignored outside Loading");
            return;
        }
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.cursor = 0;
        self.phase = Phase::InProgress;
    }

    /// Record the chosen option for a question position. Out-of-range
    /// positions or option indices are silent no-ops, as is any call
    /// outside `InProgress`. Returns whether an answer was recorded.
    pub fn select_answer(&mut self, question: usize, option: usize) -> bool {
        if self.phase != Phase::InProgress {
            return false;
        }
        let Some(q) = self.questions.get(question) else {
            tracing::debug!(question, "select_answer: position out of range");
            return false;
        };
        if option >= q.options.len() {
            tracing::debug!(question, option, "select_answer: option out of range");
            return false;
        }
        self.answers[question] = Some(option);
        true
    }

    /// Move the question cursor by `delta`, clamped to the valid range.
    /// Answering is not required before advancing.
    pub fn navigate(&mut self, delta: i64) {
        if self.phase != Phase::InProgress || self.questions.is_empty() {
            return;
        }
        let max = (self.questions.len() - 1) as i64;
        self.cursor = (self.cursor as i64 + delta).clamp(0, max) as usize;
    }

    /// Record a violation. Ignored entirely unless the session is
    /// `InProgress`. The increment that reaches [`VIOLATION_LIMIT`]
    /// terminates the session and freezes the answer map.
    pub fn record_violation(&mut self, kind: ViolationKind) -> ViolationOutcome {
        if self.phase != Phase::InProgress {
            return ViolationOutcome::Ignored;
        }
        self.violations.push(Violation {
            kind,
            at: Utc::now(),
        });
        let count = self.violation_count();
        if count >= VIOLATION_LIMIT {
            self.phase = Phase::Terminated;
            tracing::warn!(session = %self.id, %kind, count, "violation limit reached, terminating");
            ViolationOutcome::ThresholdReached { count }
        } else {
            tracing::info!(session = %self.id, %kind, count, limit = VIOLATION_LIMIT, "violation recorded");
            ViolationOutcome::Warning { count }
        }
    }

    /// `InProgress -> Completed` by explicit user action. Freezes the
    /// answer map. Returns whether the transition happened.
    pub fn submit(&mut self) -> bool {
        if self.phase != Phase::InProgress {
            return false;
        }
        self.phase = Phase::Completed;
        true
    }

    /// Final score, available once the session reaches a terminal phase.
    /// Termination for violations forces 0 regardless of recorded answers.
    pub fn score(&self) -> Option<u8> {
        match self.phase {
            Phase::Completed => Some(scoring::score_percent(&self.questions, &self.answers)),
            Phase::Terminated => Some(0),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            domain: self.domain.clone(),
            cursor: self.cursor,
            question_count: self.questions.len(),
            current_question: self.current_question().cloned(),
            answers: self.answers.clone(),
            violation_count: self.violation_count(),
            score: self.score(),
        }
    }
}
