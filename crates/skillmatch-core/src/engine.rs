//! Central assessment coordinator.
//!
//! `AssessmentEngine` owns the single live session and is the only thing
//! that mutates it. Every user intent, environment signal, and timer
//! expiry is handled here, one event at a time, run to completion: the
//! model is single-threaded and event-driven, so no transition ever
//! observes a half-applied prior transition.

use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::detector::{EnvironmentSignal, ViolationDetector};
use crate::error::FetchError;
use crate::report::AssessmentReport;
use crate::session::{
    AssessmentSession, Phase, SessionSnapshot, ViolationKind, ViolationOutcome, VIOLATION_LIMIT,
};
use crate::timer::{SessionTimer, DEFAULT_TIME_LIMIT};
use crate::traits::{validate_questions, QuestionSource};

/// Configuration for the assessment engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Questions requested per session.
    pub question_count: u32,
    /// Time budget per session.
    pub time_limit: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            question_count: 5,
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }
}

/// Notification hooks for the presentation layer.
pub trait SessionObserver: Send + Sync {
    /// A violation below the limit was recorded.
    fn on_warning(&self, kind: ViolationKind, count: u32, limit: u32);
    /// The session reached the violation limit and was terminated.
    fn on_terminated(&self, report: &AssessmentReport);
    /// The session was submitted (explicitly or by timer expiry).
    fn on_completed(&self, report: &AssessmentReport);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_warning(&self, _: ViolationKind, _: u32, _: u32) {}
    fn on_terminated(&self, _: &AssessmentReport) {}
    fn on_completed(&self, _: &AssessmentReport) {}
}

/// Best-effort fullscreen hook provided by the host. Entering fullscreen
/// is a UX courtesy, not a gate: failures are logged and never block a
/// transition.
pub trait FullscreenControl: Send + Sync {
    fn enter(&self) -> anyhow::Result<()>;
    fn exit(&self) -> anyhow::Result<()>;
}

/// Fullscreen hook for hosts without a fullscreen concept.
pub struct NoopFullscreen;

impl FullscreenControl for NoopFullscreen {
    fn enter(&self) -> anyhow::Result<()> {
        Ok(())
    }
    fn exit(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The assessment coordinator. Exactly one session is live at a time;
/// `Idle` means none.
pub struct AssessmentEngine {
    source: Arc<dyn QuestionSource>,
    fullscreen: Arc<dyn FullscreenControl>,
    config: EngineConfig,
    session: Option<AssessmentSession>,
    detector: ViolationDetector,
    timer: SessionTimer,
    last_report: Option<AssessmentReport>,
}

impl AssessmentEngine {
    pub fn new(
        source: Arc<dyn QuestionSource>,
        fullscreen: Arc<dyn FullscreenControl>,
        config: EngineConfig,
    ) -> Self {
        let timer = SessionTimer::new(config.time_limit);
        Self {
            source,
            fullscreen,
            config,
            session: None,
            detector: ViolationDetector::new(),
            timer,
            last_report: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.session
            .as_ref()
            .map(|s| s.phase())
            .unwrap_or(Phase::Idle)
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session.as_ref().map(|s| s.id())
    }

    /// The report cut at the last terminal transition, until acknowledged.
    pub fn last_report(&self) -> Option<&AssessmentReport> {
        self.last_report.as_ref()
    }

    /// The armed timer deadline, for hosts that schedule the expiry event.
    pub fn timer_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Time left on the session countdown.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session
            .as_ref()
            .map(|s| s.snapshot())
            .unwrap_or_else(SessionSnapshot::idle)
    }

    /// `Idle -> Loading -> InProgress`. Fetches and validates questions
    /// for the domain; on any failure the engine returns to `Idle` with no
    /// session and surfaces the error (no retry). While the fetch is in
    /// flight the engine is exclusively borrowed, so no violation or
    /// answer event can interleave with `Loading`.
    pub async fn choose_domain(&mut self, domain: &str) -> Result<(), FetchError> {
        if self.phase() != Phase::Idle {
            tracing::debug!(phase = %self.phase(), "choose_domain ignored outside Idle");
            return Ok(());
        }
        let domain = domain.trim();
        if domain.is_empty() {
            tracing::debug!("choose_domain ignored: empty domain");
            return Ok(());
        }

        self.session = Some(AssessmentSession::new(domain));
        tracing::info!(domain, source = self.source.name(), "fetching questions");

        let fetched = self
            .source
            .fetch_questions(domain, self.config.question_count)
            .await
            .and_then(|questions| validate_questions(domain, questions));

        let questions = match fetched {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!(domain, error = %e, "question fetch failed, returning to idle");
                self.session = None;
                return Err(e);
            }
        };

        let session = self.session.as_mut().expect("session set above");
        session.begin(questions);
        let id = session.id();
        self.detector.arm();
        self.timer.start(id, Instant::now());
        if let Err(e) = self.fullscreen.enter() {
            tracing::debug!(error = %e, "fullscreen request failed");
        }
        tracing::info!(domain, session = %id, "assessment in progress");
        Ok(())
    }

    /// Record the chosen option for the current question.
    pub fn select_answer(&mut self, option: usize) {
        if let Some(session) = self.session.as_mut() {
            let cursor = session.cursor();
            session.select_answer(cursor, option);
        }
    }

    /// Move the question cursor, clamped to the question range.
    pub fn navigate(&mut self, delta: i64) {
        if let Some(session) = self.session.as_mut() {
            session.navigate(delta);
        }
    }

    /// Route an environment signal through the detector. Disarmed (any
    /// phase other than `InProgress`) signals translate to nothing.
    pub fn handle_signal(&mut self, signal: EnvironmentSignal, observer: &dyn SessionObserver) {
        let Some(kind) = self.detector.translate(signal) else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.record_violation(kind) {
            ViolationOutcome::Ignored => {}
            ViolationOutcome::Warning { count } => {
                observer.on_warning(kind, count, VIOLATION_LIMIT);
            }
            ViolationOutcome::ThresholdReached { .. } => {
                self.detector.disarm();
                self.timer.cancel();
                if let Err(e) = self.fullscreen.exit() {
                    tracing::debug!(error = %e, "fullscreen exit failed");
                }
                let report = AssessmentReport::from_session(self.session.as_ref().unwrap())
                    .expect("terminated session yields a report");
                observer.on_terminated(&report);
                self.last_report = Some(report);
            }
        }
    }

    /// Explicit submit. `InProgress -> Completed`; anywhere else, a no-op.
    pub fn submit(&mut self, observer: &dyn SessionObserver) {
        self.finish(observer);
    }

    /// Timer expiry for a session. Behaves exactly like `submit` when the
    /// expiry is genuine; a stray expiry (wrong session, already ended,
    /// or not yet due) is a no-op.
    pub fn handle_timer_expiry(
        &mut self,
        session: Uuid,
        now: Instant,
        observer: &dyn SessionObserver,
    ) {
        if !self.timer.is_expired_for(session, now) {
            tracing::debug!(%session, "stray timer expiry ignored");
            return;
        }
        tracing::info!(%session, "time budget exhausted, auto-submitting");
        self.finish(observer);
    }

    /// `Completed | Terminated -> Idle`: discard the session and its
    /// report. The next session starts with a fresh violation count.
    pub fn acknowledge(&mut self) {
        match self.phase() {
            Phase::Completed | Phase::Terminated => {
                self.session = None;
                self.last_report = None;
            }
            phase => {
                tracing::debug!(%phase, "acknowledge ignored");
            }
        }
    }

    fn finish(&mut self, observer: &dyn SessionObserver) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.submit() {
            return;
        }
        self.detector.disarm();
        self.timer.cancel();
        if let Err(e) = self.fullscreen.exit() {
            tracing::debug!(error = %e, "fullscreen exit failed");
        }
        let report = AssessmentReport::from_session(self.session.as_ref().unwrap())
            .expect("completed session yields a report");
        observer.on_completed(&report);
        self.last_report = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ModifierKey;
    use crate::model::{Difficulty, Question};
    use crate::report::AssessmentOutcome;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                text: format!("question {i}"),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: 0,
                difficulty: Difficulty::Medium,
            })
            .collect()
    }

    /// Question source yielding a fixed payload, or an error.
    struct StubSource {
        payload: Result<Vec<Question>, FetchError>,
    }

    impl StubSource {
        fn ok(n: usize) -> Arc<Self> {
            Arc::new(Self {
                payload: Ok(questions(n)),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                payload: Err(FetchError::NetworkError("connection refused".into())),
            })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self { payload: Ok(vec![]) })
        }
    }

    #[async_trait]
    impl QuestionSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_questions(
            &self,
            _domain: &str,
            _count: u32,
        ) -> Result<Vec<Question>, FetchError> {
            match &self.payload {
                Ok(q) => Ok(q.clone()),
                Err(FetchError::NetworkError(msg)) => {
                    Err(FetchError::NetworkError(msg.clone()))
                }
                Err(_) => unreachable!(),
            }
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        warnings: Mutex<Vec<(ViolationKind, u32)>>,
        completed: Mutex<Vec<AssessmentReport>>,
        terminated: Mutex<Vec<AssessmentReport>>,
    }

    impl SessionObserver for RecordingObserver {
        fn on_warning(&self, kind: ViolationKind, count: u32, _limit: u32) {
            self.warnings.lock().unwrap().push((kind, count));
        }
        fn on_terminated(&self, report: &AssessmentReport) {
            self.terminated.lock().unwrap().push(report.clone());
        }
        fn on_completed(&self, report: &AssessmentReport) {
            self.completed.lock().unwrap().push(report.clone());
        }
    }

    /// Fullscreen hook that counts calls and optionally fails.
    struct CountingFullscreen {
        enters: AtomicU32,
        exits: AtomicU32,
        fail: bool,
    }

    impl CountingFullscreen {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                enters: AtomicU32::new(0),
                exits: AtomicU32::new(0),
                fail,
            })
        }
    }

    impl FullscreenControl for CountingFullscreen {
        fn enter(&self) -> anyhow::Result<()> {
            self.enters.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                anyhow::bail!("fullscreen denied");
            }
            Ok(())
        }
        fn exit(&self) -> anyhow::Result<()> {
            self.exits.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn make_engine(source: Arc<dyn QuestionSource>) -> AssessmentEngine {
        AssessmentEngine::new(source, Arc::new(NoopFullscreen), EngineConfig::default())
    }

    #[tokio::test]
    async fn choose_domain_enters_in_progress() {
        let mut engine = make_engine(StubSource::ok(5));
        engine.choose_domain("React").await.unwrap();
        assert_eq!(engine.phase(), Phase::InProgress);

        let snap = engine.snapshot();
        assert_eq!(snap.question_count, 5);
        assert_eq!(snap.answers.len(), 5);
        assert_eq!(snap.violation_count, 0);
        assert!(engine.timer_deadline().is_some());
    }

    #[tokio::test]
    async fn fetch_failure_returns_to_idle_with_no_session() {
        let mut engine = make_engine(StubSource::failing());
        let err = engine.choose_domain("Rust").await.unwrap_err();
        assert!(matches!(err, FetchError::NetworkError(_)));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.session_id().is_none());
    }

    #[tokio::test]
    async fn empty_payload_is_a_fetch_error() {
        let mut engine = make_engine(StubSource::empty());
        let err = engine.choose_domain("Rust").await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyQuestionSet { .. }));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected_before_in_progress() {
        let mut bad = questions(3);
        bad[1].correct_index = 9;
        let source = Arc::new(StubSource { payload: Ok(bad) });
        let mut engine = make_engine(source);
        let err = engine.choose_domain("Rust").await.unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn empty_domain_is_ignored() {
        let mut engine = make_engine(StubSource::ok(5));
        engine.choose_domain("   ").await.unwrap();
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn choose_domain_is_ignored_while_a_session_is_live() {
        let mut engine = make_engine(StubSource::ok(5));
        engine.choose_domain("React").await.unwrap();
        let first = engine.session_id();
        engine.choose_domain("Go").await.unwrap();
        assert_eq!(engine.session_id(), first);
        assert_eq!(engine.snapshot().domain, "React");
    }

    #[tokio::test]
    async fn answering_and_submitting_scores_normally() {
        let mut engine = make_engine(StubSource::ok(5));
        let observer = RecordingObserver::default();
        engine.choose_domain("React").await.unwrap();

        // questions 0..=2 correct (option 0), 3 and 4 incorrect
        for i in 0..5 {
            engine.select_answer(if i < 3 { 0 } else { 1 });
            engine.navigate(1);
        }
        engine.submit(&observer);

        assert_eq!(engine.phase(), Phase::Completed);
        let report = engine.last_report().unwrap();
        assert_eq!(report.outcome, AssessmentOutcome::Completed);
        assert_eq!(report.score, 60);
        assert_eq!(observer.completed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn three_violations_terminate_with_zero_score() {
        let mut engine = make_engine(StubSource::ok(5));
        let observer = RecordingObserver::default();
        engine.choose_domain("Go").await.unwrap();

        for _ in 0..3 {
            engine.handle_signal(EnvironmentSignal::FocusLost, &observer);
        }

        assert_eq!(engine.phase(), Phase::Terminated);
        let report = engine.last_report().unwrap();
        assert_eq!(report.outcome, AssessmentOutcome::TerminatedForViolations);
        assert_eq!(report.score, 0);
        assert_eq!(report.violations.len(), 3);
        assert_eq!(observer.warnings.lock().unwrap().len(), 2);
        assert_eq!(observer.terminated.lock().unwrap().len(), 1);
        assert!(engine.timer_deadline().is_none());
    }

    #[tokio::test]
    async fn signals_after_termination_are_no_ops() {
        let mut engine = make_engine(StubSource::ok(5));
        let observer = RecordingObserver::default();
        engine.choose_domain("Go").await.unwrap();
        for _ in 0..3 {
            engine.handle_signal(EnvironmentSignal::VisibilityHidden, &observer);
        }
        engine.handle_signal(EnvironmentSignal::VisibilityHidden, &observer);

        assert_eq!(engine.last_report().unwrap().violations.len(), 3);
        assert_eq!(observer.terminated.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn signals_while_idle_are_no_ops() {
        let mut engine = make_engine(StubSource::ok(5));
        let observer = RecordingObserver::default();
        engine.handle_signal(
            EnvironmentSignal::ModifierKey(ModifierKey::Control),
            &observer,
        );
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(observer.warnings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn submit_then_signal_does_not_corrupt_the_report() {
        let mut engine = make_engine(StubSource::ok(3));
        let observer = RecordingObserver::default();
        engine.choose_domain("React").await.unwrap();
        engine.submit(&observer);
        engine.handle_signal(EnvironmentSignal::FullscreenExited, &observer);

        assert_eq!(engine.phase(), Phase::Completed);
        assert!(engine.last_report().unwrap().violations.is_empty());
    }

    #[tokio::test]
    async fn timer_expiry_auto_submits() {
        let source = StubSource::ok(4);
        let config = EngineConfig {
            question_count: 4,
            time_limit: Duration::ZERO,
        };
        let mut engine = AssessmentEngine::new(source, Arc::new(NoopFullscreen), config);
        let observer = RecordingObserver::default();
        engine.choose_domain("Python").await.unwrap();
        engine.select_answer(0);

        let id = engine.session_id().unwrap();
        engine.handle_timer_expiry(id, Instant::now(), &observer);

        assert_eq!(engine.phase(), Phase::Completed);
        let report = engine.last_report().unwrap();
        assert_eq!(report.outcome, AssessmentOutcome::Completed);
        assert_eq!(report.score, 25);
    }

    #[tokio::test]
    async fn stray_timer_expiry_is_ignored() {
        let mut engine = make_engine(StubSource::ok(4));
        let observer = RecordingObserver::default();
        engine.choose_domain("Python").await.unwrap();

        // wrong session id, and a genuine id before its deadline
        engine.handle_timer_expiry(Uuid::new_v4(), Instant::now(), &observer);
        let id = engine.session_id().unwrap();
        engine.handle_timer_expiry(id, Instant::now(), &observer);

        assert_eq!(engine.phase(), Phase::InProgress);
        assert!(observer.completed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn acknowledge_resets_to_idle_for_a_fresh_session() {
        let mut engine = make_engine(StubSource::ok(5));
        let observer = RecordingObserver::default();
        engine.choose_domain("Go").await.unwrap();
        for _ in 0..3 {
            engine.handle_signal(EnvironmentSignal::FocusLost, &observer);
        }
        engine.acknowledge();

        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.last_report().is_none());
        assert_eq!(engine.snapshot().violation_count, 0);

        engine.choose_domain("React").await.unwrap();
        assert_eq!(engine.snapshot().violation_count, 0);
        assert_eq!(engine.phase(), Phase::InProgress);
    }

    #[tokio::test]
    async fn acknowledge_mid_session_is_ignored() {
        let mut engine = make_engine(StubSource::ok(5));
        engine.choose_domain("Go").await.unwrap();
        engine.acknowledge();
        assert_eq!(engine.phase(), Phase::InProgress);
    }

    #[tokio::test]
    async fn fullscreen_failure_never_blocks_the_session() {
        let fullscreen = CountingFullscreen::new(true);
        let mut engine = AssessmentEngine::new(
            StubSource::ok(3),
            fullscreen.clone(),
            EngineConfig::default(),
        );
        let observer = RecordingObserver::default();
        engine.choose_domain("React").await.unwrap();
        assert_eq!(engine.phase(), Phase::InProgress);
        assert_eq!(fullscreen.enters.load(Ordering::Relaxed), 1);

        engine.submit(&observer);
        assert_eq!(engine.phase(), Phase::Completed);
        assert_eq!(fullscreen.exits.load(Ordering::Relaxed), 1);
    }
}
