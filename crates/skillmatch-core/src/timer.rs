//! Session countdown timer.
//!
//! Each session gets a fixed time budget. Expiry while the session is in
//! progress behaves exactly like an explicit submit; it is never a
//! violation. The timer is cancelled on every transition out of
//! `InProgress`, and an expiry check is tied to the session it was armed
//! for, so a stray expiry from an already-ended session is a no-op.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// Default time budget per session.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug)]
pub struct SessionTimer {
    budget: Duration,
    deadline: Option<Instant>,
    session: Option<Uuid>,
}

impl SessionTimer {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            deadline: None,
            session: None,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Arm the countdown for a session.
    pub fn start(&mut self, session: Uuid, now: Instant) {
        self.deadline = Some(now + self.budget);
        self.session = Some(session);
    }

    /// Disarm the countdown. Safe to call when already idle.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.session = None;
    }

    /// The armed deadline, if any. Hosts sleep until this to deliver the
    /// expiry event.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left on the countdown; zero once past the deadline.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Whether an expiry event for `session` is genuine: the timer must
    /// still be armed for that session and the deadline must have passed.
    pub fn is_expired_for(&self, session: Uuid, now: Instant) -> bool {
        self.session == Some(session)
            && self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_LIMIT)
    }
}
