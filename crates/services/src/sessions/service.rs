use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use gateway::ReportId;
use quiz_core::Clock;
use quiz_core::countdown::{Countdown, CountdownEvent};
use quiz_core::grading::{Selections, grade};
use quiz_core::model::{
    ChoiceLabel, Identity, Question, QuestionId, QuestionKind, QuizResult, ResultReport, TimeLimit,
};
use quiz_core::time::seconds_between;

use super::progress::SessionProgress;
use super::ticker::{ClockTick, TICK_PERIOD, Ticker};
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    /// Terminal. Navigation and selection are no-ops from here on.
    Submitted,
}

/// What triggered the transition to `Submitted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Manual,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Updated,
    /// The session was already submitted.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Cursor moved to this zero-based index.
    Moved(usize),
    /// Advancing past the last question submitted the session.
    Submitted(QuizResult),
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Ticked { remaining: u32, warning: bool },
    TimedOut(QuizResult),
    /// Late or irrelevant tick: no timer, or the session is already submitted.
    Ignored,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One timed (or untimed) attempt at a quiz.
///
/// Owns the question cursor, the answer selections and, for timed sessions,
/// the countdown plus the ticker task that drives it. The first of a manual
/// submission or a timeout grades the attempt; everything after that is a
/// no-op that returns the cached result.
pub struct QuizSession {
    identity: Identity,
    subject: String,
    questions: Vec<Question>,
    cursor: usize,
    selections: Selections,
    countdown: Option<Countdown>,
    ticker: Option<Ticker>,
    clock: Clock,
    started_at: DateTime<Utc>,
    submitted_at: Option<DateTime<Utc>>,
    submission: Option<Submission>,
    result: Option<QuizResult>,
    report_id: Option<ReportId>,
}

impl QuizSession {
    /// Create a session over an already-resolved question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        identity: Identity,
        subject: impl Into<String>,
        questions: Vec<Question>,
        time_limit: TimeLimit,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let clock = Clock::default_clock();
        Ok(Self {
            identity,
            subject: subject.into(),
            questions,
            cursor: 0,
            selections: Selections::new(),
            countdown: time_limit.as_secs().and_then(Countdown::new),
            ticker: None,
            clock,
            started_at: clock.now(),
            submitted_at: None,
            submission: None,
            result: None,
            report_id: None,
        })
    }

    /// Use `clock` for start/submit timestamps. Resets `started_at`.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self.started_at = clock.now();
        self
    }

    #[must_use]
    pub fn with_warning_threshold(mut self, secs: u32) -> Self {
        self.countdown = self
            .countdown
            .take()
            .map(|c| c.with_warning_threshold(secs));
        self
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.cursor]
    }

    #[must_use]
    pub fn selection_for(&self, question_id: QuestionId) -> Option<&BTreeSet<ChoiceLabel>> {
        self.selections.get(&question_id)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.result.is_some() {
            SessionPhase::Submitted
        } else {
            SessionPhase::InProgress
        }
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn submission(&self) -> Option<Submission> {
        self.submission
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.countdown.is_some()
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining_secs)
    }

    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_warning)
    }

    #[must_use]
    pub fn report_id(&self) -> Option<ReportId> {
        self.report_id
    }

    pub(crate) fn set_report_id(&mut self, id: ReportId) {
        self.report_id = Some(id);
    }

    /// Number of questions with at least one selected label.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.values().filter(|s| !s.is_empty()).count()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.questions.len(),
            answered: self.answered_count(),
            current: self.cursor,
            remaining_seconds: self.remaining_seconds(),
            is_submitted: self.is_submitted(),
        }
    }

    /// Seconds spent on the attempt.
    ///
    /// Timed sessions count the seconds the countdown consumed; untimed ones
    /// use the clock up to submission (or now).
    #[must_use]
    pub fn time_taken_seconds(&self) -> u32 {
        if let Some(countdown) = &self.countdown {
            return countdown.elapsed_secs();
        }
        match self.submitted_at {
            Some(end) => seconds_between(self.started_at, end),
            None => self.clock.seconds_since(self.started_at),
        }
    }

    /// Record a label for the current question.
    ///
    /// `Single` questions replace the previous label; `Multiple` questions
    /// toggle it. Only the question under the cursor can be answered.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` / `NotCurrentQuestion` for a
    /// question other than the current one and `SessionError::InvalidSelection`
    /// for a label that is not among its choices. State is unchanged on error.
    pub fn select_answer(
        &mut self,
        question_id: QuestionId,
        label: ChoiceLabel,
    ) -> Result<SelectOutcome, SessionError> {
        if self.is_submitted() {
            debug!(%question_id, %label, "selection after submission ignored");
            return Ok(SelectOutcome::Ignored);
        }

        let current = &self.questions[self.cursor];
        if current.id() != question_id {
            return Err(if self.questions.iter().any(|q| q.id() == question_id) {
                SessionError::NotCurrentQuestion(question_id)
            } else {
                SessionError::UnknownQuestion(question_id)
            });
        }
        if !current.has_label(label) {
            return Err(SessionError::InvalidSelection { question_id, label });
        }

        let kind = current.kind();
        let selected = self.selections.entry(question_id).or_default();
        match kind {
            QuestionKind::Single => {
                selected.clear();
                selected.insert(label);
            }
            QuestionKind::Multiple => {
                if !selected.remove(&label) {
                    selected.insert(label);
                }
            }
        }
        Ok(SelectOutcome::Updated)
    }

    /// Shorthand for answering whatever question is on screen.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::select_answer`].
    pub fn select_current(&mut self, label: ChoiceLabel) -> Result<SelectOutcome, SessionError> {
        let id = self.current_question().id();
        self.select_answer(id, label)
    }

    /// Move to the next question, or submit when on the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SelectionRequired` if the current question has
    /// no selected label; the cursor does not move.
    pub fn advance(&mut self) -> Result<Navigation, SessionError> {
        if self.is_submitted() {
            return Ok(Navigation::Ignored);
        }

        let current = self.current_question().id();
        if self
            .selections
            .get(&current)
            .is_none_or(BTreeSet::is_empty)
        {
            return Err(SessionError::SelectionRequired);
        }

        if self.cursor + 1 < self.questions.len() {
            self.cursor += 1;
            Ok(Navigation::Moved(self.cursor))
        } else {
            Ok(Navigation::Submitted(
                self.finish(Submission::Manual).clone(),
            ))
        }
    }

    pub fn retreat(&mut self) -> Navigation {
        if self.is_submitted() || self.cursor == 0 {
            return Navigation::Ignored;
        }
        self.cursor -= 1;
        Navigation::Moved(self.cursor)
    }

    /// Grade and close the session. Idempotent: later calls return the cached result.
    pub fn submit(&mut self) -> &QuizResult {
        self.finish(Submission::Manual)
    }

    /// Timer-driven submission. Skips the selection requirement.
    ///
    /// Returns `None` when the session was already submitted; the late
    /// timeout is swallowed.
    pub fn time_up(&mut self) -> Option<&QuizResult> {
        if self.is_submitted() {
            debug!("timeout after submission ignored");
            return None;
        }
        Some(self.finish(Submission::TimedOut))
    }

    /// Feed one elapsed second into the countdown.
    pub fn on_tick(&mut self) -> TickOutcome {
        if self.is_submitted() {
            debug!("tick after submission ignored");
            return TickOutcome::Ignored;
        }
        let Some(countdown) = self.countdown.as_mut() else {
            return TickOutcome::Ignored;
        };

        match countdown.tick() {
            CountdownEvent::Tick { remaining, warning } => {
                TickOutcome::Ticked { remaining, warning }
            }
            CountdownEvent::Expired => match self.time_up() {
                Some(result) => TickOutcome::TimedOut(result.clone()),
                None => TickOutcome::Ignored,
            },
            CountdownEvent::Stopped => TickOutcome::Ignored,
        }
    }

    /// Spawn the ticker for a timed session and hand back its tick stream.
    ///
    /// Returns `None` for untimed or already-submitted sessions, or if the
    /// ticker is already running. Must be called inside a tokio runtime.
    pub fn start_clock(&mut self) -> Option<mpsc::UnboundedReceiver<ClockTick>> {
        if self.is_submitted() || self.ticker.is_some() {
            return None;
        }
        let countdown = self.countdown.as_ref()?;
        debug!(duration = countdown.duration_secs(), "starting quiz clock");
        let (ticker, rx) = Ticker::spawn(TICK_PERIOD);
        self.ticker = Some(ticker);
        Some(rx)
    }

    /// Payload for the result reporter.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitted` before submission.
    pub fn build_report(&self) -> Result<ResultReport, SessionError> {
        let result = self.result.as_ref().ok_or(SessionError::NotSubmitted)?;
        Ok(ResultReport::from_result(
            self.identity.user_id(),
            self.subject.clone(),
            result,
            self.time_taken_seconds(),
        ))
    }

    fn finish(&mut self, how: Submission) -> &QuizResult {
        let Self {
            identity,
            questions,
            selections,
            countdown,
            ticker,
            clock,
            submitted_at,
            submission,
            result,
            ..
        } = self;

        result.get_or_insert_with(|| {
            // Tear the timer down before the result becomes observable.
            if let Some(countdown) = countdown.as_mut() {
                countdown.cancel();
            }
            if let Some(ticker) = ticker.take() {
                ticker.cancel();
            }

            let graded = grade(questions, selections);
            *submitted_at = Some(clock.now());
            *submission = Some(how);
            info!(
                user = %identity.user_id(),
                ?how,
                correct = graded.correct_count(),
                total = graded.total_count(),
                percentage = graded.percentage(),
                "quiz submitted"
            );
            graded
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("identity", &self.identity)
            .field("subject", &self.subject)
            .field("questions_len", &self.questions.len())
            .field("cursor", &self.cursor)
            .field("answered", &self.answered_count())
            .field("remaining_seconds", &self.remaining_seconds())
            .field("started_at", &self.started_at)
            .field("submission", &self.submission)
            .field("report_id", &self.report_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
