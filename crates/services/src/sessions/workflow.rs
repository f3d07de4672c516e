use std::sync::Arc;

use tracing::{info, warn};

use gateway::{Gateway, QuestionSource, ReportId, ResultReporter, ResultRow};
use quiz_core::countdown::DEFAULT_WARNING_SECS;
use quiz_core::model::{Identity, QuizSetup, UserId};

use super::plan::SessionPlanner;
use super::service::QuizSession;
use crate::Clock;
use crate::error::SessionError;

/// Orchestrates quiz start and result reporting against the collaborators.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    questions: Arc<dyn QuestionSource>,
    results: Arc<dyn ResultReporter>,
    shuffle: bool,
    warning_threshold: u32,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionSource>,
        results: Arc<dyn ResultReporter>,
    ) -> Self {
        Self {
            clock,
            questions,
            results,
            shuffle: false,
            warning_threshold: DEFAULT_WARNING_SECS,
        }
    }

    #[must_use]
    pub fn from_gateway(clock: Clock, gateway: &Gateway) -> Self {
        Self::new(clock, gateway.questions.clone(), gateway.results.clone())
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_warning_threshold(mut self, secs: u32) -> Self {
        self.warning_threshold = secs;
        self
    }

    /// Fetch, plan and open a session for `identity`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Gateway` if the questions cannot be fetched and
    /// `SessionError::Empty` if none are available for the subject.
    pub async fn start_quiz(
        &self,
        identity: Identity,
        setup: &QuizSetup,
    ) -> Result<QuizSession, SessionError> {
        let fetched = self
            .questions
            .fetch_questions(setup.subject(), setup.question_count())
            .await?;
        let plan = SessionPlanner::new(setup.question_count())
            .with_shuffle(self.shuffle)
            .plan(fetched)?;
        if plan.duplicates_dropped > 0 {
            warn!(
                dropped = plan.duplicates_dropped,
                "question source returned duplicate ids"
            );
        }

        info!(
            user = %identity.user_id(),
            role = %identity.role(),
            subject = setup.subject(),
            questions = plan.total(),
            time_limit = %setup.time_limit(),
            "quiz started"
        );
        Ok(QuizSession::new(
            identity,
            setup.subject(),
            plan.questions,
            setup.time_limit(),
        )?
        .with_clock(self.clock)
        .with_warning_threshold(self.warning_threshold))
    }

    /// Hand a submitted session to the reporter once.
    ///
    /// Later calls return the id from the first successful report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitted` before submission and
    /// `SessionError::Gateway` if the reporter rejects the result.
    pub async fn report_result(&self, session: &mut QuizSession) -> Result<ReportId, SessionError> {
        if let Some(id) = session.report_id() {
            return Ok(id);
        }
        let report = session.build_report()?;
        let id = self.results.submit_result(&report).await?;
        session.set_report_id(id);
        info!(
            id,
            user = %report.student_id,
            correct = report.correct_answers,
            total = report.total_questions,
            "quiz result reported"
        );
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Gateway` if the subjects cannot be fetched.
    pub async fn list_subjects(&self) -> Result<Vec<String>, SessionError> {
        Ok(self.questions.list_subjects().await?)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Gateway` if the results cannot be fetched.
    pub async fn results_for(&self, student: UserId) -> Result<Vec<ResultRow>, SessionError> {
        Ok(self.results.results_for_student(student).await?)
    }
}
