use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, ResultReport, UserId};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by collaborator adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("not found")]
    NotFound,

    #[error("request rejected with status {0}")]
    Status(u16),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid question record: {0}")]
    InvalidRecord(#[from] QuestionError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Identifier assigned by the reporter to a stored result.
pub type ReportId = i64;

/// A reported result as the reporter knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: ReportId,
    pub report: ResultReport,
}

/// Supplies the ordered question set for an attempt.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch up to `count` questions for `subject`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the questions cannot be fetched or fail validation.
    async fn fetch_questions(&self, subject: &str, count: u32)
    -> Result<Vec<Question>, GatewayError>;

    /// List the subjects questions can be drawn from.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the subject list cannot be fetched.
    async fn list_subjects(&self) -> Result<Vec<String>, GatewayError>;
}

/// Receives finished attempts.
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Hand a finished attempt to the reporter.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the report is rejected or cannot be delivered.
    async fn submit_result(&self, report: &ResultReport) -> Result<ReportId, GatewayError>;

    /// Fetch every reported result for a student, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the results cannot be fetched.
    async fn results_for_student(&self, student: UserId) -> Result<Vec<ResultRow>, GatewayError>;
}

/// In-memory collaborator for tests and the offline demo.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    questions: Arc<Mutex<Vec<Question>>>,
    results: Arc<Mutex<Vec<ResultRow>>>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a question, replacing any existing one with the same id.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Connection` if the lock is poisoned.
    pub fn insert_question(&self, question: Question) -> Result<(), GatewayError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        match guard.iter_mut().find(|q| q.id() == question.id()) {
            Some(existing) => *existing = question,
            None => guard.push(question),
        }
        Ok(())
    }

    /// Snapshot of everything reported so far.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Connection` if the lock is poisoned.
    pub fn reported(&self) -> Result<Vec<ResultRow>, GatewayError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

fn same_subject(question: &Question, subject: &str) -> bool {
    question
        .subject()
        .is_some_and(|s| s.eq_ignore_ascii_case(subject.trim()))
}

#[async_trait]
impl QuestionSource for InMemoryGateway {
    async fn fetch_questions(
        &self,
        subject: &str,
        count: u32,
    ) -> Result<Vec<Question>, GatewayError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        let take = usize::try_from(count).unwrap_or(usize::MAX);
        Ok(guard
            .iter()
            .filter(|q| same_subject(q, subject))
            .take(take)
            .cloned()
            .collect())
    }

    async fn list_subjects(&self) -> Result<Vec<String>, GatewayError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        let mut subjects: Vec<String> = guard
            .iter()
            .filter_map(|q| q.subject().map(str::to_owned))
            .collect();
        subjects.sort();
        subjects.dedup();
        Ok(subjects)
    }
}

#[async_trait]
impl ResultReporter for InMemoryGateway {
    async fn submit_result(&self, report: &ResultReport) -> Result<ReportId, GatewayError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        let id = ReportId::try_from(guard.len())
            .map_err(|_| GatewayError::Serialization("report id overflow".into()))?
            + 1;
        guard.push(ResultRow {
            id,
            report: report.clone(),
        });
        Ok(id)
    }

    async fn results_for_student(&self, student: UserId) -> Result<Vec<ResultRow>, GatewayError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| GatewayError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|row| row.report.student_id == student)
            .cloned()
            .collect())
    }
}

/// Bundles both collaborators behind trait objects so backends can be swapped.
#[derive(Clone)]
pub struct Gateway {
    pub questions: Arc<dyn QuestionSource>,
    pub results: Arc<dyn ResultReporter>,
}

impl Gateway {
    #[must_use]
    pub fn in_memory() -> (Self, InMemoryGateway) {
        let repo = InMemoryGateway::new();
        let questions: Arc<dyn QuestionSource> = Arc::new(repo.clone());
        let results: Arc<dyn ResultReporter> = Arc::new(repo.clone());
        (Self { questions, results }, repo)
    }

    /// Build a gateway that talks to the quiz REST API.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client cannot be built.
    pub fn http(config: crate::http::HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = Arc::new(crate::http::HttpGateway::new(config)?);
        let questions: Arc<dyn QuestionSource> = client.clone();
        let results: Arc<dyn ResultReporter> = client;
        Ok(Self { questions, results })
    }
}
