//! REST adapter for the quiz API.

mod mapping;

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{Question, ResultReport, UserId};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::repository::{GatewayError, QuestionSource, ReportId, ResultReporter, ResultRow};

pub use mapping::{QuestionRecord, ResultRecord};

pub const DEFAULT_BASE_URL: &str = "http://localhost:9192/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct HttpGatewayConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HttpGatewayConfig {
    /// Read `QUIZ_API_URL`, `QUIZ_API_TOKEN` and `QUIZ_API_TIMEOUT_SECS`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("QUIZ_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let token = env::var("QUIZ_API_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let timeout = env::var("QUIZ_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Self {
            base_url,
            token,
            timeout,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    config: HttpGatewayConfig,
}

impl HttpGateway {
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the underlying client cannot be built.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!(%method, %url, "quiz api request");
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

async fn check(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound);
    }
    if !status.is_success() {
        warn!(status = status.as_u16(), url = %response.url(), "quiz api rejected request");
        return Err(GatewayError::Status(status.as_u16()));
    }
    Ok(response)
}

#[async_trait]
impl QuestionSource for HttpGateway {
    async fn fetch_questions(
        &self,
        subject: &str,
        count: u32,
    ) -> Result<Vec<Question>, GatewayError> {
        let response = self
            .request(Method::GET, "/quizzes/quiz/fetch-questions-for-user")
            .query(&[
                ("numOfQuestions", count.to_string()),
                ("subject", subject.to_string()),
            ])
            .send()
            .await?;
        let records: Vec<QuestionRecord> = check(response).await?.json().await?;
        debug!(subject, fetched = records.len(), "questions fetched");

        records
            .into_iter()
            .map(|r| r.into_question().map_err(GatewayError::from))
            .collect()
    }

    async fn list_subjects(&self) -> Result<Vec<String>, GatewayError> {
        let response = self.request(Method::GET, "/quizzes/subjects").send().await?;
        Ok(check(response).await?.json().await?)
    }
}

#[async_trait]
impl ResultReporter for HttpGateway {
    async fn submit_result(&self, report: &ResultReport) -> Result<ReportId, GatewayError> {
        let response = self
            .request(Method::POST, "/quiz-results/submit")
            .query(&[
                ("studentId", report.student_id.to_string()),
                ("subject", report.subject.clone()),
                ("totalQuestions", report.total_questions.to_string()),
                ("correctAnswers", report.correct_answers.to_string()),
                ("timeTakenSeconds", report.time_taken_seconds.to_string()),
            ])
            .send()
            .await?;
        let record: ResultRecord = check(response).await?.json().await?;
        debug!(id = record.id, "result reported");
        Ok(record.id)
    }

    async fn results_for_student(&self, student: UserId) -> Result<Vec<ResultRow>, GatewayError> {
        let path = format!("/quiz-results/student/{student}");
        let response = self.request(Method::GET, &path).send().await?;
        let records: Vec<ResultRecord> = check(response).await?.json().await?;
        Ok(records.into_iter().map(|r| r.into_row(student)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let gateway = HttpGateway::new(
            HttpGatewayConfig::default().with_base_url("http://quiz.test/api/"),
        )
        .unwrap();
        assert_eq!(
            gateway.url("/quizzes/subjects"),
            "http://quiz.test/api/quizzes/subjects"
        );
        assert_eq!(
            gateway.url("quiz-results/student/3"),
            "http://quiz.test/api/quiz-results/student/3"
        );
    }

    #[test]
    fn default_config_points_at_local_api() {
        let config = HttpGatewayConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
