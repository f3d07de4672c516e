use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;
use crate::model::result::QuizResult;

/// Payload handed to the result-reporting collaborator after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub student_id: UserId,
    pub subject: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub time_taken_seconds: u32,
}

impl ResultReport {
    #[must_use]
    pub fn from_result(
        student_id: UserId,
        subject: impl Into<String>,
        result: &QuizResult,
        time_taken_seconds: u32,
    ) -> Self {
        Self {
            student_id,
            subject: subject.into(),
            total_questions: result.total_count(),
            correct_answers: result.correct_count(),
            time_taken_seconds,
        }
    }
}
