use quiz_core::model::{
    Choice, ChoiceLabel, Difficulty, Question, QuestionError, QuestionId, QuestionKind,
    ResultReport, UserId,
};
use serde::{Deserialize, Serialize};

use crate::repository::{ReportId, ResultRow};

/// Question as served by `/quizzes/...` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: u64,
    pub question: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub question_type: String,
    pub choices: Vec<String>,
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().value(),
            question: question.prompt().to_owned(),
            subject: question.subject().map(str::to_owned),
            question_type: question.kind().as_str().to_owned(),
            choices: question.choices().iter().map(Choice::to_string).collect(),
            correct_answers: question
                .correct_labels()
                .iter()
                .map(ChoiceLabel::to_string)
                .collect(),
            difficulty_level: question.difficulty().map(|d| format!("{d:?}").to_uppercase()),
        }
    }

    /// Validate the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for unknown types, malformed choices or labels,
    /// or any violated question invariant.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        let kind: QuestionKind = self.question_type.parse()?;
        let choices = self
            .choices
            .iter()
            .filter(|c| !c.trim().is_empty())
            .map(|c| Choice::parse(c))
            .collect::<Result<Vec<_>, _>>()?;
        let correct = self
            .correct_answers
            .iter()
            .map(|a| a.parse::<ChoiceLabel>())
            .collect::<Result<Vec<_>, _>>()?;
        let difficulty = self
            .difficulty_level
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()?;

        let question = Question::new(QuestionId::new(self.id), self.question, choices, correct, kind)?
            .with_difficulty(difficulty);
        Ok(match self.subject {
            Some(subject) => question.with_subject(subject),
            None => question,
        })
    }
}

/// Result as returned by `/quiz-results/...` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: ReportId,
    pub subject: String,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[serde(default)]
    pub score_percentage: Option<f64>,
    #[serde(default)]
    pub time_taken_seconds: Option<u32>,
}

impl ResultRecord {
    #[must_use]
    pub fn into_row(self, student_id: UserId) -> ResultRow {
        ResultRow {
            id: self.id,
            report: ResultReport {
                student_id,
                subject: self.subject,
                total_questions: self.total_questions,
                correct_answers: self.correct_answers,
                time_taken_seconds: self.time_taken_seconds.unwrap_or(0),
            },
        }
    }
}
