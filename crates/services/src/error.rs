//! Shared error types for the services crate.

use thiserror::Error;

use gateway::GatewayError;
use quiz_core::model::{ChoiceLabel, QuestionId, SetupError};

/// Errors emitted by the quiz session and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("select an answer before moving on")]
    SelectionRequired,
    #[error("{label} is not a choice of question {question_id}")]
    InvalidSelection {
        question_id: QuestionId,
        label: ChoiceLabel,
    },
    #[error("question {0} is not part of this session")]
    UnknownQuestion(QuestionId),
    #[error("question {0} is not the current question")]
    NotCurrentQuestion(QuestionId),
    #[error("session has not been submitted yet")]
    NotSubmitted,
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
