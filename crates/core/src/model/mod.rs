mod identity;
mod ids;
mod question;
mod report;
mod result;
mod setup;

pub use identity::{Identity, IdentityError, Role};
pub use ids::{QuestionId, UserId};
pub use question::{
    Choice, ChoiceLabel, Difficulty, LabelError, Question, QuestionError, QuestionKind,
};
pub use report::ResultReport;
pub use result::{PASSING_PERCENTAGE, QuizResult, ScoreLevel, score_percentage};
pub use setup::{
    DEFAULT_QUESTION_COUNT, DEFAULT_TIME_LIMIT_SECS, MAX_QUESTIONS, QuizSetup, SetupError,
    TimeLimit,
};
