use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on questions per attempt.
pub const MAX_QUESTIONS: u32 = 50;

/// Question count used when the caller does not choose one.
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Default time limit offered by the setup flow (10 minutes).
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 600;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetupError {
    #[error("subject cannot be empty")]
    EmptySubject,

    #[error("question count must be between 1 and {max}, got {count}")]
    QuestionCount { count: u32, max: u32 },

    #[error("invalid time limit: {0}")]
    InvalidTimeLimit(String),
}

/// Time allowed for an attempt.
///
/// `Unlimited` means no countdown is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeLimit {
    #[default]
    Unlimited,
    Seconds(NonZeroU32),
}

impl TimeLimit {
    /// Zero maps to `Unlimited`.
    #[must_use]
    pub fn from_secs(secs: u32) -> Self {
        NonZeroU32::new(secs).map_or(Self::Unlimited, Self::Seconds)
    }

    #[must_use]
    pub fn as_secs(self) -> Option<u32> {
        match self {
            TimeLimit::Unlimited => None,
            TimeLimit::Seconds(secs) => Some(secs.get()),
        }
    }
}

impl FromStr for TimeLimit {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "unlimited" | "none" | "no-limit" => Ok(Self::Unlimited),
            other => other
                .parse::<u32>()
                .map(Self::from_secs)
                .map_err(|_| SetupError::InvalidTimeLimit(trimmed.to_string())),
        }
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLimit::Unlimited => f.write_str("unlimited"),
            TimeLimit::Seconds(secs) => write!(f, "{secs}s"),
        }
    }
}

/// Parameters chosen before an attempt starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSetup {
    subject: String,
    question_count: u32,
    time_limit: TimeLimit,
}

impl QuizSetup {
    /// # Errors
    ///
    /// Returns `SetupError` if the subject is blank or the count is outside `1..=MAX_QUESTIONS`.
    pub fn new(
        subject: impl Into<String>,
        question_count: u32,
        time_limit: TimeLimit,
    ) -> Result<Self, SetupError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(SetupError::EmptySubject);
        }
        if question_count == 0 || question_count > MAX_QUESTIONS {
            return Err(SetupError::QuestionCount {
                count: question_count,
                max: MAX_QUESTIONS,
            });
        }
        Ok(Self {
            subject,
            question_count,
            time_limit,
        })
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn time_limit(&self) -> TimeLimit {
        self.time_limit
    }
}
