use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors raised while parsing a choice label.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LabelError {
    #[error("choice label is empty")]
    Empty,

    #[error("choice label must be a single letter, got {0:?}")]
    NotALetter(String),
}

/// Errors raised when a question violates its structural invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least 2 choices, got {count}")]
    TooFewChoices { count: usize },

    #[error("choice label {0} appears more than once")]
    DuplicateLabel(ChoiceLabel),

    #[error("choice {0:?} is not of the form \"A. text\"")]
    InvalidChoice(String),

    #[error("question has no correct answer")]
    NoCorrectAnswer,

    #[error("correct answer {0} is not one of the choices")]
    UnknownCorrectLabel(ChoiceLabel),

    #[error("single-choice question must have exactly 1 correct answer, got {count}")]
    SingleWithManyCorrect { count: usize },

    #[error("unknown question type: {0}")]
    UnknownKind(String),

    #[error("unknown difficulty level: {0}")]
    UnknownDifficulty(String),

    #[error(transparent)]
    Label(#[from] LabelError),
}

//
// ─── CHOICE LABEL ─────────────────────────────────────────────────────────────
//

/// Single uppercase letter identifying a choice ("A", "B", ...).
///
/// Construction normalises to uppercase, so comparing two labels is always
/// case-insensitive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChoiceLabel(char);

impl ChoiceLabel {
    /// Build a label from a single ASCII letter, in either case.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::NotALetter` for anything outside `A-Z` / `a-z`.
    pub fn new(value: char) -> Result<Self, LabelError> {
        if value.is_ascii_alphabetic() {
            Ok(Self(value.to_ascii_uppercase()))
        } else {
            Err(LabelError::NotALetter(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl FromStr for ChoiceLabel {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let Some(first) = chars.next() else {
            return Err(LabelError::Empty);
        };
        if chars.next().is_some() {
            return Err(LabelError::NotALetter(trimmed.to_string()));
        }
        Self::new(first)
    }
}

impl fmt::Debug for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChoiceLabel({})", self.0)
    }
}

impl fmt::Display for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── CHOICE ───────────────────────────────────────────────────────────────────
//

/// One labelled answer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    label: ChoiceLabel,
    text: String,
}

impl Choice {
    #[must_use]
    pub fn new(label: ChoiceLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into().trim().to_string(),
        }
    }

    /// Parse the wire form `"A. text"` (also accepts `"A) text"` and `"A: text"`).
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidChoice` when the string does not start with
    /// a letter followed by a separator or whitespace.
    pub fn parse(raw: &str) -> Result<Self, QuestionError> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        let first = chars
            .next()
            .ok_or_else(|| QuestionError::InvalidChoice(raw.to_string()))?;
        let label =
            ChoiceLabel::new(first).map_err(|_| QuestionError::InvalidChoice(raw.to_string()))?;

        let rest = chars.as_str();
        let text = match rest.chars().next() {
            Some('.' | ')' | ':') => &rest[1..],
            Some(c) if c.is_whitespace() => rest,
            None => rest,
            Some(_) => return Err(QuestionError::InvalidChoice(raw.to_string())),
        };

        Ok(Self::new(label, text))
    }

    #[must_use]
    pub fn label(&self) -> ChoiceLabel {
        self.label
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.label, self.text)
    }
}

//
// ─── KIND / DIFFICULTY ────────────────────────────────────────────────────────
//

/// Selection semantics for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// Exactly one correct label; reselecting replaces the previous choice.
    Single,
    /// One or more correct labels; selecting toggles membership.
    Multiple,
}

impl QuestionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Single => "single",
            QuestionKind::Multiple => "multiple",
        }
    }
}

impl FromStr for QuestionKind {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multiple" => Ok(Self::Multiple),
            _ => Err(QuestionError::UnknownKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Ok(Self::Beginner),
            "INTERMEDIATE" => Ok(Self::Intermediate),
            "ADVANCED" => Ok(Self::Advanced),
            _ => Err(QuestionError::UnknownDifficulty(s.to_string())),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A validated quiz question.
///
/// Invariants:
/// - at least two choices, each with a distinct label
/// - `correct_labels` is non-empty and a subset of the choice labels
/// - a `Single` question has exactly one correct label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    choices: Vec<Choice>,
    correct_labels: BTreeSet<ChoiceLabel>,
    kind: QuestionKind,
    subject: Option<String>,
    difficulty: Option<Difficulty>,
}

impl Question {
    /// Validate and build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any structural invariant is violated.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        choices: Vec<Choice>,
        correct_labels: impl IntoIterator<Item = ChoiceLabel>,
        kind: QuestionKind,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        if choices.len() < 2 {
            return Err(QuestionError::TooFewChoices {
                count: choices.len(),
            });
        }

        let mut labels = BTreeSet::new();
        for choice in &choices {
            if !labels.insert(choice.label()) {
                return Err(QuestionError::DuplicateLabel(choice.label()));
            }
        }

        let correct_labels: BTreeSet<ChoiceLabel> = correct_labels.into_iter().collect();
        if correct_labels.is_empty() {
            return Err(QuestionError::NoCorrectAnswer);
        }
        if let Some(unknown) = correct_labels.iter().find(|l| !labels.contains(l)) {
            return Err(QuestionError::UnknownCorrectLabel(*unknown));
        }
        if kind == QuestionKind::Single && correct_labels.len() != 1 {
            return Err(QuestionError::SingleWithManyCorrect {
                count: correct_labels.len(),
            });
        }

        Ok(Self {
            id,
            prompt,
            choices,
            correct_labels,
            kind,
            subject: None,
            difficulty: None,
        })
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        self.subject = (!subject.trim().is_empty()).then(|| subject.trim().to_string());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    #[must_use]
    pub fn correct_labels(&self) -> &BTreeSet<ChoiceLabel> {
        &self.correct_labels
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Returns true if `label` names one of this question's choices.
    #[must_use]
    pub fn has_label(&self, label: ChoiceLabel) -> bool {
        self.choices.iter().any(|c| c.label() == label)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> ChoiceLabel {
        s.parse().unwrap()
    }

    fn choices(raw: &[&str]) -> Vec<Choice> {
        raw.iter().map(|c| Choice::parse(c).unwrap()).collect()
    }

    #[test]
    fn label_parsing_is_case_insensitive() {
        assert_eq!(label("b"), label("B"));
        assert_eq!(label(" c ").as_char(), 'C');
        assert_eq!("".parse::<ChoiceLabel>(), Err(LabelError::Empty));
        assert!("AB".parse::<ChoiceLabel>().is_err());
        assert!("1".parse::<ChoiceLabel>().is_err());
    }

    #[test]
    fn choice_parses_wire_form() {
        let choice = Choice::parse("B. Confidentiality, Integrity, Availability").unwrap();
        assert_eq!(choice.label(), label("B"));
        assert_eq!(choice.text(), "Confidentiality, Integrity, Availability");
        assert_eq!(choice.to_string(), "B. Confidentiality, Integrity, Availability");

        assert_eq!(Choice::parse("c) Firewall").unwrap().text(), "Firewall");
        assert!(matches!(
            Choice::parse("Virus"),
            Err(QuestionError::InvalidChoice(_))
        ));
    }

    #[test]
    fn question_accepts_valid_multiple() {
        let q = Question::new(
            QuestionId::new(2),
            "Which of the following are types of malware?",
            choices(&["A. Virus", "B. Trojan", "C. Firewall", "D. Ransomware"]),
            [label("A"), label("b"), label("D")],
            QuestionKind::Multiple,
        )
        .unwrap()
        .with_subject("Malware Analysis");

        assert_eq!(q.correct_labels().len(), 3);
        assert!(q.has_label(label("C")));
        assert!(!q.has_label(label("E")));
        assert_eq!(q.subject(), Some("Malware Analysis"));
    }

    #[test]
    fn question_rejects_invariant_violations() {
        let err = Question::new(
            QuestionId::new(1),
            "Only one?",
            choices(&["A. yes"]),
            [label("A")],
            QuestionKind::Single,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::TooFewChoices { count: 1 });

        let err = Question::new(
            QuestionId::new(1),
            "Pick",
            choices(&["A. one", "B. two"]),
            [label("C")],
            QuestionKind::Single,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnknownCorrectLabel(label("C")));

        let err = Question::new(
            QuestionId::new(1),
            "Pick",
            choices(&["A. one", "B. two"]),
            [label("A"), label("B")],
            QuestionKind::Single,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::SingleWithManyCorrect { count: 2 });

        let err = Question::new(
            QuestionId::new(1),
            "Pick",
            choices(&["A. one", "A. two"]),
            [label("A")],
            QuestionKind::Single,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateLabel(label("A")));

        let err = Question::new(
            QuestionId::new(1),
            "   ",
            choices(&["A. one", "B. two"]),
            [label("A")],
            QuestionKind::Single,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);

        let err = Question::new(
            QuestionId::new(1),
            "Pick",
            choices(&["A. one", "B. two"]),
            [],
            QuestionKind::Multiple,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::NoCorrectAnswer);
    }

    #[test]
    fn kind_and_difficulty_parse_from_wire() {
        assert_eq!("Single".parse::<QuestionKind>().unwrap(), QuestionKind::Single);
        assert_eq!("multiple".parse::<QuestionKind>().unwrap(), QuestionKind::Multiple);
        assert!("essay".parse::<QuestionKind>().is_err());
        assert_eq!("beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
    }
}
