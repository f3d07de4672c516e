//! Pure scoring of an attempt.
//!
//! No I/O and no hidden state: the same questions and selections always
//! produce the same `QuizResult`.

use std::collections::{BTreeSet, HashMap};

use crate::model::{ChoiceLabel, Question, QuestionId, QuizResult};

/// Chosen labels per question. A question the user never touched has no entry.
pub type Selections = HashMap<QuestionId, BTreeSet<ChoiceLabel>>;

/// Returns true when `selected` is exactly the question's correct label set.
///
/// Labels are case-normalised at construction, so the comparison is
/// case-insensitive. An empty or missing selection never matches because a
/// question always has at least one correct label.
#[must_use]
pub fn is_correct(question: &Question, selected: Option<&BTreeSet<ChoiceLabel>>) -> bool {
    selected.is_some_and(|labels| labels == question.correct_labels())
}

/// Grade every question in order.
#[must_use]
pub fn grade(questions: &[Question], selections: &Selections) -> QuizResult {
    let outcomes = questions
        .iter()
        .map(|q| is_correct(q, selections.get(&q.id())))
        .collect();
    QuizResult::from_outcomes(outcomes)
}
