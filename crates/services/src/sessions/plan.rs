use rand::rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use quiz_core::model::Question;

use crate::error::SessionError;

/// Ordered question set chosen for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub questions: Vec<Question>,
    pub duplicates_dropped: usize,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

/// Turns whatever the question source returned into a playable list.
#[derive(Debug, Clone, Copy)]
pub struct SessionPlanner {
    question_count: u32,
    shuffle: bool,
}

impl SessionPlanner {
    #[must_use]
    pub fn new(question_count: u32) -> Self {
        Self {
            question_count,
            shuffle: false,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Drop repeated ids (first wins), optionally shuffle, then cap at the requested count.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions remain.
    pub fn plan(
        self,
        questions: impl IntoIterator<Item = Question>,
    ) -> Result<SessionPlan, SessionError> {
        let mut seen = HashSet::new();
        let mut duplicates_dropped = 0;
        let mut selected: Vec<Question> = questions
            .into_iter()
            .filter(|q| {
                let fresh = seen.insert(q.id());
                if !fresh {
                    duplicates_dropped += 1;
                }
                fresh
            })
            .collect();

        if self.shuffle {
            selected.shuffle(&mut rng());
        }
        selected.truncate(usize::try_from(self.question_count).unwrap_or(usize::MAX));

        if selected.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(SessionPlan {
            questions: selected,
            duplicates_dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Choice, QuestionId, QuestionKind};

    fn build_question(id: u64, prompt: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            prompt,
            vec![
                Choice::parse("A. yes").unwrap(),
                Choice::parse("B. no").unwrap(),
            ],
            ["A".parse().unwrap()],
            QuestionKind::Single,
        )
        .unwrap()
    }

    fn ids(plan: &SessionPlan) -> Vec<u64> {
        plan.questions.iter().map(|q| q.id().value()).collect()
    }

    #[test]
    fn keeps_source_order_and_caps_count() {
        let plan = SessionPlanner::new(2)
            .plan((1..=4).map(|id| build_question(id, "q")))
            .unwrap();
        assert_eq!(ids(&plan), vec![1, 2]);
        assert_eq!(plan.duplicates_dropped, 0);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let plan = SessionPlanner::new(10)
            .plan(vec![
                build_question(1, "first"),
                build_question(2, "other"),
                build_question(1, "second"),
            ])
            .unwrap();
        assert_eq!(ids(&plan), vec![1, 2]);
        assert_eq!(plan.questions[0].prompt(), "first");
        assert_eq!(plan.duplicates_dropped, 1);
    }

    #[test]
    fn shuffle_keeps_the_same_questions() {
        let plan = SessionPlanner::new(10)
            .with_shuffle(true)
            .plan((1..=6).map(|id| build_question(id, "q")))
            .unwrap();
        let mut got = ids(&plan);
        got.sort_unstable();
        assert_eq!(got, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = SessionPlanner::new(5).plan(Vec::new()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }
}
