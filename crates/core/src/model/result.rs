use serde::{Deserialize, Serialize};

/// Percentage at or above which an attempt counts as passed.
pub const PASSING_PERCENTAGE: u8 = 60;

/// Coarse performance bucket derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLevel {
    /// 90% and above.
    Excellent,
    /// 70% to 89%.
    Good,
    /// 50% to 69%.
    Fair,
    /// Below 50%.
    NeedsImprovement,
}

impl ScoreLevel {
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::NeedsImprovement,
        }
    }
}

/// Graded outcome of one quiz attempt.
///
/// Produced once when a session is submitted; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    correct_count: u32,
    total_count: u32,
    percentage: u8,
    per_question_outcome: Vec<bool>,
}

impl QuizResult {
    /// Build a result from per-question outcomes, in question order.
    ///
    /// Counts saturate at `u32::MAX`.
    #[must_use]
    pub fn from_outcomes(per_question_outcome: Vec<bool>) -> Self {
        let total_count = u32::try_from(per_question_outcome.len()).unwrap_or(u32::MAX);
        let correct = per_question_outcome.iter().filter(|ok| **ok).count();
        let correct_count = u32::try_from(correct).unwrap_or(u32::MAX);

        Self {
            correct_count,
            total_count,
            percentage: score_percentage(correct_count, total_count),
            per_question_outcome,
        }
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn per_question_outcome(&self) -> &[bool] {
        &self.per_question_outcome
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.total_count > 0 && self.correct_count == self.total_count
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.percentage >= PASSING_PERCENTAGE
    }

    #[must_use]
    pub fn score_level(&self) -> ScoreLevel {
        ScoreLevel::from_percentage(self.percentage)
    }
}

/// Rounded percentage (half up); zero when there are no questions.
#[must_use]
pub fn score_percentage(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(score_percentage(1, 2), 50);
        assert_eq!(score_percentage(2, 3), 67);
        assert_eq!(score_percentage(1, 3), 33);
        assert_eq!(score_percentage(1, 8), 13);
        assert_eq!(score_percentage(0, 0), 0);
        assert_eq!(score_percentage(5, 5), 100);
    }

    #[test]
    fn result_counts_outcomes() {
        let result = QuizResult::from_outcomes(vec![true, false, true, true]);
        assert_eq!(result.correct_count(), 3);
        assert_eq!(result.total_count(), 4);
        assert_eq!(result.percentage(), 75);
        assert_eq!(result.score_level(), ScoreLevel::Good);
        assert!(result.passed());
        assert!(!result.is_perfect());
    }

    #[test]
    fn score_levels_follow_thresholds() {
        assert_eq!(ScoreLevel::from_percentage(100), ScoreLevel::Excellent);
        assert_eq!(ScoreLevel::from_percentage(90), ScoreLevel::Excellent);
        assert_eq!(ScoreLevel::from_percentage(89), ScoreLevel::Good);
        assert_eq!(ScoreLevel::from_percentage(50), ScoreLevel::Fair);
        assert_eq!(ScoreLevel::from_percentage(49), ScoreLevel::NeedsImprovement);
    }
}
