use quiz_core::model::{QuizResult, ScoreLevel};

/// Display-ready summary of a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub score_line: String,
    pub percentage: u8,
    pub level: ScoreLevel,
    pub headline: &'static str,
    pub message: &'static str,
    pub passed: bool,
}

impl ResultView {
    #[must_use]
    pub fn from_result(result: &QuizResult) -> Self {
        let percentage = result.percentage();
        let level = result.score_level();
        Self {
            score_line: format!("{}/{}", result.correct_count(), result.total_count()),
            percentage,
            level,
            headline: headline(result),
            message: level_message(level),
            passed: result.passed(),
        }
    }
}

/// Buckets on the exact ratio, not the rounded percentage: 39/49 is still "Good Job!".
fn headline(result: &QuizResult) -> &'static str {
    if result.is_perfect() {
        return "Perfect Score!";
    }
    let correct = u64::from(result.correct_count()) * 5;
    let total = u64::from(result.total_count());
    if correct >= total * 4 {
        "Excellent Work!"
    } else if correct >= total * 3 {
        "Good Job!"
    } else {
        "Keep Learning!"
    }
}

fn level_message(level: ScoreLevel) -> &'static str {
    match level {
        ScoreLevel::Excellent => "Outstanding performance! You have mastered this topic.",
        ScoreLevel::Good => "Great job! You have a solid understanding of the material.",
        ScoreLevel::Fair => "Good effort! Consider reviewing some topics for improvement.",
        ScoreLevel::NeedsImprovement => "Keep studying! Review the material and try again.",
    }
}

/// Render seconds as `M:SS`.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(61), "1:01");
    }

    #[test]
    fn headline_tracks_percentage() {
        let perfect = ResultView::from_result(&QuizResult::from_outcomes(vec![true, true]));
        assert_eq!(perfect.headline, "Perfect Score!");
        assert_eq!(perfect.score_line, "2/2");
        assert_eq!(perfect.level, ScoreLevel::Excellent);

        let good = ResultView::from_result(&QuizResult::from_outcomes(vec![
            true, true, true, false,
        ]));
        assert_eq!(good.headline, "Good Job!");
        assert_eq!(good.percentage, 75);
        assert!(good.passed);

        let half = ResultView::from_result(&QuizResult::from_outcomes(vec![true, false]));
        assert_eq!(half.headline, "Keep Learning!");
        assert_eq!(half.level, ScoreLevel::Fair);
        assert!(!half.passed);
        assert_eq!(
            half.message,
            "Good effort! Consider reviewing some topics for improvement."
        );
    }

    fn outcomes(correct: usize, total: usize) -> QuizResult {
        QuizResult::from_outcomes((0..total).map(|i| i < correct).collect())
    }

    #[test]
    fn headline_uses_exact_ratio_at_boundaries() {
        // 79.6% rounds to 80 but stays below the 4/5 bar
        let view = ResultView::from_result(&outcomes(39, 49));
        assert_eq!(view.percentage, 80);
        assert_eq!(view.headline, "Good Job!");

        // 59.5% rounds to 60 but stays below the 3/5 bar
        let view = ResultView::from_result(&outcomes(25, 42));
        assert_eq!(view.percentage, 60);
        assert_eq!(view.headline, "Keep Learning!");

        assert_eq!(
            ResultView::from_result(&outcomes(40, 50)).headline,
            "Excellent Work!"
        );
        assert_eq!(ResultView::from_result(&outcomes(3, 5)).headline, "Good Job!");
    }
}
