use quiz_core::model::{Choice, Identity, Question, QuestionId, QuestionKind, TimeLimit, UserId};
use services::{QuizSession, Submission, TickOutcome};

fn two_question_session(limit_secs: u32) -> QuizSession {
    let questions = (1..=2)
        .map(|id| {
            Question::new(
                QuestionId::new(id),
                format!("Question {id}"),
                vec![
                    Choice::parse("A. right").unwrap(),
                    Choice::parse("B. wrong").unwrap(),
                ],
                ["A".parse().unwrap()],
                QuestionKind::Single,
            )
            .unwrap()
        })
        .collect();
    QuizSession::new(
        Identity::student(UserId::new(5)),
        "Security",
        questions,
        TimeLimit::from_secs(limit_secs),
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_grades_unanswered_questions() {
    let mut session = two_question_session(5);
    let mut ticks = session.start_clock().expect("timed session has a clock");
    assert!(session.start_clock().is_none());

    session.select_current("A".parse().unwrap()).unwrap();
    session.advance().unwrap();

    let mut seen = Vec::new();
    let result = loop {
        ticks.recv().await.expect("ticker alive until timeout");
        match session.on_tick() {
            TickOutcome::Ticked { remaining, .. } => seen.push(remaining),
            TickOutcome::TimedOut(result) => break result,
            TickOutcome::Ignored => panic!("tick ignored before timeout"),
        }
    };

    assert_eq!(seen, vec![4, 3, 2, 1]);
    assert_eq!(result.correct_count(), 1);
    assert_eq!(result.total_count(), 2);
    assert_eq!(result.percentage(), 50);
    assert_eq!(result.per_question_outcome(), &[true, false]);
    assert_eq!(session.submission(), Some(Submission::TimedOut));
    assert_eq!(session.time_taken_seconds(), 5);

    // ticker was torn down by the timeout
    assert!(ticks.recv().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn manual_submit_stops_the_clock() {
    let mut session = two_question_session(3);
    let mut ticks = session.start_clock().unwrap();

    ticks.recv().await.unwrap();
    assert!(matches!(session.on_tick(), TickOutcome::Ticked { remaining: 2, .. }));

    let manual = session.submit().clone();
    assert_eq!(manual.correct_count(), 0);

    // anything still queued is swallowed, then the channel closes
    while ticks.recv().await.is_some() {
        assert_eq!(session.on_tick(), TickOutcome::Ignored);
    }
    assert!(session.time_up().is_none());
    assert_eq!(session.result(), Some(&manual));
    assert_eq!(session.submission(), Some(Submission::Manual));
    assert_eq!(session.remaining_seconds(), Some(2));
    assert!(session.start_clock().is_none());
}
