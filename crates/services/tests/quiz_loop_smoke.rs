use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use gateway::{Gateway, GatewayError, ReportId, ResultReporter, ResultRow};
use quiz_core::model::{
    Choice, ChoiceLabel, Identity, Question, QuestionId, QuestionKind, QuizSetup, ResultReport,
    TimeLimit, UserId,
};
use quiz_core::time::fixed_clock;
use services::{Navigation, QuizLoopService, SessionError};

fn build_question(id: u64, subject: &str, correct: &[&str], kind: QuestionKind) -> Question {
    let choices = ["A. first", "B. second", "C. third", "D. fourth"]
        .iter()
        .map(|c| Choice::parse(c).unwrap())
        .collect();
    Question::new(
        QuestionId::new(id),
        format!("{subject} question {id}"),
        choices,
        correct.iter().map(|c| c.parse::<ChoiceLabel>().unwrap()),
        kind,
    )
    .unwrap()
    .with_subject(subject)
}

fn seeded_gateway() -> Gateway {
    let (gateway, repo) = Gateway::in_memory();
    repo.insert_question(build_question(1, "Cryptography", &["A"], QuestionKind::Single))
        .unwrap();
    repo.insert_question(build_question(
        2,
        "Cryptography",
        &["B", "C"],
        QuestionKind::Multiple,
    ))
    .unwrap();
    repo.insert_question(build_question(3, "Cryptography", &["D"], QuestionKind::Single))
        .unwrap();
    repo.insert_question(build_question(4, "Networking", &["A"], QuestionKind::Single))
        .unwrap();
    gateway
}

#[tokio::test]
async fn quiz_loop_reports_once() {
    let gateway = seeded_gateway();
    let service = QuizLoopService::from_gateway(fixed_clock(), &gateway);
    let student = Identity::student(UserId::new(42));
    let setup = QuizSetup::new("Cryptography", 2, TimeLimit::Unlimited).unwrap();

    let mut session = service.start_quiz(student, &setup).await.unwrap();
    assert_eq!(session.questions().len(), 2);

    session.select_current("a".parse().unwrap()).unwrap();
    assert_eq!(session.advance().unwrap(), Navigation::Moved(1));
    session.select_current("B".parse().unwrap()).unwrap();
    let Navigation::Submitted(result) = session.advance().unwrap() else {
        panic!("last advance should submit");
    };
    assert_eq!(result.per_question_outcome(), &[true, false]);
    assert_eq!(result.percentage(), 50);

    let first = service.report_result(&mut session).await.unwrap();
    let second = service.report_result(&mut session).await.unwrap();
    assert_eq!(first, second);

    let rows = service.results_for(UserId::new(42)).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].report.subject, "Cryptography");
    assert_eq!(rows[0].report.correct_answers, 1);
    assert_eq!(rows[0].report.total_questions, 2);
    assert_eq!(rows[0].report.time_taken_seconds, 0);
}

#[tokio::test]
async fn unknown_subject_yields_empty_error() {
    let gateway = seeded_gateway();
    let service = QuizLoopService::from_gateway(fixed_clock(), &gateway);
    let setup = QuizSetup::new("Forensics", 5, TimeLimit::Unlimited).unwrap();

    let err = service
        .start_quiz(Identity::student(UserId::new(1)), &setup)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Empty));

    let subjects = service.list_subjects().await.unwrap();
    assert_eq!(subjects, vec!["Cryptography", "Networking"]);
}

#[tokio::test]
async fn reporting_requires_submission() {
    let gateway = seeded_gateway();
    let service = QuizLoopService::from_gateway(fixed_clock(), &gateway);
    let setup = QuizSetup::new("Networking", 5, TimeLimit::Unlimited).unwrap();
    let mut session = service
        .start_quiz(Identity::student(UserId::new(3)), &setup)
        .await
        .unwrap();

    let err = service.report_result(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::NotSubmitted));
    assert!(session.report_id().is_none());
}

/// Rejects the first submission, accepts the rest.
#[derive(Default)]
struct FlakyReporter {
    failed_once: AtomicBool,
}

#[async_trait]
impl ResultReporter for FlakyReporter {
    async fn submit_result(&self, _report: &ResultReport) -> Result<ReportId, GatewayError> {
        if self.failed_once.swap(true, Ordering::SeqCst) {
            Ok(77)
        } else {
            Err(GatewayError::Status(503))
        }
    }

    async fn results_for_student(&self, _student: UserId) -> Result<Vec<ResultRow>, GatewayError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn failed_report_can_be_retried() {
    let gateway = seeded_gateway();
    let service = QuizLoopService::new(
        fixed_clock(),
        gateway.questions.clone(),
        Arc::new(FlakyReporter::default()),
    );
    let setup = QuizSetup::new("Networking", 1, TimeLimit::Unlimited).unwrap();
    let mut session = service
        .start_quiz(Identity::student(UserId::new(9)), &setup)
        .await
        .unwrap();
    session.submit();

    let err = service.report_result(&mut session).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Gateway(GatewayError::Status(503))
    ));
    assert!(session.report_id().is_none());

    assert_eq!(service.report_result(&mut session).await.unwrap(), 77);
    assert_eq!(session.report_id(), Some(77));
}
