//! Offline question bank for `--demo`.

use gateway::{GatewayError, InMemoryGateway};
use quiz_core::model::{
    Choice, ChoiceLabel, Difficulty, Question, QuestionError, QuestionId, QuestionKind,
};

pub const DEMO_SUBJECT: &str = "Cyber Security";

struct Seed {
    prompt: &'static str,
    kind: QuestionKind,
    choices: &'static [&'static str],
    correct: &'static [&'static str],
    difficulty: Difficulty,
}

const SEEDS: &[Seed] = &[
    Seed {
        prompt: "What does the 'C' in the CIA triad stand for?",
        kind: QuestionKind::Single,
        choices: &["A. Control", "B. Confidentiality", "C. Compliance", "D. Cryptography"],
        correct: &["B"],
        difficulty: Difficulty::Beginner,
    },
    Seed {
        prompt: "Which of the following are types of malware?",
        kind: QuestionKind::Multiple,
        choices: &["A. Virus", "B. Trojan", "C. Firewall", "D. Ransomware"],
        correct: &["A", "B", "D"],
        difficulty: Difficulty::Beginner,
    },
    Seed {
        prompt: "Which port does HTTPS use by default?",
        kind: QuestionKind::Single,
        choices: &["A. 80", "B. 21", "C. 443", "D. 8080"],
        correct: &["C"],
        difficulty: Difficulty::Beginner,
    },
    Seed {
        prompt: "Which of these are symmetric encryption algorithms?",
        kind: QuestionKind::Multiple,
        choices: &["A. AES", "B. RSA", "C. ChaCha20", "D. ECDSA"],
        correct: &["A", "C"],
        difficulty: Difficulty::Intermediate,
    },
    Seed {
        prompt: "What kind of attack floods a service from many compromised hosts?",
        kind: QuestionKind::Single,
        choices: &["A. Phishing", "B. DDoS", "C. SQL injection", "D. Man-in-the-middle"],
        correct: &["B"],
        difficulty: Difficulty::Beginner,
    },
    Seed {
        prompt: "Which controls help mitigate SQL injection?",
        kind: QuestionKind::Multiple,
        choices: &[
            "A. Parameterized queries",
            "B. Input validation",
            "C. Disabling TLS",
            "D. Least-privilege database accounts",
        ],
        correct: &["A", "B", "D"],
        difficulty: Difficulty::Advanced,
    },
];

fn build(id: u64, seed: &Seed) -> Result<Question, QuestionError> {
    let choices = seed
        .choices
        .iter()
        .map(|c| Choice::parse(c))
        .collect::<Result<Vec<_>, _>>()?;
    let correct = seed
        .correct
        .iter()
        .map(|l| l.parse::<ChoiceLabel>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(
        Question::new(QuestionId::new(id), seed.prompt, choices, correct, seed.kind)?
            .with_subject(DEMO_SUBJECT)
            .with_difficulty(Some(seed.difficulty)),
    )
}

/// Fill `repo` with the demo question bank.
///
/// # Errors
///
/// Returns `GatewayError` if a seed fails validation or the repo is poisoned.
pub fn seed(repo: &InMemoryGateway) -> Result<usize, GatewayError> {
    for (id, seed) in (1..).zip(SEEDS) {
        repo.insert_question(build(id, seed)?)?;
    }
    Ok(SEEDS.len())
}
