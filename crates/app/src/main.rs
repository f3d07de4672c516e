mod console;
mod demo;

use std::fmt;

use gateway::{Gateway, HttpGatewayConfig};
use quiz_core::model::{
    DEFAULT_QUESTION_COUNT, DEFAULT_TIME_LIMIT_SECS, Identity, QuizSetup, Role, TimeLimit,
    UserId, score_percentage,
};
use services::{Clock, QuizLoopService, format_clock};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console::Exit;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCount { raw: String },
    InvalidTimeLimit { raw: String },
    InvalidUserId { raw: String },
    InvalidRole { raw: String },
    MissingSubject,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
            ArgsError::InvalidTimeLimit { raw } => write!(f, "invalid --time-limit value: {raw}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user-id value: {raw}"),
            ArgsError::InvalidRole { raw } => write!(f, "invalid --role value: {raw}"),
            ArgsError::MissingSubject => write!(f, "no subject given (use --subject or QUIZ_SUBJECT)"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--subject <name>] [--count <n>] [--time-limit <secs|unlimited>]");
    eprintln!("       [--user-id <id>] [--role <student|admin>] [--api <url>] [--demo]");
    eprintln!("  quiz --list-subjects [--api <url>] [--demo]");
    eprintln!("  quiz --history [--user-id <id>] [--api <url>] [--demo]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --count {DEFAULT_QUESTION_COUNT}");
    eprintln!("  --time-limit {DEFAULT_TIME_LIMIT_SECS}");
    eprintln!("  --user-id 1");
    eprintln!("  --role student");
    eprintln!();
    eprintln!("Environment (also read from .env):");
    eprintln!("  QUIZ_API_URL, QUIZ_API_TOKEN, QUIZ_API_TIMEOUT_SECS,");
    eprintln!("  QUIZ_SUBJECT, QUIZ_TIME_LIMIT, QUIZ_USER_ID, QUIZ_USER_ROLE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Quiz,
    ListSubjects,
    History,
}

#[derive(Debug)]
struct Args {
    mode: Mode,
    subject: Option<String>,
    count: u32,
    time_limit: TimeLimit,
    user_id: UserId,
    role: Role,
    api: Option<String>,
    demo: bool,
}

/// Values flags fall back to; taken from the environment in the binary.
#[derive(Debug, Clone)]
struct Defaults {
    subject: Option<String>,
    time_limit: TimeLimit,
    user_id: UserId,
    role: Role,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            subject: None,
            time_limit: TimeLimit::from_secs(DEFAULT_TIME_LIMIT_SECS),
            user_id: UserId::new(1),
            role: Role::Student,
        }
    }
}

impl Defaults {
    fn from_env() -> Result<Self, ArgsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ArgsError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let fallback = Self::default();

        Ok(Self {
            subject: var("QUIZ_SUBJECT"),
            time_limit: var("QUIZ_TIME_LIMIT")
                .map(parse_time_limit)
                .transpose()?
                .unwrap_or(fallback.time_limit),
            user_id: var("QUIZ_USER_ID")
                .map(parse_user_id)
                .transpose()?
                .unwrap_or(fallback.user_id),
            role: var("QUIZ_USER_ROLE")
                .map(parse_role)
                .transpose()?
                .unwrap_or(fallback.role),
        })
    }
}

fn parse_time_limit(raw: String) -> Result<TimeLimit, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidTimeLimit { raw })
}

fn parse_user_id(raw: String) -> Result<UserId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidUserId { raw })
}

fn parse_role(raw: String) -> Result<Role, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidRole { raw })
}

impl Args {
    fn parse(
        args: &mut impl Iterator<Item = String>,
        defaults: Defaults,
    ) -> Result<Self, ArgsError> {
        let Defaults {
            mut subject,
            mut time_limit,
            mut user_id,
            mut role,
        } = defaults;
        let mut mode = Mode::Quiz;
        let mut count = DEFAULT_QUESTION_COUNT;
        let mut api = None;
        let mut demo = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--subject" => subject = Some(require_value(args, "--subject")?),
                "--count" => {
                    let value = require_value(args, "--count")?;
                    count = value
                        .trim()
                        .parse()
                        .map_err(|_| ArgsError::InvalidCount { raw: value.clone() })?;
                }
                "--time-limit" => {
                    time_limit = parse_time_limit(require_value(args, "--time-limit")?)?;
                }
                "--user-id" => user_id = parse_user_id(require_value(args, "--user-id")?)?,
                "--role" => role = parse_role(require_value(args, "--role")?)?,
                "--api" => api = Some(require_value(args, "--api")?),
                "--demo" => demo = true,
                "--list-subjects" => mode = Mode::ListSubjects,
                "--history" => mode = Mode::History,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            mode,
            subject,
            count,
            time_limit,
            user_id,
            role,
            api,
            demo,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_gateway(args: &Args) -> Result<Gateway, Box<dyn std::error::Error>> {
    if args.demo {
        let (gateway, repo) = Gateway::in_memory();
        let seeded = demo::seed(&repo)?;
        info!(questions = seeded, "demo question bank loaded");
        return Ok(gateway);
    }

    let config = match &args.api {
        Some(url) => HttpGatewayConfig::from_env().with_base_url(url.clone()),
        None => HttpGatewayConfig::from_env(),
    };
    info!(base_url = %config.base_url, "using quiz api");
    Ok(Gateway::http(config)?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine; real environment variables still apply.
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let args = Defaults::from_env()
        .and_then(|defaults| Args::parse(&mut argv, defaults))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    let gateway = build_gateway(&args)?;
    let service = QuizLoopService::from_gateway(Clock::default_clock(), &gateway).with_shuffle(true);

    match args.mode {
        Mode::ListSubjects => {
            for subject in service.list_subjects().await? {
                println!("{subject}");
            }
        }
        Mode::History => {
            let rows = service.results_for(args.user_id).await?;
            if rows.is_empty() {
                println!("No results for user {}.", args.user_id);
            }
            for row in rows {
                let report = &row.report;
                println!(
                    "#{:<4} {:<24} {}/{} ({}%) in {}",
                    row.id,
                    report.subject,
                    report.correct_answers,
                    report.total_questions,
                    score_percentage(report.correct_answers, report.total_questions),
                    format_clock(report.time_taken_seconds)
                );
            }
        }
        Mode::Quiz => {
            let subject = match (args.subject, args.demo) {
                (Some(subject), _) => subject,
                (None, true) => demo::DEMO_SUBJECT.to_string(),
                (None, false) => return Err(ArgsError::MissingSubject.into()),
            };
            let setup = QuizSetup::new(subject, args.count, args.time_limit)?;
            let identity = Identity::new(args.user_id, args.role);

            let mut session = service.start_quiz(identity, &setup).await?;
            println!(
                "{}: {} questions, time limit {}",
                session.subject(),
                session.questions().len(),
                match session.remaining_seconds() {
                    Some(secs) => format_clock(secs),
                    None => "none".to_string(),
                }
            );

            if console::run_session(&mut session).await? == Exit::Abandoned {
                println!("Quiz abandoned; nothing was reported.");
                return Ok(());
            }

            console::print_result(&session);
            let id = service.report_result(&mut session).await?;
            println!("Result saved (#{id}).");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
