//! Line-oriented terminal front end for a running quiz.

use std::io;

use quiz_core::model::{ChoiceLabel, QuestionKind};
use services::{ClockTick, Navigation, QuizSession, ResultView, TickOutcome, format_clock};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

/// How the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Finished,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(Vec<ChoiceLabel>),
    Next,
    Prev,
    Submit,
    Quit,
    Help,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" | ">" | "next" => return Command::Next,
        "<" | "prev" | "back" => return Command::Prev,
        "!" | "submit" => return Command::Submit,
        "quit" | "exit" => return Command::Quit,
        "?" | "help" => return Command::Help,
        _ => {}
    }

    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .flat_map(str::chars)
        .map(ChoiceLabel::new)
        .collect::<Result<Vec<_>, _>>()
        .map_or_else(|_| Command::Unknown(line.to_string()), Command::Select)
}

enum Flow {
    Continue,
    Quit,
}

fn apply(session: &mut QuizSession, command: Command) -> Flow {
    match command {
        Command::Select(labels) => {
            for label in labels {
                if let Err(err) = session.select_current(label) {
                    println!("{err}");
                }
            }
            print_question(session);
        }
        Command::Next => match session.advance() {
            Ok(Navigation::Moved(_)) => print_question(session),
            Ok(Navigation::Submitted(_) | Navigation::Ignored) => {}
            Err(err) => println!("{err}"),
        },
        Command::Prev => match session.retreat() {
            Navigation::Moved(_) => print_question(session),
            _ => println!("Already at the first question."),
        },
        Command::Submit => {
            session.submit();
        }
        Command::Quit => return Flow::Quit,
        Command::Help => print_help(),
        Command::Unknown(raw) => {
            println!("Unknown command: {raw}");
            print_help();
        }
    }
    Flow::Continue
}

async fn next_tick(ticks: &mut Option<UnboundedReceiver<ClockTick>>) -> Option<ClockTick> {
    match ticks {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn should_announce(remaining: u32, warning: bool) -> bool {
    remaining % 60 == 0 || (warning && (remaining % 15 == 0 || remaining <= 5))
}

/// Drive `session` from stdin until it is submitted or the user quits.
///
/// Closing stdin submits whatever has been answered so far.
///
/// # Errors
///
/// Returns an I/O error if stdin cannot be read.
pub async fn run_session(session: &mut QuizSession) -> io::Result<Exit> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticks = session.start_clock();

    print_help();
    print_question(session);

    while !session.is_submitted() {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed, submitting current answers");
                    session.submit();
                    break;
                };
                if let Flow::Quit = apply(session, parse_command(&line)) {
                    return Ok(Exit::Abandoned);
                }
            }
            Some(_) = next_tick(&mut ticks) => match session.on_tick() {
                TickOutcome::Ticked { remaining, warning } => {
                    if should_announce(remaining, warning) {
                        println!("  {} left", format_clock(remaining));
                    }
                }
                TickOutcome::TimedOut(_) => println!("\nTime's up! Your answers were submitted."),
                TickOutcome::Ignored => {}
            },
        }
    }
    Ok(Exit::Finished)
}

fn print_help() {
    println!("Type choice letters to answer (e.g. `b` or `a c`); multiple-choice letters toggle.");
    println!("Enter or `next` moves on, `prev` goes back, `submit` finishes, `quit` abandons.");
}

fn print_question(session: &QuizSession) {
    let progress = session.progress();
    let question = session.current_question();
    let selected = session.selection_for(question.id());

    let mut status = format!(
        "Question {}/{} · {} answered",
        progress.current + 1,
        progress.total,
        progress.answered
    );
    if let Some(remaining) = progress.remaining_seconds {
        status.push_str(&format!(" · {} left", format_clock(remaining)));
    }

    println!();
    println!("{status}");
    println!("{}", question.prompt());
    if question.kind() == QuestionKind::Multiple {
        println!("(select all that apply)");
    }
    for choice in question.choices() {
        let mark = if selected.is_some_and(|s| s.contains(&choice.label())) {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {choice}");
    }
}

pub fn print_result(session: &QuizSession) {
    let Some(result) = session.result() else {
        return;
    };
    let view = ResultView::from_result(result);

    println!();
    println!("{}", view.headline);
    println!(
        "Score: {} ({}%){}",
        view.score_line,
        view.percentage,
        if view.passed { " · passed" } else { "" }
    );
    println!("{}", view.message);
    println!("Time taken: {}", format_clock(session.time_taken_seconds()));

    for (index, (question, correct)) in session
        .questions()
        .iter()
        .zip(result.per_question_outcome())
        .enumerate()
    {
        let mark = if *correct { "✓" } else { "✗" };
        println!("  {mark} {}. {}", index + 1, question.prompt());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[char]) -> Vec<ChoiceLabel> {
        raw.iter().map(|c| ChoiceLabel::new(*c).unwrap()).collect()
    }

    #[test]
    fn words_map_to_navigation() {
        assert_eq!(parse_command(""), Command::Next);
        assert_eq!(parse_command(" NEXT "), Command::Next);
        assert_eq!(parse_command("prev"), Command::Prev);
        assert_eq!(parse_command("submit"), Command::Submit);
        assert_eq!(parse_command("quit"), Command::Quit);
    }

    #[test]
    fn letters_become_selections() {
        assert_eq!(parse_command("b"), Command::Select(labels(&['B'])));
        assert_eq!(parse_command("a c"), Command::Select(labels(&['A', 'C'])));
        assert_eq!(parse_command("a,d"), Command::Select(labels(&['A', 'D'])));
        assert_eq!(parse_command("AB"), Command::Select(labels(&['A', 'B'])));
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(parse_command("3"), Command::Unknown("3".into()));
        assert_eq!(parse_command("a?"), Command::Unknown("a?".into()));
    }

    #[test]
    fn announcements_thin_out_outside_warning() {
        assert!(should_announce(120, false));
        assert!(!should_announce(119, false));
        assert!(should_announce(45, true));
        assert!(should_announce(3, true));
        assert!(!should_announce(44, true));
    }
}
