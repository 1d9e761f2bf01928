//! The `quizbank practice` command: an interactive line-oriented quiz.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizbank_core::bank::load_bank;
use quizbank_core::session::{QuizSession, SessionOptions};
use quizbank_core::statistics::QuizStats;
use quizbank_core::SessionError;
use quizbank_extract::config::load_config_from;

const HELP: &str = "\
Commands:
  A..E      toggle an answer (several at once: \"A C\")
  s         submit the selection
  r         reveal the solution
  n / p     next / previous question
  g N       go to question N
  c         clear the selection
  h         show this help
  q         finish and show the score
";

pub fn execute(
    bank_path: PathBuf,
    shuffle: bool,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let options = SessionOptions {
        shuffle: shuffle || config.practice.shuffle,
        limit: limit.or(config.practice.limit),
    };

    let bank = load_bank(&bank_path)
        .with_context(|| format!("failed to load bank: {}", bank_path.display()))?;
    let mut session = QuizSession::new(&bank, &options)?;
    tracing::info!(session = %session.id(), questions = session.len(), "practice started");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = run_session(&mut session, stdin.lock(), stdout.lock())?;
    tracing::info!(
        session = %session.id(),
        score = stats.percentage(),
        "practice finished"
    );
    Ok(())
}

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Toggle(Vec<String>),
    Submit,
    Reveal,
    Next,
    Previous,
    GoTo(usize),
    Clear,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();

    match head {
        "s" | "submit" => return Command::Submit,
        "r" | "reveal" => return Command::Reveal,
        "n" | "next" | "" => return Command::Next,
        "p" | "prev" | "previous" => return Command::Previous,
        "c" | "clear" => return Command::Clear,
        "h" | "?" | "help" => return Command::Help,
        "q" | "quit" => return Command::Quit,
        "g" | "goto" => {
            return match parts.next().map(str::parse::<usize>) {
                Some(Ok(position)) => Command::GoTo(position),
                _ => Command::Unknown(line.to_string()),
            };
        }
        _ => {}
    }

    let labels: Vec<String> = line
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| c.to_string())
        .collect();
    if !labels.is_empty() && labels.iter().all(|l| l.chars().all(|c| c.is_ascii_uppercase())) {
        Command::Toggle(labels)
    } else {
        Command::Unknown(line.to_string())
    }
}

/// Drive `session` from `input` until the user quits or input ends.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: R,
    mut out: W,
) -> Result<QuizStats> {
    writeln!(
        out,
        "Practicing {} question(s). Type h for help.\n",
        session.len()
    )?;
    render_current(session, &mut out)?;

    for line in input.lines() {
        let line = line?;
        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => write!(out, "{HELP}")?,
            Command::Next => {
                if session.next_question() {
                    render_current(session, &mut out)?;
                } else {
                    writeln!(out, "Already at the last question. Type q to finish.")?;
                }
            }
            Command::Previous => {
                if session.previous_question() {
                    render_current(session, &mut out)?;
                } else {
                    writeln!(out, "Already at the first question.")?;
                }
            }
            Command::GoTo(position) => match session.go_to(position) {
                Ok(()) => render_current(session, &mut out)?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Toggle(labels) => {
                for label in &labels {
                    if let Err(e) = session.select(label) {
                        writeln!(out, "{e}")?;
                    }
                }
                writeln!(out, "Selected: {}", selection_line(session))?;
            }
            Command::Clear => {
                session.clear_selection();
                writeln!(out, "Selection cleared.")?;
            }
            Command::Submit => match session.submit() {
                Ok(true) => writeln!(out, "Correct!")?,
                Ok(false) => writeln!(out, "Incorrect.")?,
                Err(e @ SessionError::Ungradable { .. }) => writeln!(out, "{e}")?,
                Err(e) => return Err(e.into()),
            },
            Command::Reveal => {
                let solution = session.reveal();
                let mut community = solution.community_answer.join(", ");
                if !solution.community_answer_score.is_empty() {
                    community.push_str(&format!(" ({})", solution.community_answer_score));
                }
                writeln!(out, "Community answer: {community}")?;
                writeln!(
                    out,
                    "Correct answer: {}",
                    solution.proposed_answer.join(", ")
                )?;
            }
            Command::Unknown(text) => {
                writeln!(out, "Unrecognized input '{text}'. Type h for help.")?;
            }
        }
    }

    let stats = session.stats(Some(session.elapsed()));
    writeln!(out, "\n{}", stats.to_markdown())?;
    out.flush()?;
    Ok(stats)
}

fn render_current<W: Write>(session: &QuizSession, out: &mut W) -> Result<()> {
    let current = session.current();
    writeln!(
        out,
        "[{}/{}] Question {}",
        current.position, current.total, current.number
    )?;
    writeln!(out, "{}", current.question.question_text)?;
    for (label, text) in &current.question.answers {
        let mark = if current.selection.contains(label) {
            "*"
        } else {
            " "
        };
        writeln!(out, " {mark}{label}. {text}")?;
    }
    if current.question.is_degenerate() {
        writeln!(out, "  (no answer options)")?;
    } else {
        writeln!(
            out,
            "Select up to {} answer(s).",
            current.question.max_selectable()
        )?;
    }
    if let Some(verdict) = current.verdict {
        writeln!(
            out,
            "Already answered: {}",
            if verdict { "correct" } else { "incorrect" }
        )?;
    }
    Ok(())
}

fn selection_line(session: &QuizSession) -> String {
    let selection = session.current().selection;
    if selection.is_empty() {
        "(none)".to_string()
    } else {
        selection.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizbank_core::extract;

    const EXAM: &str = "\
Question 1
Capital of France?
A. Paris
B. London
Answer by the community: A (90%)
Answer proposed: A
Question 2
Pick the primes
A. 2
B. 4
C. 3
Answer by the community: AC (60%)
Answer proposed: A, C
";

    fn play(script: &str) -> (QuizStats, String) {
        let bank = extract(EXAM);
        let mut session = QuizSession::new(&bank, &SessionOptions::default()).unwrap();
        let mut out = Vec::new();
        let stats = run_session(&mut session, script.as_bytes(), &mut out).unwrap();
        (stats, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_commands() {
        assert_eq!(parse_command("s"), Command::Submit);
        assert_eq!(parse_command("  next "), Command::Next);
        assert_eq!(parse_command(""), Command::Next);
        assert_eq!(parse_command("g 2"), Command::GoTo(2));
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(
            parse_command("A C"),
            Command::Toggle(vec!["A".into(), "C".into()])
        );
        assert_eq!(
            parse_command("A,C"),
            Command::Toggle(vec!["A".into(), "C".into()])
        );
        assert!(matches!(parse_command("g x"), Command::Unknown(_)));
        assert!(matches!(parse_command("xyz"), Command::Unknown(_)));
    }

    #[test]
    fn full_correct_run() {
        let (stats, out) = play("A\ns\nn\nC A\ns\nq\n");
        assert_eq!(stats.correct_answers, 2);
        assert_eq!(stats.percentage(), 100);
        assert!(out.contains("[1/2] Question 1"));
        assert!(out.contains("[2/2] Question 2"));
        assert!(out.contains("Correct!"));
        assert!(out.contains("Excellent!"));
    }

    #[test]
    fn wrong_and_unanswered_count_against() {
        let (stats, out) = play("B\ns\n");
        assert_eq!(stats.correct_answers, 0);
        assert_eq!(stats.wrong_answers, 2);
        assert_eq!(stats.unanswered, 1);
        assert!(out.contains("Incorrect."));
        assert!(out.contains("Keep practicing!"));
    }

    #[test]
    fn selection_limit_is_reported() {
        let (_, out) = play("A B\n");
        assert!(out.contains("accepts at most 1 selection(s)"));
        assert!(out.contains("Selected: A"));
    }

    #[test]
    fn reveal_and_navigation() {
        let (_, out) = play("g 2\nr\np\np\ng 9\nzz\n");
        assert!(out.contains("Community answer: A, C (60%)"));
        assert!(out.contains("Correct answer: A, C"));
        assert!(out.contains("Already at the first question."));
        assert!(out.contains("out of range"));
        assert!(out.contains("Unrecognized input 'zz'"));
    }

    #[test]
    fn end_of_input_finishes_session() {
        let (stats, out) = play("");
        assert_eq!(stats.total_questions, 2);
        assert!(out.contains("**Score:** 0%"));
    }
}
