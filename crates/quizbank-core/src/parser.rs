//! Exam text extractor.
//!
//! Turns the raw text of an exam dump into a [`QuestionBank`]. Parsing is
//! best-effort: malformed regions yield partially empty questions instead of
//! errors. [`extract_with_diagnostics`] additionally reports what it had to
//! gloss over, without changing the extracted bank.

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Label, Question, QuestionBank, QuestionNumber};

/// Line prefix of the crowd-voted answer annotation.
pub const COMMUNITY_MARKER: &str = "Answer by the community";
/// Line prefix of the canonical answer annotation.
pub const PROPOSED_MARKER: &str = "Answer proposed";
/// Word introducing every question.
pub const QUESTION_WORD: &str = "Question";

static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Question\s+([0-9]+)").unwrap());

static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([A-E])\.\s+(.*)$").unwrap());

static OPTION_LOOKALIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]\.|[a-e][.)]\s|[A-E]\)\s)").unwrap());

static COMMUNITY_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r": ([A-E, ]+)(?:\s*\(([0-9]+%)\))?").unwrap());

static COMPACT_LABELS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-E]{2,}$").unwrap());

static PROPOSED_VALUE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r": (.+)").unwrap());

static PROPOSED_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*").unwrap());

/// Kind of irregularity found while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingMarker,
    MalformedOption,
    CountMismatch,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MissingMarker => write!(f, "missing marker"),
            DiagnosticKind::MalformedOption => write!(f, "malformed option"),
            DiagnosticKind::CountMismatch => write!(f, "count mismatch"),
        }
    }
}

/// A parse irregularity, attached to a question when one can be named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub question_number: Option<QuestionNumber>,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Result of a strict-mode extraction.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// The same bank [`extract`] returns.
    pub bank: QuestionBank,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extract all questions from `text`. Never fails.
pub fn extract(text: &str) -> QuestionBank {
    extract_with_diagnostics(text).bank
}

/// Extract all questions from `text` and report parse irregularities.
pub fn extract_with_diagnostics(text: &str) -> Extraction {
    let blocks = split_into_blocks(text);
    let numbers = extract_question_numbers(text);
    let mut extraction = Extraction::default();

    if blocks.len() != numbers.len() {
        tracing::warn!(
            blocks = blocks.len(),
            numbers = numbers.len(),
            "question block count does not match marker count"
        );
        extraction.diagnostics.push(Diagnostic {
            question_number: None,
            kind: DiagnosticKind::CountMismatch,
            message: format!(
                "found {} question blocks but {} question numbers; unmatched blocks were dropped",
                blocks.len(),
                numbers.len()
            ),
        });
    }

    for (block, number) in blocks.iter().zip(numbers) {
        let Some(number) = number else {
            tracing::warn!("skipping question block with an oversized number");
            extraction.diagnostics.push(Diagnostic {
                question_number: None,
                kind: DiagnosticKind::MissingMarker,
                message: "question number does not fit in 32 bits; block dropped".into(),
            });
            continue;
        };

        let parsed = parse_block(block);
        tracing::debug!(
            number = %number,
            answers = parsed.question.answers.len(),
            "parsed question block"
        );
        extraction
            .diagnostics
            .extend(parsed.issues.into_iter().map(|(kind, message)| Diagnostic {
                question_number: Some(number),
                kind,
                message,
            }));
        extraction.bank.insert(number, parsed.question);
    }

    extraction
}

/// Split the text on question markers, keeping the text between them.
fn split_into_blocks(text: &str) -> Vec<&str> {
    let mut fragments = QUESTION_MARKER.split(text).map(str::trim);

    let mut blocks = Vec::new();
    if let Some(leading) = fragments.next() {
        // Text before the first marker is boilerplate unless it itself
        // starts like a question.
        if !leading.is_empty() && leading.starts_with(QUESTION_WORD) {
            blocks.push(leading);
        }
    }
    blocks.extend(fragments.filter(|block| !block.is_empty()));
    blocks
}

fn extract_question_numbers(text: &str) -> Vec<Option<QuestionNumber>> {
    QUESTION_MARKER
        .captures_iter(text)
        .map(|caps| caps[1].parse::<u32>().ok().map(QuestionNumber))
        .collect()
}

struct ParsedBlock {
    question: Question,
    issues: Vec<(DiagnosticKind, String)>,
}

fn parse_block(block: &str) -> ParsedBlock {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let mut issues = Vec::new();

    let answer_start = lines.iter().position(|line| OPTION_LINE.is_match(line));

    let (question_text, answer_lines): (String, &[&str]) = match answer_start {
        Some(start) => {
            let end = lines[start..]
                .iter()
                .position(|line| is_answer_marker(line))
                .map_or(lines.len(), |offset| start + offset);
            (lines[..start].join(" "), &lines[start..end])
        }
        None => {
            issues.push((
                DiagnosticKind::MissingMarker,
                "no answer option lines found".to_string(),
            ));
            (lines.join(" "), &[])
        }
    };

    let answers = reconstruct_answers(answer_lines, &mut issues);

    let (community_answer, community_answer_score) = match find_line(&lines, COMMUNITY_MARKER) {
        Some(line) => parse_community_answer(line),
        None => {
            issues.push((
                DiagnosticKind::MissingMarker,
                format!("no '{COMMUNITY_MARKER}' line"),
            ));
            (Vec::new(), String::new())
        }
    };

    let proposed_answer = match find_line(&lines, PROPOSED_MARKER) {
        Some(line) => parse_proposed_answer(line),
        None => {
            issues.push((
                DiagnosticKind::MissingMarker,
                format!("no '{PROPOSED_MARKER}' line"),
            ));
            Vec::new()
        }
    };

    ParsedBlock {
        question: Question {
            question_text: question_text.trim().to_string(),
            answers,
            community_answer,
            proposed_answer,
            community_answer_score,
        },
        issues,
    }
}

fn is_answer_marker(line: &str) -> bool {
    line.starts_with(COMMUNITY_MARKER) || line.starts_with(PROPOSED_MARKER)
}

fn find_line<'a>(lines: &[&'a str], marker: &str) -> Option<&'a str> {
    lines.iter().copied().find(|line| line.starts_with(marker))
}

/// Rebuild option texts, folding wrapped lines into the active option.
fn reconstruct_answers(
    lines: &[&str],
    issues: &mut Vec<(DiagnosticKind, String)>,
) -> IndexMap<Label, String> {
    let mut answers: IndexMap<Label, String> = IndexMap::new();
    let mut active: Option<Label> = None;

    for line in lines {
        if let Some(caps) = OPTION_LINE.captures(line) {
            let label = caps[1].to_string();
            answers.insert(label.clone(), caps[2].to_string());
            active = Some(label);
            continue;
        }

        if OPTION_LOOKALIKE.is_match(line) {
            issues.push((
                DiagnosticKind::MalformedOption,
                format!("line looks like an option but is not one: {line}"),
            ));
        }

        // The section always opens on an option line, so `active` is set here.
        if let Some(text) = active.as_ref().and_then(|label| answers.get_mut(label)) {
            text.push(' ');
            text.push_str(line);
        }
    }

    answers
}

fn parse_community_answer(line: &str) -> (Vec<Label>, String) {
    let Some(caps) = COMMUNITY_VALUE.captures(line) else {
        return (Vec::new(), String::new());
    };

    let raw = caps[1].trim();
    let score = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let labels = if raw.contains(',') {
        raw.split(',').map(|token| token.trim().to_string()).collect()
    } else if COMPACT_LABELS.is_match(raw) {
        raw.chars().map(String::from).collect()
    } else {
        vec![raw.to_string()]
    };

    (labels, score)
}

fn parse_proposed_answer(line: &str) -> Vec<Label> {
    PROPOSED_VALUE
        .captures(line)
        .map(|caps| {
            PROPOSED_SEPARATOR
                .split(&caps[1])
                .map(|token| token.trim().to_string())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPITALS: &str = "\
Question 1
What is the capital of France?
A. Paris
B. London
Answer by the community: B (85%)
Answer proposed: B
";

    fn labels(items: &[&str]) -> Vec<Label> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn extract_single_question() {
        let bank = extract(CAPITALS);
        assert_eq!(bank.len(), 1);

        let q = bank.get(QuestionNumber(1)).unwrap();
        assert_eq!(q.question_text, "What is the capital of France?");
        assert_eq!(
            q.answers.iter().collect::<Vec<_>>(),
            vec![
                (&"A".to_string(), &"Paris".to_string()),
                (&"B".to_string(), &"London".to_string())
            ]
        );
        assert_eq!(q.community_answer, labels(&["B"]));
        assert_eq!(q.community_answer_score, "85%");
        assert_eq!(q.proposed_answer, labels(&["B"]));
    }

    #[test]
    fn multi_line_question_and_wrapped_options() {
        let text = "\
Question 7
A company wants to store logs
for seven years at the lowest cost.
A. Use an archive storage
class with lifecycle rules.
B. Keep everything hot.
C. Delete the logs.
Answer by the community: A (64%)
Answer proposed: A
";
        let q = extract(text).get(QuestionNumber(7)).cloned().unwrap();
        assert_eq!(
            q.question_text,
            "A company wants to store logs for seven years at the lowest cost."
        );
        assert_eq!(
            q.answers["A"],
            "Use an archive storage class with lifecycle rules."
        );
        assert_eq!(q.answers.len(), 3);
        assert_eq!(
            q.answers.keys().cloned().collect::<Vec<_>>(),
            labels(&["A", "B", "C"])
        );
    }

    #[test]
    fn community_compact_notation() {
        let text = "Question 3\nPick two\nA. x\nB. y\nC. z\nAnswer by the community: AC\nAnswer proposed: A, C";
        let q = extract(text).get(QuestionNumber(3)).cloned().unwrap();
        assert_eq!(q.community_answer, labels(&["A", "C"]));
        assert_eq!(q.community_answer_score, "");
        assert_eq!(q.proposed_answer, labels(&["A", "C"]));
    }

    #[test]
    fn community_comma_notation_with_score() {
        let (answers, score) = parse_community_answer("Answer by the community: B, D (51%)");
        assert_eq!(answers, labels(&["B", "D"]));
        assert_eq!(score, "51%");
    }

    #[test]
    fn community_without_value_is_empty() {
        let (answers, score) = parse_community_answer("Answer by the community: none yet");
        assert!(answers.is_empty());
        assert_eq!(score, "");
    }

    #[test]
    fn proposed_answer_splits_on_commas() {
        assert_eq!(
            parse_proposed_answer("Answer proposed: B,D,  E"),
            labels(&["B", "D", "E"])
        );
        assert!(parse_proposed_answer("Answer proposed").is_empty());
    }

    #[test]
    fn block_without_options_keeps_whole_text() {
        let text = "Question 4\nThis block has no options at all.";
        let extraction = extract_with_diagnostics(text);
        let q = extraction.bank.get(QuestionNumber(4)).unwrap();
        assert!(q.answers.is_empty());
        assert!(q.is_degenerate());
        assert_eq!(q.question_text, "This block has no options at all.");
        assert!(q.community_answer.is_empty());
        assert!(q.proposed_answer.is_empty());
        assert!(extraction
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::MissingMarker));
        assert_eq!(extraction.diagnostics.len(), 3);
    }

    #[test]
    fn leading_boilerplate_is_discarded() {
        let text = format!("Exam dump v2\nDownloaded from somewhere\n{CAPITALS}");
        let bank = extract(&text);
        assert_eq!(bank.len(), 1);
        assert_eq!(
            bank.get(QuestionNumber(1)).unwrap().question_text,
            "What is the capital of France?"
        );
    }

    #[test]
    fn count_mismatch_drops_excess_blocks() {
        // The leading fragment starts with the marker word but is not a
        // marker, so it is kept and shifts the pairing by one.
        let text = "Questions follow\nQuestion 1\nFirst?\nA. a\nQuestion 2\nSecond?\nA. b";
        let extraction = extract_with_diagnostics(text);
        assert_eq!(extraction.bank.len(), 2);
        assert_eq!(
            extraction
                .bank
                .get(QuestionNumber(1))
                .unwrap()
                .question_text,
            "Questions follow"
        );
        assert_eq!(
            extraction
                .bank
                .get(QuestionNumber(2))
                .unwrap()
                .question_text,
            "First?"
        );
        assert!(extraction
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::CountMismatch));
    }

    #[test]
    fn source_order_is_kept() {
        let text = "Question 9\nNine\nA. x\nQuestion 2\nTwo\nA. y\nQuestion 5\nFive\nA. z";
        let numbers: Vec<u32> = extract(text).numbers().map(QuestionNumber::get).collect();
        assert_eq!(numbers, vec![9, 2, 5]);
    }

    #[test]
    fn option_after_answer_markers_is_not_an_answer() {
        let text = "Question 1\nQ?\nA. one\nAnswer proposed: A\nB. stray";
        let q = extract(text).get(QuestionNumber(1)).cloned().unwrap();
        assert_eq!(q.answers.len(), 1);
    }

    #[test]
    fn malformed_options_are_reported_not_fatal() {
        let text = "Question 1\nQ?\nA. one\nF. six\nAnswer by the community: A (100%)\nAnswer proposed: A";
        let extraction = extract_with_diagnostics(text);
        let q = extraction.bank.get(QuestionNumber(1)).unwrap();
        assert_eq!(q.answers["A"], "one F. six");
        assert!(extraction
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MalformedOption
                && d.question_number == Some(QuestionNumber(1))));
    }

    #[test]
    fn lenient_and_strict_banks_match() {
        let text = format!("{CAPITALS}\nQuestion 2\nbroken block\nB) nope");
        assert_eq!(extract(&text), extract_with_diagnostics(&text).bank);
    }

    #[test]
    fn never_panics_on_odd_input() {
        for text in [
            "",
            "   ",
            "Question",
            "Question 99999999999999999999\nA. x",
            "Question 1",
            "A. orphan option",
            "Question 1\n\n\nAnswer by the community:\nAnswer proposed:",
            "Question 1\nQ\nA. \u{00e9}t\u{00e9}\nAnswer by the community: \u{00c9}",
        ] {
            let _ = extract_with_diagnostics(text);
        }
        assert!(extract("").is_empty());
        assert!(extract("no markers here").is_empty());
    }

    #[test]
    fn wrapped_option_lines_raise_no_option_diagnostics() {
        let extraction = extract_with_diagnostics(
            "Question 2\nStem\nA. first half\nsecond half\nB. other\n\
             Answer by the community: A\nAnswer proposed: A",
        );
        let q = extraction.bank.get(QuestionNumber(2)).unwrap();
        assert_eq!(q.answers["A"], "first half second half");
        assert!(extraction
            .diagnostics
            .iter()
            .all(|d| d.kind != DiagnosticKind::MalformedOption));
    }

    #[test]
    fn non_ascii_digits_are_not_question_markers() {
        let extraction = extract_with_diagnostics(
            "Question 1\nCompare with Question \u{FF12} in part two\nA. yes\nB. no\nAnswer proposed: A",
        );
        assert_eq!(extraction.bank.len(), 1);
        let q = extraction.bank.get(QuestionNumber(1)).unwrap();
        assert_eq!(q.question_text, "Compare with Question \u{FF12} in part two");
        assert_eq!(q.answers.len(), 2);
        assert_eq!(q.proposed_answer, vec!["A"]);
        assert!(extraction
            .diagnostics
            .iter()
            .all(|d| d.kind != DiagnosticKind::CountMismatch && !d.message.contains("32 bits")));
    }
}
