//! The `quizbank show` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizbank_core::bank::load_bank;
use quizbank_core::{Question, QuestionBank, QuestionNumber};

pub fn execute(bank_path: PathBuf, number: Option<u32>, json: bool) -> Result<()> {
    let bank = load_bank(&bank_path)
        .with_context(|| format!("failed to load bank: {}", bank_path.display()))?;

    match number {
        Some(n) => {
            let number = QuestionNumber(n);
            let question = bank
                .get(number)
                .with_context(|| format!("question {number} not found in bank"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(question)?);
            } else {
                print!("{}", render_card(number, question));
            }
        }
        None => print_listing(&bank),
    }

    Ok(())
}

fn print_listing(bank: &QuestionBank) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Options", "Answer", "Community"]);

    for (number, question) in bank.iter() {
        table.add_row(vec![
            Cell::new(number),
            Cell::new(truncate(&question.question_text, 60)),
            Cell::new(question.answers.len()),
            Cell::new(question.proposed_answer.join(", ")),
            Cell::new(community_line(question)),
        ]);
    }

    println!("{table}");
    println!("{} question(s)", bank.len());
}

fn render_card(number: QuestionNumber, question: &Question) -> String {
    let mut out = format!("Question {number}\n\n{}\n\n", question.question_text);
    for (label, text) in &question.answers {
        out.push_str(&format!("  {label}. {text}\n"));
    }
    if question.is_degenerate() {
        out.push_str("  (no answer options)\n");
    }
    out.push_str(&format!("\nCommunity answer: {}\n", community_line(question)));
    out.push_str(&format!(
        "Correct answer: {}\n",
        question.proposed_answer.join(", ")
    ));
    out
}

fn community_line(question: &Question) -> String {
    let labels = question.community_answer.join(", ");
    if question.community_answer_score.is_empty() {
        labels
    } else {
        format!("{labels} ({})", question.community_answer_score)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
