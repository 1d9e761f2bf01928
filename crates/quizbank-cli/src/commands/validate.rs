//! The `quizbank validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = quizbank_core::bank::load_bank(&bank_path)
        .with_context(|| format!("failed to load bank: {}", bank_path.display()))?;

    println!("Bank: {} ({} questions)", bank_path.display(), bank.len());

    let warnings = quizbank_core::bank::lint_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question_number
            .map(|n| format!("  [Q{n}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
