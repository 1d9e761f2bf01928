//! JSON import/export of question banks, and bank linting.
//!
//! The interchange format is an object keyed by question-number strings.
//! Imports are checked against that shape before deserializing so that a
//! bad file is reported with the offending key.

use std::path::Path;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::BankError;
use crate::model::{QuestionBank, QuestionNumber};
use crate::validator::is_in_universe;

/// Largest bank file accepted for import.
pub const MAX_BANK_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Load a bank from a JSON file.
pub fn load_bank(path: &Path) -> Result<QuestionBank, BankError> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_BANK_FILE_SIZE {
        return Err(BankError::TooLarge {
            size,
            max: MAX_BANK_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path)?;
    parse_bank_str(&content)
}

/// Parse a bank from its JSON text.
pub fn parse_bank_str(content: &str) -> Result<QuestionBank, BankError> {
    let value: Value = serde_json::from_str(content)?;
    check_schema(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Serialize a bank as pretty-printed JSON.
pub fn to_json_string(bank: &QuestionBank) -> Result<String, BankError> {
    Ok(serde_json::to_string_pretty(bank)?)
}

/// Write a bank to `path`, creating parent directories as needed.
pub fn save_bank(bank: &QuestionBank, path: &Path) -> Result<(), BankError> {
    let json = to_json_string(bank)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, json)?;
    Ok(())
}

/// Default export file name for a given day, e.g. `questions_2025-01-31.json`.
pub fn default_export_name(date: NaiveDate) -> String {
    format!("questions_{}.json", date.format("%Y-%m-%d"))
}

fn schema_error(key: &str, reason: impl Into<String>) -> BankError {
    BankError::Schema {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn check_schema(value: &Value) -> Result<(), BankError> {
    let questions = value
        .as_object()
        .ok_or_else(|| schema_error("$", "top level must be an object"))?;

    for (key, question) in questions {
        key.parse::<QuestionNumber>()
            .map_err(|e| schema_error(key, e))?;

        let question = question
            .as_object()
            .ok_or_else(|| schema_error(key, "question must be an object"))?;

        expect_string(key, question, "question")?;
        expect_string(key, question, "community_answer_score")?;
        expect_string_array(key, question, "community_answer")?;
        expect_string_array(key, question, "proposed_answer")?;

        let answers = question
            .get("answers")
            .and_then(Value::as_object)
            .ok_or_else(|| schema_error(key, "'answers' must be an object"))?;
        if let Some((label, _)) = answers.iter().find(|(_, text)| !text.is_string()) {
            return Err(schema_error(
                key,
                format!("answer '{label}' must be a string"),
            ));
        }
    }

    Ok(())
}

fn expect_string(key: &str, question: &Map<String, Value>, field: &str) -> Result<(), BankError> {
    match question.get(field) {
        Some(Value::String(_)) => Ok(()),
        _ => Err(schema_error(key, format!("'{field}' must be a string"))),
    }
}

fn expect_string_array(
    key: &str,
    question: &Map<String, Value>,
    field: &str,
) -> Result<(), BankError> {
    match question.get(field) {
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => Ok(()),
        _ => Err(schema_error(
            key,
            format!("'{field}' must be an array of strings"),
        )),
    }
}

/// A warning from bank linting.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question number (if applicable).
    pub question_number: Option<QuestionNumber>,
    /// Warning message.
    pub message: String,
}

/// Check a bank for records that will not practice or grade well.
pub fn lint_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            question_number: None,
            message: "bank contains no questions".into(),
        });
    }

    for (number, question) in bank.iter() {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_number: Some(number),
                message,
            })
        };

        if question.question_text.trim().is_empty() {
            warn("question text is empty".into());
        }
        if question.is_degenerate() {
            warn("no answer options".into());
        }
        if question.proposed_answer.is_empty() {
            warn("no proposed answer; question cannot be graded".into());
        }

        // Grading only sees A-E, so anything else silently drops out.
        for label in question.answers.keys() {
            if !is_in_universe(label) {
                warn(format!(
                    "option '{label}' is outside the gradable labels A-E and is ignored when grading"
                ));
            }
        }

        for (field, labels) in [
            ("proposed_answer", &question.proposed_answer),
            ("community_answer", &question.community_answer),
        ] {
            for label in labels {
                if !question.has_option(label) {
                    warn(format!("{field} label '{label}' is not one of the options"));
                }
            }
        }
    }

    warnings
}
