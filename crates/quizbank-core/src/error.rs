//! Error types for the boundary operations of quizbank-core.
//!
//! Extraction and grading never fail; only importing a bank from disk and
//! misusing a quiz session produce errors.

use thiserror::Error;

use crate::model::QuestionNumber;

/// Errors raised while importing or exporting a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    /// The bank file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON does not have the question bank shape.
    #[error("invalid question format at '{key}': {reason}")]
    Schema { key: String, reason: String },

    /// The file exceeds the import size limit.
    #[error("file too large ({size} bytes), maximum is {max} bytes")]
    TooLarge { size: u64, max: u64 },
}

/// Errors raised by a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The bank has no questions to practice.
    #[error("the question bank is empty")]
    EmptyBank,

    /// Navigation target outside `1..=total`.
    #[error("question position {position} is out of range (1..={total})")]
    OutOfRange { position: usize, total: usize },

    /// The label is not one of the question's options.
    #[error("question {number} has no option '{label}'")]
    UnknownLabel { number: QuestionNumber, label: String },

    /// More labels selected than the question's answer requires.
    #[error("question {number} accepts at most {max} selection(s)")]
    SelectionLimit { number: QuestionNumber, max: usize },

    /// The question has no proposed answer to grade against.
    #[error("question {number} has no proposed answer and cannot be graded")]
    Ungradable { number: QuestionNumber },
}

impl SessionError {
    /// Returns `true` if the error concerns the user's input rather than the
    /// bank itself.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SessionError::OutOfRange { .. }
                | SessionError::UnknownLabel { .. }
                | SessionError::SelectionLimit { .. }
        )
    }
}
