//! quizbank-core: Question extraction, answer grading, and practice sessions.
//!
//! This crate defines the question data model, the best-effort text
//! extractor, the exact-match answer validator, and the quiz session that
//! the rest of quizbank builds on.

pub mod bank;
pub mod error;
pub mod model;
pub mod parser;
pub mod session;
pub mod statistics;
pub mod traits;
pub mod validator;

pub use error::{BankError, SessionError};
pub use model::{Label, Question, QuestionBank, QuestionNumber, LABEL_UNIVERSE};
pub use parser::{extract, extract_with_diagnostics, Diagnostic, DiagnosticKind, Extraction};
pub use validator::validate;
