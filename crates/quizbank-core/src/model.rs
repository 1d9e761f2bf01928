//! Core data model types for quizbank.
//!
//! These are the types every other part of the workspace exchanges: single
//! questions, question numbers, and the ordered question bank.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An option label, a single uppercase letter such as `"A"`.
pub type Label = String;

/// The fixed, ordered label universe used for grading.
pub const LABEL_UNIVERSE: [char; 5] = ['A', 'B', 'C', 'D', 'E'];

/// A question number as written in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionNumber(pub u32);

impl QuestionNumber {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for QuestionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for QuestionNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid question number: {s}");
        // Canonical decimal only: no sign, padding or leading zeros.
        let canonical = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_digit())
            && (s.len() == 1 || !s.starts_with('0'));
        if !canonical {
            return Err(invalid());
        }
        s.parse::<u32>().map(QuestionNumber).map_err(|_| invalid())
    }
}

impl TryFrom<String> for QuestionNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuestionNumber> for String {
    fn from(value: QuestionNumber) -> Self {
        value.to_string()
    }
}

impl From<u32> for QuestionNumber {
    fn from(value: u32) -> Self {
        QuestionNumber(value)
    }
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt text.
    #[serde(rename = "question")]
    pub question_text: String,
    /// Option label to option text, in source order.
    pub answers: IndexMap<Label, String>,
    /// Crowd-voted answer labels.
    pub community_answer: Vec<Label>,
    /// Canonical answer labels used for grading.
    pub proposed_answer: Vec<Label>,
    /// Confidence annotation for the community answer, e.g. `"85%"`.
    pub community_answer_score: String,
}

impl Question {
    /// How many options a user must select for this question.
    pub fn max_selectable(&self) -> usize {
        self.proposed_answer.len()
    }

    /// A question with no options cannot be practiced.
    pub fn is_degenerate(&self) -> bool {
        self.answers.is_empty()
    }

    /// Whether `label` is one of this question's options.
    pub fn has_option(&self, label: &str) -> bool {
        self.answers.contains_key(label)
    }
}

/// An ordered mapping from question number to question.
///
/// Iteration order is the order questions appeared in the source, which is
/// also the display and navigation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: IndexMap<QuestionNumber, Question>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a question. A repeated number replaces the stored question but
    /// keeps its original position.
    pub fn insert(&mut self, number: QuestionNumber, question: Question) -> Option<Question> {
        self.questions.insert(number, question)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, number: QuestionNumber) -> Option<&Question> {
        self.questions.get(&number)
    }

    /// Look up a question by its 1-based position in bank order.
    pub fn get_by_position(&self, position: usize) -> Option<(QuestionNumber, &Question)> {
        position
            .checked_sub(1)
            .and_then(|idx| self.questions.get_index(idx))
            .map(|(n, q)| (*n, q))
    }

    pub fn numbers(&self) -> impl Iterator<Item = QuestionNumber> + '_ {
        self.questions.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, &Question)> + '_ {
        self.questions.iter().map(|(n, q)| (*n, q))
    }
}

impl FromIterator<(QuestionNumber, Question)> for QuestionBank {
    fn from_iter<I: IntoIterator<Item = (QuestionNumber, Question)>>(iter: I) -> Self {
        Self {
            questions: iter.into_iter().collect(),
        }
    }
}
