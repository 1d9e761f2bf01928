//! Interactive practice over a question bank.
//!
//! A session owns a snapshot of the questions it was started with, tracks
//! the user's selection and verdict per question, and grades with
//! [`validate`]. Nothing is persisted once the session is dropped.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::{Label, Question, QuestionBank, QuestionNumber};
use crate::statistics::QuizStats;
use crate::validator::validate;

/// How a session picks its questions.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Shuffle question order.
    pub shuffle: bool,
    /// Practice at most this many questions.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
struct Entry {
    number: QuestionNumber,
    question: Question,
    selection: Vec<Label>,
    verdict: Option<bool>,
}

/// The question currently shown.
#[derive(Debug, Clone, Copy)]
pub struct CurrentQuestion<'a> {
    /// 1-based position within the session.
    pub position: usize,
    pub total: usize,
    pub number: QuestionNumber,
    pub question: &'a Question,
    pub selection: &'a [Label],
    pub verdict: Option<bool>,
}

/// Answer annotations shown when the user asks for the solution.
#[derive(Debug, Clone, Copy)]
pub struct Solution<'a> {
    pub community_answer: &'a [Label],
    pub community_answer_score: &'a str,
    pub proposed_answer: &'a [Label],
}

/// A practice session.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    entries: Vec<Entry>,
    index: usize,
}

impl QuizSession {
    /// Start a session, shuffling with the thread-local RNG if requested.
    pub fn new(bank: &QuestionBank, options: &SessionOptions) -> Result<Self, SessionError> {
        Self::with_rng(bank, options, &mut rand::thread_rng())
    }

    /// Start a session with an explicit RNG (deterministic shuffles in tests).
    pub fn with_rng<R: Rng + ?Sized>(
        bank: &QuestionBank,
        options: &SessionOptions,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let mut entries: Vec<Entry> = bank
            .iter()
            .map(|(number, question)| Entry {
                number,
                question: question.clone(),
                selection: Vec::new(),
                verdict: None,
            })
            .collect();

        if options.shuffle {
            entries.shuffle(rng);
        }
        if let Some(limit) = options.limit {
            entries.truncate(limit);
        }
        if entries.is_empty() {
            return Err(SessionError::EmptyBank);
        }

        tracing::debug!(
            questions = entries.len(),
            shuffle = options.shuffle,
            "quiz session started"
        );

        Ok(Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            entries,
            index: 0,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based position of the current question.
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn current(&self) -> CurrentQuestion<'_> {
        let entry = &self.entries[self.index];
        CurrentQuestion {
            position: self.position(),
            total: self.len(),
            number: entry.number,
            question: &entry.question,
            selection: &entry.selection,
            verdict: entry.verdict,
        }
    }

    /// Move forward; returns `false` at the last question.
    pub fn next_question(&mut self) -> bool {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Move back; returns `false` at the first question.
    pub fn previous_question(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a 1-based position.
    pub fn go_to(&mut self, position: usize) -> Result<(), SessionError> {
        if position == 0 || position > self.entries.len() {
            return Err(SessionError::OutOfRange {
                position,
                total: self.entries.len(),
            });
        }
        self.index = position - 1;
        Ok(())
    }

    /// Toggle `label` in the current selection.
    ///
    /// Changing the selection discards any earlier verdict for the question.
    pub fn select(&mut self, label: &str) -> Result<(), SessionError> {
        let entry = &mut self.entries[self.index];

        if let Some(pos) = entry.selection.iter().position(|l| l == label) {
            entry.selection.remove(pos);
            entry.verdict = None;
            return Ok(());
        }

        if !entry.question.has_option(label) {
            return Err(SessionError::UnknownLabel {
                number: entry.number,
                label: label.to_string(),
            });
        }

        let max = entry.question.max_selectable();
        if entry.selection.len() >= max {
            return Err(SessionError::SelectionLimit {
                number: entry.number,
                max,
            });
        }

        entry.selection.push(label.to_string());
        entry.verdict = None;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        let entry = &mut self.entries[self.index];
        entry.selection.clear();
        entry.verdict = None;
    }

    /// Grade the current selection and record the verdict.
    pub fn submit(&mut self) -> Result<bool, SessionError> {
        let entry = &mut self.entries[self.index];
        if entry.question.proposed_answer.is_empty() {
            return Err(SessionError::Ungradable {
                number: entry.number,
            });
        }

        let correct = validate(&entry.question.proposed_answer, &entry.selection);
        tracing::debug!(number = %entry.number, correct, "answer submitted");
        entry.verdict = Some(correct);
        Ok(correct)
    }

    pub fn reveal(&self) -> Solution<'_> {
        let question = &self.entries[self.index].question;
        Solution {
            community_answer: &question.community_answer,
            community_answer_score: &question.community_answer_score,
            proposed_answer: &question.proposed_answer,
        }
    }

    /// Tally verdicts so far.
    pub fn stats(&self, elapsed: Option<Duration>) -> QuizStats {
        QuizStats::from_verdicts(
            self.entries.iter().map(|e| e.verdict),
            elapsed.map(|d| d.as_secs()),
        )
    }

    /// Wall-clock time since the session started.
    pub fn elapsed(&self) -> Duration {
        (Utc::now() - self.started_at).to_std().unwrap_or_default()
    }
}
