//! End-of-quiz statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome counts for one practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStats {
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Wrong answers, including unanswered questions.
    pub wrong_answers: usize,
    pub unanswered: usize,
    #[serde(default)]
    pub time_elapsed_secs: Option<u64>,
}

impl QuizStats {
    /// Tally per-question verdicts; `None` means the question was never
    /// submitted.
    pub fn from_verdicts<I>(verdicts: I, time_elapsed_secs: Option<u64>) -> Self
    where
        I: IntoIterator<Item = Option<bool>>,
    {
        let mut stats = QuizStats {
            total_questions: 0,
            correct_answers: 0,
            wrong_answers: 0,
            unanswered: 0,
            time_elapsed_secs,
        };

        for verdict in verdicts {
            stats.total_questions += 1;
            match verdict {
                Some(true) => stats.correct_answers += 1,
                Some(false) => stats.wrong_answers += 1,
                None => {
                    stats.unanswered += 1;
                    stats.wrong_answers += 1;
                }
            }
        }

        stats
    }

    /// Score as a whole percentage, rounded to nearest; 0 for an empty quiz.
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.correct_answers as f64 / self.total_questions as f64 * 100.0).round() as u32
    }

    pub fn performance(&self) -> Performance {
        Performance::from_percentage(self.percentage())
    }

    /// Format the stats as a short markdown summary.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {}% ({})\n\n",
            self.percentage(),
            self.performance()
        ));
        md.push_str("| Correct | Wrong | Unanswered | Total |\n");
        md.push_str("|---------|-------|------------|-------|\n");
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            self.correct_answers, self.wrong_answers, self.unanswered, self.total_questions
        ));

        if let Some(secs) = self.time_elapsed_secs {
            md.push_str(&format!("\n**Time elapsed:** {}\n", format_elapsed(secs)));
        }

        md
    }
}

/// Performance band for a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Performance {
    Excellent,
    Great,
    Good,
    KeepPracticing,
}

impl Performance {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Performance::Excellent,
            75..=89 => Performance::Great,
            60..=74 => Performance::Good,
            _ => Performance::KeepPracticing,
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Performance::Excellent => write!(f, "Excellent!"),
            Performance::Great => write!(f, "Great job!"),
            Performance::Good => write!(f, "Good effort!"),
            Performance::KeepPracticing => write!(f, "Keep practicing!"),
        }
    }
}

/// Render seconds as `"{minutes}m {seconds}s"`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_unanswered_as_wrong() {
        let stats = QuizStats::from_verdicts([Some(true), Some(false), None, Some(true)], None);
        assert_eq!(stats.total_questions, 4);
        assert_eq!(stats.correct_answers, 2);
        assert_eq!(stats.wrong_answers, 2);
        assert_eq!(stats.unanswered, 1);
    }

    #[test]
    fn percentage_rounds() {
        let stats = QuizStats::from_verdicts([Some(true), Some(true), Some(false)], None);
        assert_eq!(stats.percentage(), 67);
        let stats = QuizStats::from_verdicts([Some(true), Some(false), Some(false)], None);
        assert_eq!(stats.percentage(), 33);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let stats = QuizStats::from_verdicts(std::iter::empty(), None);
        assert_eq!(stats.percentage(), 0);
        assert_eq!(stats.performance(), Performance::KeepPracticing);
    }

    #[test]
    fn performance_bands() {
        assert_eq!(Performance::from_percentage(100), Performance::Excellent);
        assert_eq!(Performance::from_percentage(90), Performance::Excellent);
        assert_eq!(Performance::from_percentage(89), Performance::Great);
        assert_eq!(Performance::from_percentage(75), Performance::Great);
        assert_eq!(Performance::from_percentage(60), Performance::Good);
        assert_eq!(Performance::from_percentage(59), Performance::KeepPracticing);
    }

    #[test]
    fn elapsed_format() {
        assert_eq!(format_elapsed(0), "0m 0s");
        assert_eq!(format_elapsed(125), "2m 5s");
    }

    #[test]
    fn markdown_summary() {
        let stats = QuizStats::from_verdicts([Some(true); 9].into_iter().chain([None]), Some(61));
        let md = stats.to_markdown();
        assert!(md.contains("90% (Excellent!)"), "{md}");
        assert!(md.contains("| 9 | 1 | 1 | 10 |"));
        assert!(md.contains("1m 1s"));
    }
}
