//! Final and partial score summaries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::progress::QuizProgress;

/// Result of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: usize,
    pub total: usize,
    pub passed: bool,
    /// round(score / total * 100)
    pub percentage: u32,
    /// round(total seconds / timed questions), 0 when nothing was timed.
    pub average_secs: u64,
    pub total_secs: u64,
}

impl QuizSummary {
    pub fn compute(progress: &QuizProgress, total: usize, pass_threshold: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (progress.score as f64 / total as f64 * 100.0).round() as u32
        };
        let timed = progress.per_question_seconds.len();
        let average_secs = if timed == 0 {
            0
        } else {
            (progress.total_elapsed_seconds as f64 / timed as f64).round() as u64
        };

        Self {
            score: progress.score,
            total,
            passed: progress.score >= pass_threshold,
            percentage,
            average_secs,
            total_secs: progress.total_elapsed_seconds,
        }
    }

    /// `"score/total"`.
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }

    pub fn total_time_label(&self) -> String {
        format_duration(self.total_secs)
    }
}

/// Partial result after leaving a quiz early. The denominator is the number
/// of questions actually finalized, not the quiz length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSummary {
    pub score: usize,
    pub answered: usize,
}

impl ExitSummary {
    pub fn from_progress(progress: &QuizProgress) -> Self {
        Self {
            score: progress.score,
            answered: progress.answers.len(),
        }
    }
}

impl fmt::Display for ExitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.answered)
    }
}

/// `"2m 5s"` from one minute up, `"45s"` below.
pub fn format_duration(secs: u64) -> String {
    let minutes = secs / 60;
    if minutes > 0 {
        format!("{minutes}m {}s", secs % 60)
    } else {
        format!("{secs}s")
    }
}
