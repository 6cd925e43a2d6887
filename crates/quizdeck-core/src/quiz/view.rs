//! Render models. Pure data; the presentation layer decides how they look.

use serde::{Deserialize, Serialize};

use super::report::QuizReport;
use super::scoring::{ExitSummary, QuizSummary};
use crate::timer::TimerDisplay;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "lowercase")]
pub enum View {
    /// Empty start form.
    Start,
    Quiz(QuestionView),
    End(QuizSummary),
    Exit(ExitSummary),
    Report(QuizReport),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionView {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub user_name: String,
    pub user_email: String,
    pub options: Vec<OptionView>,
    /// The advance control is enabled once something is selected.
    pub can_advance: bool,
    pub timer: Option<TimerDisplay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub label: char,
    pub text: String,
    pub selected: bool,
    /// Transient correctness flash: `Some(true)` correct, `Some(false)` wrong.
    pub feedback: Option<bool>,
}
