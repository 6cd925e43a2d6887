use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timer::{DEFAULT_DURATION_SECS, DEFAULT_WARNING_THRESHOLD_SECS};

/// Controller state.
///
/// ```text
/// NotStarted -> InProgress(0) -> InProgress(1) -> ... -> Completed -> ReportView
///                     |
///                     +-> ExitedEarly
/// any state -> NotStarted (go home)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    NotStarted,
    InProgress { index: usize },
    Completed,
    ExitedEarly,
    ReportView,
}

impl QuizState {
    pub fn screen(self) -> Screen {
        match self {
            QuizState::NotStarted => Screen::Start,
            QuizState::InProgress { .. } => Screen::Quiz,
            QuizState::Completed => Screen::End,
            QuizState::ExitedEarly => Screen::Exit,
            QuizState::ReportView => Screen::Report,
        }
    }
}

impl fmt::Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizState::NotStarted => f.write_str("not started"),
            QuizState::InProgress { index } => write!(f, "on question {}", index + 1),
            QuizState::Completed => f.write_str("completed"),
            QuizState::ExitedEarly => f.write_str("exited early"),
            QuizState::ReportView => f.write_str("viewing the report"),
        }
    }
}

/// Named screens of the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Start,
    Quiz,
    End,
    Exit,
    Report,
}

/// Tunables the controller reads. Built from `Config::settings()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    pub question_secs: u64,
    pub warning_threshold_secs: u64,
    pub pass_threshold: usize,
    pub feedback_clear_ms: u64,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_secs: DEFAULT_DURATION_SECS,
            warning_threshold_secs: DEFAULT_WARNING_THRESHOLD_SECS,
            pass_threshold: 8,
            feedback_clear_ms: 500,
        }
    }
}
