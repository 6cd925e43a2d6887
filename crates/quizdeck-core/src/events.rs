use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::Screen;

/// Every state change in the system produces an Event.
/// The presentation layer renders from them; timer events replace callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Countdown (re)started; doubles as the initial display update.
    TimerStarted {
        duration_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second elapsed on a running countdown.
    TimerTicked {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time reached the warning threshold.
    TimerWarning {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time reached zero; the countdown is now idle.
    TimerCompleted {
        at: DateTime<Utc>,
    },
    TimerStopped {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    QuizStarted {
        user_name: String,
        total_questions: usize,
        at: DateTime<Utc>,
    },
    QuestionLoaded {
        question_index: usize,
        question_id: u32,
        total_questions: usize,
        at: DateTime<Utc>,
    },
    OptionSelected {
        question_index: usize,
        option_index: usize,
        at: DateTime<Utc>,
    },
    /// Transient correctness signal; the surface should call
    /// `clear_feedback` after `clear_after_ms`.
    FeedbackShown {
        option_index: usize,
        correct: bool,
        clear_after_ms: u64,
        at: DateTime<Utc>,
    },
    FeedbackCleared {
        option_index: usize,
        at: DateTime<Utc>,
    },
    AnswerFinalized {
        question_index: usize,
        question_id: u32,
        selected_index: Option<usize>,
        is_correct: bool,
        elapsed_secs: u64,
        timed_out: bool,
        at: DateTime<Utc>,
    },
    ProgressSaved {
        current_index: usize,
        at: DateTime<Utc>,
    },
    ProgressResumed {
        current_index: usize,
        score: usize,
        at: DateTime<Utc>,
    },
    ProgressCleared {
        at: DateTime<Utc>,
    },
    QuizCompleted {
        score: usize,
        total: usize,
        passed: bool,
        at: DateTime<Utc>,
    },
    QuizExited {
        score: usize,
        answered: usize,
        at: DateTime<Utc>,
    },
    ReportShown {
        at: DateTime<Utc>,
    },
    ReturnedHome {
        at: DateTime<Utc>,
    },
    ScreenChanged {
        screen: Screen,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this is the countdown completion signal.
    pub fn is_timer_completed(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
