//! # quizdeck Core Library
//!
//! Core logic for a timed multiple-choice quiz. Like the CLI built on it, the
//! library does no I/O scheduling of its own: callers feed user actions and a
//! once-per-second tick, and render whatever the controller reports.
//!
//! ## Architecture
//!
//! - **Countdown**: per-question timer that emits display, warning and
//!   completion events instead of invoking callbacks
//! - **Quiz Controller**: state machine over start, question, end, exit and
//!   report screens, with scoring and a pure render model
//! - **Storage**: key-value snapshot store (SQLite or in-memory) and TOML
//!   configuration
//!
//! ## Key Components
//!
//! - [`QuizController`]: Quiz state machine
//! - [`Countdown`]: Per-question timer
//! - [`KeyValueStore`]: Snapshot persistence seam
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod quiz;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use quiz::{
    AnswerRecord, ExitSummary, Question, QuestionBank, QuizController, QuizProgress, QuizReport,
    QuizSettings, QuizState, QuizSummary, Screen, View,
};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{Countdown, TimerDisplay};
