//! Quiz controller.
//!
//! Owns the attempt state, the single live [`Countdown`] and the current
//! selection. Every command returns the events it produced, in order; the
//! presentation layer renders from those and from [`QuizController::view`].
//!
//! The controller is driven, not driving: the caller feeds it user actions and
//! calls `tick()` once per second while a question is on screen.

use chrono::{DateTime, Utc};

use super::progress::{AnswerRecord, QuizProgress};
use super::question::{option_label, Question, QuestionBank, OPTION_COUNT};
use super::report::QuizReport;
use super::scoring::{ExitSummary, QuizSummary};
use super::state::{QuizSettings, QuizState, Screen};
use super::view::{OptionView, QuestionView, View};
use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::storage::{KeyValueStore, PROGRESS_KEY, USER_EMAIL_KEY, USER_NAME_KEY};
use crate::timer::Countdown;

/// Transient correctness signal for the last selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub option_index: usize,
    pub correct: bool,
}

pub struct QuizController<S, C = SystemClock> {
    bank: QuestionBank,
    settings: QuizSettings,
    store: S,
    clock: C,
    state: QuizState,
    progress: QuizProgress,
    selected: Option<usize>,
    feedback: Option<Feedback>,
    /// At most one live countdown; replaced for every question.
    timer: Option<Countdown>,
    question_started_at: Option<DateTime<Utc>>,
}

impl<S: KeyValueStore> QuizController<S, SystemClock> {
    pub fn new(bank: QuestionBank, settings: QuizSettings, store: S) -> Self {
        Self::with_clock(bank, settings, store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> QuizController<S, C> {
    pub fn with_clock(bank: QuestionBank, settings: QuizSettings, store: S, clock: C) -> Self {
        Self {
            bank,
            settings,
            store,
            clock,
            state: QuizState::NotStarted,
            progress: QuizProgress::default(),
            selected: None,
            feedback: None,
            timer: None,
            question_started_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn progress(&self) -> &QuizProgress {
        &self.progress
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    pub fn timer(&self) -> Option<&Countdown> {
        self.timer.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::InProgress { index } => self.bank.get(index),
            _ => None,
        }
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary::compute(&self.progress, self.bank.len(), self.settings.pass_threshold)
    }

    pub fn exit_summary(&self) -> ExitSummary {
        ExitSummary::from_progress(&self.progress)
    }

    pub fn report(&self) -> QuizReport {
        QuizReport::build(&self.bank, &self.progress, self.summary())
    }

    /// Render model for the current screen.
    pub fn view(&self) -> View {
        match self.state {
            QuizState::NotStarted => View::Start,
            QuizState::InProgress { index } => match self.bank.get(index) {
                Some(question) => View::Quiz(self.question_view(index, question)),
                None => View::Start,
            },
            QuizState::Completed => View::End(self.summary()),
            QuizState::ExitedEarly => View::Exit(self.exit_summary()),
            QuizState::ReportView => View::Report(self.report()),
        }
    }

    fn question_view(&self, index: usize, question: &Question) -> QuestionView {
        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(option_index, text)| OptionView {
                label: option_label(option_index),
                text: text.clone(),
                selected: self.selected == Some(option_index),
                feedback: self
                    .feedback
                    .filter(|f| f.option_index == option_index)
                    .map(|f| f.correct),
            })
            .collect();

        QuestionView {
            number: index + 1,
            total: self.bank.len(),
            text: question.text.clone(),
            user_name: self.progress.user_name.clone(),
            user_email: self.progress.user_email.clone(),
            options,
            can_advance: self.selected.is_some(),
            timer: self.timer.as_ref().map(Countdown::display),
        }
    }

    // ── Resume ───────────────────────────────────────────────────────

    /// Read the persisted snapshot. Absent, unreadable, malformed and
    /// inconsistent snapshots all come back as `None`.
    pub fn saved_progress(&self) -> Option<QuizProgress> {
        let raw = match self.store.get(PROGRESS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read saved progress: {}", e);
                return None;
            }
        };

        let progress: QuizProgress = match serde_json::from_str(&raw) {
            Ok(progress) => progress,
            Err(e) => {
                tracing::warn!("Ignoring malformed saved progress: {}", e);
                return None;
            }
        };

        if !progress.is_resumable(&self.bank) {
            tracing::warn!(
                "Ignoring saved progress at question {} that does not match the question bank",
                progress.current_index + 1
            );
            return None;
        }

        Some(progress)
    }

    /// Offer a saved quiz to `confirm`; resume on yes, discard on no.
    pub fn initialize(&mut self, confirm: impl FnOnce(&QuizProgress) -> bool) -> Result<Vec<Event>> {
        let Some(progress) = self.saved_progress() else {
            if self.has_snapshot() {
                return Ok(self.discard_saved());
            }
            return Ok(vec![Event::ScreenChanged {
                screen: self.screen(),
                at: self.clock.now(),
            }]);
        };

        if confirm(&progress) {
            self.resume(progress)
        } else {
            Ok(self.discard_saved())
        }
    }

    /// Re-enter the quiz at the snapshot's question with a fresh timer.
    pub fn resume(&mut self, progress: QuizProgress) -> Result<Vec<Event>> {
        self.require_not_started("resume a quiz")?;
        if !progress.is_resumable(&self.bank) {
            return Err(ValidationError::InvalidValue {
                field: PROGRESS_KEY.into(),
                message: "snapshot does not match the question bank".into(),
            }
            .into());
        }

        tracing::info!(
            "Resuming quiz for {} at question {}",
            progress.user_name,
            progress.current_index + 1
        );
        let mut events = vec![Event::ProgressResumed {
            current_index: progress.current_index,
            score: progress.score,
            at: self.clock.now(),
        }];
        self.progress = progress;
        self.enter_quiz_screen(&mut events)?;
        Ok(events)
    }

    /// Drop the persisted snapshot and stay on the start screen.
    pub fn discard_saved(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.clear_snapshot(&mut events);
        events.push(Event::ScreenChanged {
            screen: self.screen(),
            at: self.clock.now(),
        });
        events
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Submit the start form.
    pub fn start(&mut self, name: &str, email: &str) -> Result<Vec<Event>> {
        self.require_not_started("start a quiz")?;
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name").into());
        }
        if email.is_empty() {
            return Err(ValidationError::EmptyField("email").into());
        }

        for (key, value) in [(USER_NAME_KEY, name), (USER_EMAIL_KEY, email)] {
            if let Err(e) = self.store.set(key, value) {
                tracing::warn!("Could not store {}: {}", key, e);
            }
        }

        tracing::info!("Starting quiz for {} ({} questions)", name, self.bank.len());
        self.progress = QuizProgress::new(name, email);
        let mut events = vec![Event::QuizStarted {
            user_name: name.to_string(),
            total_questions: self.bank.len(),
            at: self.clock.now(),
        }];
        self.enter_quiz_screen(&mut events)?;
        Ok(events)
    }

    /// Mark an option for the current question. Last selection wins.
    pub fn select_option(&mut self, option_index: usize) -> Result<Vec<Event>> {
        let index = self.require_in_progress("select an option")?;
        if option_index >= OPTION_COUNT {
            return Err(ValidationError::OutOfBounds {
                collection: "options".into(),
                index: option_index,
                len: OPTION_COUNT,
            }
            .into());
        }
        let correct = self.question_at(index)?.is_correct(option_index);

        self.selected = Some(option_index);
        self.feedback = Some(Feedback {
            option_index,
            correct,
        });

        Ok(vec![
            Event::OptionSelected {
                question_index: index,
                option_index,
                at: self.clock.now(),
            },
            Event::FeedbackShown {
                option_index,
                correct,
                clear_after_ms: self.settings.feedback_clear_ms,
                at: self.clock.now(),
            },
        ])
    }

    /// Drop the feedback flash for `option_index`. A stale call is a no-op.
    pub fn clear_feedback(&mut self, option_index: usize) -> Vec<Event> {
        match self.feedback {
            Some(f) if f.option_index == option_index => {
                self.feedback = None;
                vec![Event::FeedbackCleared {
                    option_index,
                    at: self.clock.now(),
                }]
            }
            _ => Vec::new(),
        }
    }

    /// Finalize the current question and move on, answered or not.
    pub fn advance(&mut self) -> Result<Vec<Event>> {
        self.require_in_progress("advance")?;
        self.finalize_and_advance(false)
    }

    /// Drive the countdown by one second. On timeout the current question is
    /// finalized exactly as `advance` would.
    pub fn tick(&mut self) -> Result<Vec<Event>> {
        if !matches!(self.state, QuizState::InProgress { .. }) {
            return Ok(Vec::new());
        }
        let now = self.clock.now();
        let Some(timer) = self.timer.as_mut() else {
            return Ok(Vec::new());
        };

        let mut events = timer.tick(now);
        if events.iter().any(Event::is_timer_completed) {
            tracing::debug!("Time is up on question {}", self.progress.current_index + 1);
            events.extend(self.finalize_and_advance(true)?);
        }
        Ok(events)
    }

    /// Leave the quiz early with a partial score.
    pub fn exit(&mut self) -> Result<Vec<Event>> {
        let index = self.require_in_progress("exit")?;
        let mut events = Vec::new();
        self.stop_timer(&mut events);
        let elapsed_secs = self.take_elapsed_secs();
        self.progress.add_elapsed(elapsed_secs);

        // Unanswered in-flight questions leave no record.
        if let Some(selected) = self.selected {
            let record = AnswerRecord::for_question(self.question_at(index)?, Some(selected));
            events.push(self.finalized_event(index, &record, elapsed_secs, false));
            self.progress.record(record);
            self.progress.current_index = index + 1;
        }

        self.timer = None;
        self.selected = None;
        self.feedback = None;
        self.state = QuizState::ExitedEarly;
        self.clear_snapshot(&mut events);

        let summary = self.exit_summary();
        tracing::info!("Quiz exited early with {}", summary);
        events.push(Event::QuizExited {
            score: summary.score,
            answered: summary.answered,
            at: self.clock.now(),
        });
        events.push(Event::ScreenChanged {
            screen: Screen::Exit,
            at: self.clock.now(),
        });
        Ok(events)
    }

    /// Completed -> ReportView.
    pub fn show_report(&mut self) -> Result<Vec<Event>> {
        if self.state != QuizState::Completed {
            return Err(self.invalid("show the report"));
        }
        self.state = QuizState::ReportView;
        Ok(vec![
            Event::ReportShown { at: self.clock.now() },
            Event::ScreenChanged {
                screen: Screen::Report,
                at: self.clock.now(),
            },
        ])
    }

    /// Back to the empty start form from anywhere.
    pub fn go_home(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.stop_timer(&mut events);
        self.timer = None;
        self.question_started_at = None;
        self.selected = None;
        self.feedback = None;
        self.progress = QuizProgress::default();
        self.state = QuizState::NotStarted;
        self.clear_snapshot(&mut events);
        events.push(Event::ReturnedHome { at: self.clock.now() });
        events.push(Event::ScreenChanged {
            screen: Screen::Start,
            at: self.clock.now(),
        });
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finalize_and_advance(&mut self, timed_out: bool) -> Result<Vec<Event>> {
        let index = self.require_in_progress("advance")?;
        let mut events = Vec::new();
        self.stop_timer(&mut events);
        let elapsed_secs = self.take_elapsed_secs();

        let record = AnswerRecord::for_question(self.question_at(index)?, self.selected);
        events.push(self.finalized_event(index, &record, elapsed_secs, timed_out));
        self.progress.add_elapsed(elapsed_secs);
        self.progress.record(record);
        self.progress.current_index = index + 1;
        self.selected = None;
        self.feedback = None;

        if self.progress.current_index >= self.bank.len() {
            self.complete(&mut events);
        } else {
            self.persist(&mut events);
            self.load_question(&mut events)?;
        }
        Ok(events)
    }

    fn complete(&mut self, events: &mut Vec<Event>) {
        self.timer = None;
        self.state = QuizState::Completed;
        self.clear_snapshot(events);

        let summary = self.summary();
        tracing::info!(
            "Quiz completed: {} ({})",
            summary.score_label(),
            if summary.passed { "passed" } else { "failed" }
        );
        events.push(Event::QuizCompleted {
            score: summary.score,
            total: summary.total,
            passed: summary.passed,
            at: self.clock.now(),
        });
        events.push(Event::ScreenChanged {
            screen: Screen::End,
            at: self.clock.now(),
        });
    }

    fn enter_quiz_screen(&mut self, events: &mut Vec<Event>) -> Result<()> {
        self.selected = None;
        self.feedback = None;
        events.push(Event::ScreenChanged {
            screen: Screen::Quiz,
            at: self.clock.now(),
        });
        self.load_question(events)
    }

    /// Show the question at `progress.current_index` and start a fresh timer.
    fn load_question(&mut self, events: &mut Vec<Event>) -> Result<()> {
        let index = self.progress.current_index;
        let question_id = self.question_at(index)?.id;

        self.stop_timer(events);
        self.state = QuizState::InProgress { index };
        events.push(Event::QuestionLoaded {
            question_index: index,
            question_id,
            total_questions: self.bank.len(),
            at: self.clock.now(),
        });

        let mut countdown =
            Countdown::new(self.settings.question_secs, self.settings.warning_threshold_secs);
        events.push(countdown.start(self.clock.now()));
        self.timer = Some(countdown);
        self.question_started_at = Some(self.clock.now());
        tracing::debug!("Loaded question {} of {}", index + 1, self.bank.len());
        Ok(())
    }

    fn stop_timer(&mut self, events: &mut Vec<Event>) {
        let now = self.clock.now();
        if let Some(event) = self.timer.as_mut().and_then(|timer| timer.stop(now)) {
            events.push(event);
        }
    }

    /// Whole seconds since the current question loaded, rounded.
    fn take_elapsed_secs(&mut self) -> u64 {
        match self.question_started_at.take() {
            Some(started) => {
                let ms = (self.clock.now() - started).num_milliseconds().max(0);
                (ms as f64 / 1000.0).round() as u64
            }
            None => 0,
        }
    }

    fn persist(&mut self, events: &mut Vec<Event>) {
        let json = match serde_json::to_string(&self.progress) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Could not encode progress: {}", e);
                return;
            }
        };
        match self.store.set(PROGRESS_KEY, &json) {
            Ok(()) => events.push(Event::ProgressSaved {
                current_index: self.progress.current_index,
                at: self.clock.now(),
            }),
            Err(e) => tracing::warn!("Could not save progress: {}", e),
        }
    }

    fn clear_snapshot(&mut self, events: &mut Vec<Event>) {
        match self.store.remove(PROGRESS_KEY) {
            Ok(()) => events.push(Event::ProgressCleared { at: self.clock.now() }),
            Err(e) => tracing::warn!("Could not clear saved progress: {}", e),
        }
    }

    fn has_snapshot(&self) -> bool {
        matches!(self.store.get(PROGRESS_KEY), Ok(Some(_)))
    }

    fn finalized_event(
        &self,
        index: usize,
        record: &AnswerRecord,
        elapsed_secs: u64,
        timed_out: bool,
    ) -> Event {
        Event::AnswerFinalized {
            question_index: index,
            question_id: record.question_id,
            selected_index: record.selected_index,
            is_correct: record.is_correct,
            elapsed_secs,
            timed_out,
            at: self.clock.now(),
        }
    }

    fn question_at(&self, index: usize) -> Result<&Question, ValidationError> {
        self.bank.get(index).ok_or_else(|| ValidationError::OutOfBounds {
            collection: "questions".into(),
            index,
            len: self.bank.len(),
        })
    }

    fn require_in_progress(&self, action: &'static str) -> Result<usize> {
        match self.state {
            QuizState::InProgress { index } => Ok(index),
            _ => Err(self.invalid(action)),
        }
    }

    fn require_not_started(&self, action: &'static str) -> Result<()> {
        match self.state {
            QuizState::NotStarted => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &'static str) -> CoreError {
        CoreError::InvalidTransition {
            action,
            state: self.state.to_string(),
        }
    }
}
