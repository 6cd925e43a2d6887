//! Per-question countdown.
//!
//! Like the rest of the core, the countdown has no internal thread and reads
//! no clock: the caller invokes `tick()` once per second with the current time
//! and acts on the returned events.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Finished
//!           |  ^
//!           v  | start()
//!          Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut countdown = Countdown::new(50, 10);
//! countdown.start(Utc::now());
//! // Once per second:
//! for event in countdown.tick(Utc::now()) { /* render, react to completion */ }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Default per-question duration in seconds.
pub const DEFAULT_DURATION_SECS: u64 = 50;
/// Default remaining time at which the warning fires.
pub const DEFAULT_WARNING_THRESHOLD_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    /// Reached zero; stays here until `start()` or `reset()`.
    Finished,
}

/// Render model for the timer bar and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerDisplay {
    pub remaining_secs: u64,
    pub duration_secs: u64,
    /// 0.0 .. 100.0 share of the duration still remaining.
    pub percent: f64,
    /// True while remaining time is at or below the warning threshold.
    pub warning: bool,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration_secs: u64,
    remaining_secs: u64,
    warning_threshold_secs: u64,
    state: CountdownState,
    /// Warning already emitted in the current cycle.
    warned: bool,
}

impl Countdown {
    pub fn new(duration_secs: u64, warning_threshold_secs: u64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            warning_threshold_secs,
            state: CountdownState::Idle,
            warned: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn warning_threshold_secs(&self) -> u64 {
        self.warning_threshold_secs
    }

    pub fn display(&self) -> TimerDisplay {
        let percent = if self.duration_secs == 0 {
            0.0
        } else {
            self.remaining_secs as f64 / self.duration_secs as f64 * 100.0
        };
        TimerDisplay {
            remaining_secs: self.remaining_secs,
            duration_secs: self.duration_secs,
            percent,
            warning: self.remaining_secs <= self.warning_threshold_secs,
            label: format!("{}s", self.remaining_secs),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh cycle from the full duration.
    pub fn start(&mut self, now: DateTime<Utc>) -> Event {
        self.stop(now);
        self.remaining_secs = self.duration_secs;
        self.warned = false;
        self.state = CountdownState::Running;
        Event::TimerStarted {
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            at: now,
        }
    }

    /// Call once per second. Events come out in display, warning, completion
    /// order; warning and completion never share a tick.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if self.state != CountdownState::Running {
            return Vec::new();
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let mut events = vec![Event::TimerTicked {
            remaining_secs: self.remaining_secs,
            at: now,
        }];

        if self.warning_threshold_secs > 0
            && self.remaining_secs == self.warning_threshold_secs
            && !self.warned
        {
            self.warned = true;
            events.push(Event::TimerWarning {
                remaining_secs: self.remaining_secs,
                at: now,
            });
        }

        if self.remaining_secs == 0 {
            self.state = CountdownState::Finished;
            events.push(Event::TimerCompleted { at: now });
        }

        events
    }

    /// Cancel the running cycle. No-op unless running.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.state = CountdownState::Idle;
        Some(Event::TimerStopped {
            remaining_secs: self.remaining_secs,
            at: now,
        })
    }

    /// Stop and restore the full duration without restarting.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Event {
        self.stop(now);
        self.state = CountdownState::Idle;
        self.remaining_secs = self.duration_secs;
        self.warned = false;
        Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: now,
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS, DEFAULT_WARNING_THRESHOLD_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    fn run_to_end(countdown: &mut Countdown) -> Vec<Event> {
        let mut all = Vec::new();
        for _ in 0..countdown.duration_secs() + 5 {
            all.extend(countdown.tick(now()));
        }
        all
    }

    #[test]
    fn start_emits_full_duration_display() {
        let mut countdown = Countdown::new(50, 10);
        match countdown.start(now()) {
            Event::TimerStarted {
                duration_secs,
                remaining_secs,
                ..
            } => {
                assert_eq!(duration_secs, 50);
                assert_eq!(remaining_secs, 50);
            }
            other => panic!("Expected TimerStarted, got {other:?}"),
        }
        assert!(countdown.is_running());
    }

    #[test]
    fn warning_and_completion_fire_exactly_once() {
        let mut countdown = Countdown::new(50, 10);
        countdown.start(now());
        let events = run_to_end(&mut countdown);

        let warnings: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, Event::TimerWarning { .. }))
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Event::TimerWarning {
                remaining_secs: 10,
                ..
            }
        ));

        let completions = events.iter().filter(|e| e.is_timer_completed()).count();
        assert_eq!(completions, 1);

        // 50 ticks, then nothing.
        let ticks = events
            .iter()
            .filter(|e| matches!(e, Event::TimerTicked { .. }))
            .count();
        assert_eq!(ticks, 50);
        assert_eq!(countdown.state(), CountdownState::Finished);
        assert!(countdown.tick(now()).is_empty());
    }

    #[test]
    fn display_update_precedes_warning_in_a_tick() {
        let mut countdown = Countdown::new(11, 10);
        countdown.start(now());
        let events = countdown.tick(now());
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::TimerTicked { remaining_secs: 10, .. }));
        assert!(matches!(events[1], Event::TimerWarning { .. }));
    }

    #[test]
    fn display_update_precedes_completion_in_a_tick() {
        let mut countdown = Countdown::new(1, 10);
        countdown.start(now());
        let events = countdown.tick(now());
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::TimerTicked { remaining_secs: 0, .. }));
        assert!(events[1].is_timer_completed());
    }

    #[test]
    fn zero_duration_completes_on_first_tick_without_underflow() {
        let mut countdown = Countdown::new(0, 10);
        countdown.start(now());
        let events = countdown.tick(now());
        assert!(matches!(events[0], Event::TimerTicked { remaining_secs: 0, .. }));
        assert!(events[1].is_timer_completed());
        assert_eq!(countdown.remaining_secs(), 0);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut countdown = Countdown::new(50, 10);
        assert!(countdown.stop(now()).is_none());
        countdown.start(now());
        countdown.tick(now());
        assert!(countdown.stop(now()).is_some());
        assert!(countdown.stop(now()).is_none());
        assert!(countdown.tick(now()).is_empty());
        assert_eq!(countdown.remaining_secs(), 49);
    }

    #[test]
    fn reset_restores_duration_without_running() {
        let mut countdown = Countdown::new(30, 10);
        countdown.start(now());
        countdown.tick(now());
        countdown.tick(now());
        let event = countdown.reset(now());
        assert!(matches!(event, Event::TimerReset { remaining_secs: 30, .. }));
        assert_eq!(countdown.state(), CountdownState::Idle);
        assert!(countdown.tick(now()).is_empty());
    }

    #[test]
    fn restart_gives_a_fresh_cycle() {
        let mut countdown = Countdown::new(12, 10);
        countdown.start(now());
        let first = run_to_end(&mut countdown);
        countdown.start(now());
        let second = run_to_end(&mut countdown);
        for events in [first, second] {
            assert_eq!(
                events
                    .iter()
                    .filter(|e| matches!(e, Event::TimerWarning { .. }))
                    .count(),
                1
            );
            assert_eq!(events.iter().filter(|e| e.is_timer_completed()).count(), 1);
        }
    }

    #[test]
    fn events_carry_the_supplied_time() {
        let later = now() + chrono::Duration::seconds(42);
        let mut countdown = Countdown::new(1, 10);
        let started = countdown.start(now());
        let ticked = countdown.tick(later);

        assert!(matches!(started, Event::TimerStarted { at, .. } if at == now()));
        assert_eq!(ticked.len(), 2);
        assert!(ticked.iter().all(|e| matches!(
            e,
            Event::TimerTicked { at, .. } | Event::TimerCompleted { at } if *at == later
        )));
    }

    #[test]
    fn display_marks_warning_zone() {
        let mut countdown = Countdown::new(20, 10);
        countdown.start(now());
        let display = countdown.display();
        assert_eq!(display.label, "20s");
        assert!(!display.warning);
        assert!((display.percent - 100.0).abs() < f64::EPSILON);

        for _ in 0..10 {
            countdown.tick(now());
        }
        let display = countdown.display();
        assert_eq!(display.label, "10s");
        assert!(display.warning);
        assert!((display.percent - 50.0).abs() < f64::EPSILON);
    }
}
