//! Wall-clock source for per-question elapsed time.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Clones share the same instant, so a test can keep one
/// handle and give another to the controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch_ms: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            epoch_ms: Rc::new(Cell::new(start.timestamp_millis())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.epoch_ms.set(self.epoch_ms.get() + by.num_milliseconds());
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.epoch_ms.get()).unwrap_or_default()
    }
}
