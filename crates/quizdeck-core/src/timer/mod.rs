mod countdown;

pub use countdown::{
    Countdown, CountdownState, TimerDisplay, DEFAULT_DURATION_SECS,
    DEFAULT_WARNING_THRESHOLD_SECS,
};
