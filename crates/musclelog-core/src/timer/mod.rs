//! Workout timers.
//!
//! Both timers are plain state machines advanced by [`TICK_MS`] per tick.
//! They hold no threads; [`TimeTracker`] pairs them with a [`TickScheduler`]
//! that delivers ticks only while a timer is running.

mod countdown;
mod engine;
mod format;
mod scheduler;
mod stopwatch;

pub use countdown::{Countdown, CountdownState};
pub use engine::TimeTracker;
pub use format::format_clock;
pub use scheduler::{IntervalScheduler, ManualScheduler, TickScheduler, TimerKind};
pub use stopwatch::{Stopwatch, StopwatchState};

use std::time::Duration;

/// Milliseconds added to (or removed from) a running timer on every tick.
pub const TICK_MS: u64 = 10;

/// Tick period matching [`TICK_MS`].
pub const TICK_PERIOD: Duration = Duration::from_millis(TICK_MS);

/// Convert whole minutes to milliseconds without overflowing.
pub fn minutes_to_ms(minutes: u64) -> u64 {
    minutes.saturating_mul(60).saturating_mul(1000)
}
