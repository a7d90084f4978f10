//! Timer engine pairing the two workout timers with a tick scheduler.
//!
//! The engine keeps the scheduler in step with the timers: after every
//! command or tick, a timer that is running has an active tick task and a
//! timer that is not running has none. Dropping the engine cancels both.
//!
//! ## Usage
//!
//! ```ignore
//! let (scheduler, mut ticks) = IntervalScheduler::new();
//! let mut tracker = TimeTracker::new(scheduler, 60_000);
//! tracker.start_countdown();
//! while let Some(kind) = ticks.recv().await {
//!     if let Some(event) = tracker.on_tick(kind) { /* finished */ }
//! }
//! ```

use chrono::Utc;

use super::{Countdown, Stopwatch, TickScheduler, TimerKind, TICK_PERIOD};
use crate::events::Event;

pub struct TimeTracker<S: TickScheduler> {
    stopwatch: Stopwatch,
    countdown: Countdown,
    scheduler: S,
}

impl<S: TickScheduler> TimeTracker<S> {
    /// Both timers stopped; the countdown is set to `countdown_ms`.
    pub fn new(scheduler: S, countdown_ms: u64) -> Self {
        Self {
            stopwatch: Stopwatch::new(),
            countdown: Countdown::new(countdown_ms),
            scheduler,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_running(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Stopwatch => self.stopwatch.is_running(),
            TimerKind::Countdown => self.countdown.is_running(),
        }
    }

    pub fn display(&self, kind: TimerKind) -> String {
        match kind {
            TimerKind::Stopwatch => self.stopwatch.display(),
            TimerKind::Countdown => self.countdown.display(),
        }
    }

    pub fn snapshot(&self, kind: TimerKind) -> Event {
        let (value_ms, finished) = match kind {
            TimerKind::Stopwatch => (self.stopwatch.elapsed_ms(), false),
            TimerKind::Countdown => (self.countdown.remaining_ms(), self.countdown.is_finished()),
        };
        Event::TimerSnapshot {
            kind,
            value_ms,
            display: self.display(kind),
            running: self.is_running(kind),
            finished,
            at: Utc::now(),
        }
    }

    // ── Stopwatch commands ───────────────────────────────────────────

    pub fn start_stopwatch(&mut self) -> Option<Event> {
        let event = self.stopwatch.start();
        self.sync(TimerKind::Stopwatch, event)
    }

    pub fn pause_stopwatch(&mut self) -> Option<Event> {
        let event = self.stopwatch.pause();
        self.sync(TimerKind::Stopwatch, event)
    }

    pub fn toggle_stopwatch(&mut self) -> Option<Event> {
        let event = self.stopwatch.toggle();
        self.sync(TimerKind::Stopwatch, event)
    }

    pub fn reset_stopwatch(&mut self) -> Option<Event> {
        let event = self.stopwatch.reset();
        self.sync(TimerKind::Stopwatch, event)
    }

    // ── Countdown commands ───────────────────────────────────────────

    pub fn configure_countdown(&mut self, duration_ms: u64) -> Option<Event> {
        let event = self.countdown.configure(duration_ms);
        self.sync(TimerKind::Countdown, event)
    }

    pub fn select_preset(&mut self, minutes: u64) -> Option<Event> {
        let event = self.countdown.select_preset(minutes);
        self.sync(TimerKind::Countdown, event)
    }

    pub fn start_countdown(&mut self) -> Option<Event> {
        let event = self.countdown.start();
        self.sync(TimerKind::Countdown, event)
    }

    pub fn pause_countdown(&mut self) -> Option<Event> {
        let event = self.countdown.pause();
        self.sync(TimerKind::Countdown, event)
    }

    pub fn toggle_countdown(&mut self) -> Option<Event> {
        let event = self.countdown.toggle();
        self.sync(TimerKind::Countdown, event)
    }

    pub fn reset_countdown(&mut self) -> Option<Event> {
        let event = self.countdown.reset();
        self.sync(TimerKind::Countdown, event)
    }

    // ── Ticks ────────────────────────────────────────────────────────

    /// Apply one tick to `kind`. Ticks for a timer that is not running
    /// (for example one already queued when it was paused) are dropped.
    ///
    /// Returns `Some(Event::CountdownFinished)` on the tick that empties
    /// the countdown.
    pub fn on_tick(&mut self, kind: TimerKind) -> Option<Event> {
        let event = match kind {
            TimerKind::Stopwatch => {
                self.stopwatch.tick();
                None
            }
            TimerKind::Countdown => self.countdown.tick(),
        };
        self.sync(kind, event)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn sync(&mut self, kind: TimerKind, event: Option<Event>) -> Option<Event> {
        let running = self.is_running(kind);
        let active = self.scheduler.is_active(kind);
        if running && !active {
            self.scheduler.start(kind, TICK_PERIOD);
        } else if !running && active {
            self.scheduler.cancel(kind);
        }
        if let Some(ref e) = event {
            tracing::debug!(event = e.name(), ?kind, "timer transition");
        }
        event
    }
}

impl<S: TickScheduler> Drop for TimeTracker<S> {
    fn drop(&mut self) {
        for kind in TimerKind::ALL {
            if self.scheduler.is_active(kind) {
                self.scheduler.cancel(kind);
            }
        }
    }
}
