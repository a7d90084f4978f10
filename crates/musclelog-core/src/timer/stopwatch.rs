use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{format_clock, TICK_MS};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwatchState {
    #[default]
    Stopped,
    Running,
}

/// Count-up timer.
///
/// ```text
/// Stopped <-> Running      reset: any -> Stopped, elapsed = 0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stopwatch {
    state: StopwatchState,
    elapsed_ms: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn display(&self) -> String {
        format_clock(self.elapsed_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            StopwatchState::Running => None,
            StopwatchState::Stopped => {
                self.state = StopwatchState::Running;
                Some(Event::StopwatchStarted {
                    elapsed_ms: self.elapsed_ms,
                    at: Utc::now(),
                })
            }
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            StopwatchState::Stopped => None,
            StopwatchState::Running => {
                self.state = StopwatchState::Stopped;
                Some(Event::StopwatchPaused {
                    elapsed_ms: self.elapsed_ms,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Single play/pause control.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and zero. Allowed while running.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = StopwatchState::Stopped;
        self.elapsed_ms = 0;
        Some(Event::StopwatchReset { at: Utc::now() })
    }

    /// Advance by one tick. Ignored unless running.
    pub fn tick(&mut self) {
        if self.is_running() {
            self.elapsed_ms = self.elapsed_ms.saturating_add(TICK_MS);
        }
    }
}
