use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{format_clock, minutes_to_ms, TICK_MS};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    #[default]
    Stopped,
    Running,
    /// Reached zero while running. Needs a restart or reset to leave.
    Finished,
}

/// Count-down timer with a configurable duration.
///
/// ```text
/// Stopped -> Running -> (Stopped | Finished)
/// Finished --start--> Running (remaining refilled to the full duration)
/// ```
///
/// Starting with zero remaining is allowed: the countdown runs and
/// finishes on the very next tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    state: CountdownState,
    initial_ms: u64,
    remaining_ms: u64,
}

impl Countdown {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            state: CountdownState::Stopped,
            initial_ms: duration_ms,
            remaining_ms: duration_ms,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == CountdownState::Finished
    }

    pub fn initial_ms(&self) -> u64 {
        self.initial_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Set a new duration and refill. Allowed from any state; always ends stopped.
    pub fn configure(&mut self, duration_ms: u64) -> Option<Event> {
        self.initial_ms = duration_ms;
        self.remaining_ms = duration_ms;
        self.state = CountdownState::Stopped;
        Some(Event::CountdownConfigured {
            duration_ms,
            at: Utc::now(),
        })
    }

    /// Preset buttons (1/3/5 minutes by default).
    pub fn select_preset(&mut self, minutes: u64) -> Option<Event> {
        self.configure(minutes_to_ms(minutes))
    }

    pub fn start(&mut self) -> Option<Event> {
        let restarted = match self.state {
            CountdownState::Running => return None,
            CountdownState::Stopped => false,
            CountdownState::Finished => {
                // A finished countdown restarts from its full duration.
                self.remaining_ms = self.initial_ms;
                true
            }
        };
        self.state = CountdownState::Running;
        Some(Event::CountdownStarted {
            remaining_ms: self.remaining_ms,
            restarted,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            CountdownState::Running => {
                self.state = CountdownState::Stopped;
                Some(Event::CountdownPaused {
                    remaining_ms: self.remaining_ms,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state = CountdownState::Stopped;
        self.remaining_ms = self.initial_ms;
        Some(Event::CountdownReset {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    /// Advance by one tick. Returns `Some(Event::CountdownFinished)` on the
    /// tick that reaches zero; ignored unless running.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_MS);
        if self.remaining_ms == 0 {
            self.state = CountdownState::Finished;
            return Some(Event::CountdownFinished {
                duration_ms: self.initial_ms,
                at: Utc::now(),
            });
        }
        None
    }
}
