//! Periodic tick sources.
//!
//! A scheduler only decides *when* ticks happen. The owner of the timers
//! applies them through [`TimeTracker::on_tick`](super::TimeTracker::on_tick),
//! one at a time, so a tick's state change is complete before the next one
//! is handled.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Stopwatch,
    Countdown,
}

impl TimerKind {
    pub const ALL: [TimerKind; 2] = [TimerKind::Stopwatch, TimerKind::Countdown];
}

/// Start and cancel a periodic tick task per timer.
pub trait TickScheduler {
    /// Begin ticking `kind` every `period`. Restarts the task if already active.
    fn start(&mut self, kind: TimerKind, period: Duration);

    /// Stop ticking `kind`. Cancelling an inactive timer does nothing.
    fn cancel(&mut self, kind: TimerKind);

    fn is_active(&self, kind: TimerKind) -> bool;
}

/// Scheduler that never fires on its own; tests deliver ticks by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    active: HashSet<TimerKind>,
    starts: usize,
    cancels: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `start` calls so far.
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of `cancel` calls that stopped an active task.
    pub fn cancels(&self) -> usize {
        self.cancels
    }
}

impl TickScheduler for ManualScheduler {
    fn start(&mut self, kind: TimerKind, _period: Duration) {
        self.active.insert(kind);
        self.starts += 1;
    }

    fn cancel(&mut self, kind: TimerKind) {
        if self.active.remove(&kind) {
            self.cancels += 1;
        }
    }

    fn is_active(&self, kind: TimerKind) -> bool {
        self.active.contains(&kind)
    }
}

/// Tokio-backed scheduler: one interval task per running timer, all
/// feeding a single channel.
///
/// Must be used from within a tokio runtime. Dropping the scheduler aborts
/// every task.
#[derive(Debug)]
pub struct IntervalScheduler {
    tx: mpsc::UnboundedSender<TimerKind>,
    tasks: HashMap<TimerKind, JoinHandle<()>>,
}

impl IntervalScheduler {
    /// Create the scheduler and the receiving end of its tick channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerKind>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                tasks: HashMap::new(),
            },
            rx,
        )
    }
}

impl TickScheduler for IntervalScheduler {
    fn start(&mut self, kind: TimerKind, period: Duration) {
        self.cancel(kind);
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(kind).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(?kind, ?period, "tick task started");
        self.tasks.insert(kind, task);
    }

    fn cancel(&mut self, kind: TimerKind) {
        if let Some(task) = self.tasks.remove(&kind) {
            task.abort();
            tracing::debug!(?kind, "tick task cancelled");
        }
    }

    fn is_active(&self, kind: TimerKind) -> bool {
        self.tasks.contains_key(&kind)
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_tracks_active_set() {
        let mut s = ManualScheduler::new();
        s.start(TimerKind::Countdown, Duration::from_millis(10));
        assert!(s.is_active(TimerKind::Countdown));
        assert!(!s.is_active(TimerKind::Stopwatch));
        s.cancel(TimerKind::Countdown);
        s.cancel(TimerKind::Countdown);
        assert!(!s.is_active(TimerKind::Countdown));
        assert_eq!(s.starts(), 1);
        assert_eq!(s.cancels(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_scheduler_delivers_ticks_until_cancelled() {
        let (mut scheduler, mut rx) = IntervalScheduler::new();
        scheduler.start(TimerKind::Stopwatch, Duration::from_millis(10));

        for _ in 0..3 {
            assert_eq!(rx.recv().await, Some(TimerKind::Stopwatch));
        }

        scheduler.cancel(TimerKind::Stopwatch);
        assert!(!scheduler.is_active(TimerKind::Stopwatch));
        tokio::time::sleep(Duration::from_millis(100)).await;
        // Drain anything sent before the abort landed; nothing new arrives after.
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_scheduler_closes_channel() {
        let (mut scheduler, mut rx) = IntervalScheduler::new();
        scheduler.start(TimerKind::Countdown, Duration::from_millis(10));
        drop(scheduler);
        tokio::time::sleep(Duration::from_millis(50)).await;
        while rx.try_recv().is_ok() {}
        assert_eq!(rx.recv().await, None);
    }
}
