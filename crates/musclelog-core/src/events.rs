use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::folder::MediaKind;
use crate::record::{BodyPart, DateKey};
use crate::storage::Namespace;
use crate::timer::TimerKind;

/// Every state change in the system produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StopwatchStarted {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchReset {
        at: DateTime<Utc>,
    },
    CountdownConfigured {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownStarted {
        remaining_ms: u64,
        /// True when the start restarted a finished countdown from its full duration.
        restarted: bool,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time reached zero while running.
    CountdownFinished {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    StampToggled {
        date: DateKey,
        part: BodyPart,
        active: bool,
        at: DateTime<Utc>,
    },
    WeightSet {
        date: DateKey,
        raw: String,
        at: DateTime<Utc>,
    },
    MemoSet {
        date: DateKey,
        at: DateTime<Utc>,
    },
    FolderCreated {
        folder_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    FolderRenamed {
        folder_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    MediaAdded {
        folder_id: String,
        item_id: String,
        title: String,
        kind: MediaKind,
        at: DateTime<Utc>,
    },
    MediaRemoved {
        folder_id: String,
        item_id: String,
        at: DateTime<Utc>,
    },
    /// A snapshot could not be written; in-memory state is unaffected.
    SaveFailed {
        namespace: Namespace,
        message: String,
        at: DateTime<Utc>,
    },
    TimerSnapshot {
        kind: TimerKind,
        /// Elapsed for the stopwatch, remaining for the countdown.
        value_ms: u64,
        display: String,
        running: bool,
        finished: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine name, as used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StopwatchStarted { .. } => "stopwatch_started",
            Event::StopwatchPaused { .. } => "stopwatch_paused",
            Event::StopwatchReset { .. } => "stopwatch_reset",
            Event::CountdownConfigured { .. } => "countdown_configured",
            Event::CountdownStarted { .. } => "countdown_started",
            Event::CountdownPaused { .. } => "countdown_paused",
            Event::CountdownReset { .. } => "countdown_reset",
            Event::CountdownFinished { .. } => "countdown_finished",
            Event::StampToggled { .. } => "stamp_toggled",
            Event::WeightSet { .. } => "weight_set",
            Event::MemoSet { .. } => "memo_set",
            Event::FolderCreated { .. } => "folder_created",
            Event::FolderRenamed { .. } => "folder_renamed",
            Event::MediaAdded { .. } => "media_added",
            Event::MediaRemoved { .. } => "media_removed",
            Event::SaveFailed { .. } => "save_failed",
            Event::TimerSnapshot { .. } => "timer_snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::CountdownFinished {
            duration_ms: 60_000,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CountdownFinished");
        assert_eq!(json["duration_ms"], 60_000);
        assert_eq!(event.name(), "countdown_finished");
    }
}
