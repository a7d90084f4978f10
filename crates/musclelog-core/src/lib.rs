//! # Musclelog Core Library
//!
//! This library provides the core logic for Musclelog, a personal training
//! log. The `musclelog` CLI is a thin shell over the same library.
//!
//! ## Architecture
//!
//! - **Records**: one [`DayRecord`] per calendar day (trained body parts,
//!   bodyweight, memo) held in a [`RecordStore`] with get-or-default reads
//! - **Weight trend**: [`WeightSeries`] derived from the numeric weights
//! - **Timers**: stopwatch and countdown state machines driven by an
//!   injected [`TickScheduler`]
//! - **Storage**: JSON snapshots in SQLite behind the [`Persistence`] trait,
//!   plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TrainingLog`]: loads, mutates and saves folders and records
//! - [`TimeTracker`]: the two workout timers and their tick tasks
//! - [`Database`]: snapshot persistence
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod folder;
pub mod record;
pub mod storage;
pub mod timer;
pub mod training_log;

pub use calendar::{build_calendar, CalendarCell, ViewMode};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use folder::{Folder, FolderList, MediaItem, MediaKind};
pub use record::{compute_series, BodyPart, DateKey, DayRecord, RecordStore, WeightSeries};
pub use storage::{Config, Database, MemoryStorage, Namespace, Persistence};
pub use timer::{
    format_clock, Countdown, CountdownState, IntervalScheduler, ManualScheduler, Stopwatch,
    StopwatchState, TickScheduler, TimeTracker, TimerKind,
};
pub use training_log::{Notice, TrainingLog};
