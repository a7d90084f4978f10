//! Integration tests for the training log on the SQLite backend and the
//! timer engine on real tick tasks.

use musclelog_core::{
    BodyPart, Database, DateKey, Event, IntervalScheduler, Namespace, Persistence, TimeTracker,
    TimerKind, TrainingLog, ViewMode,
};
use tempfile::TempDir;

fn key(s: &str) -> DateKey {
    DateKey::parse(s).unwrap()
}

#[test]
fn records_and_folders_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("musclelog.db");

    {
        let db = Database::open_at(&path, 1024 * 1024).unwrap();
        let mut log = TrainingLog::open(db).unwrap();
        let d = key("2024-03-04");
        log.toggle_stamp(d, BodyPart::Back);
        log.toggle_stamp(d, BodyPart::Glutes);
        log.set_weight(d, " 68.5 ");
        log.set_memo(d, "deadlift 100kg");
        log.rename_folder("f2", "Back and glutes").unwrap();
        assert!(log.take_notices().is_empty());
    }

    let db = Database::open_at(&path, 1024 * 1024).unwrap();
    let log = TrainingLog::open(db).unwrap();
    let record = log.record(key("2024-03-04"));
    assert_eq!(
        record.stamps.iter().copied().collect::<Vec<_>>(),
        vec![BodyPart::Back, BodyPart::Glutes]
    );
    assert_eq!(log.weight_series().latest().map(|s| s.weight), Some(68.5));
    assert_eq!(log.folders().get("f2").unwrap().name, "Back and glutes");

    let week = log.calendar(key("2024-03-06"), ViewMode::Week);
    assert!(week[0].stamps.contains(&BodyPart::Back));
}

#[test]
fn full_database_reports_once_and_keeps_edits() {
    let dir = TempDir::new().unwrap();
    let db = Database::open_at(&dir.path().join("small.db"), 200).unwrap();
    let mut log = TrainingLog::open(db).unwrap();
    let d = key("2024-03-04");

    let events = log.set_memo(d, &"m".repeat(300));
    match events.last() {
        Some(Event::SaveFailed { namespace, .. }) => assert_eq!(*namespace, Namespace::Records),
        other => panic!("expected SaveFailed, got {other:?}"),
    }
    log.toggle_stamp(d, BodyPart::Chest);

    assert_eq!(log.take_notices().len(), 1);
    assert_eq!(log.record(d).memo.len(), 300);
    assert!(log.record(d).has_stamp(BodyPart::Chest));
}

#[test]
fn bad_entry_on_disk_does_not_cost_the_history() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("musclelog.db");
    let raw = r#"{"2024-01-01":{"date":"2024-01-01","memo":"bench"},"2024-01-02":{"date":"2024-01-02","weight":70},"bad":{"memo":"x"}}"#;
    {
        let mut db = Database::open_at(&path, 1024 * 1024).unwrap();
        db.save(Namespace::Records, raw).unwrap();
    }

    {
        let db = Database::open_at(&path, 1024 * 1024).unwrap();
        let mut log = TrainingLog::open(db).unwrap();
        assert_eq!(log.take_notices().len(), 1);
        log.set_memo(key("2024-02-01"), "new");
    }

    let db = Database::open_at(&path, 1024 * 1024).unwrap();
    assert_eq!(db.load_backup(Namespace::Records).unwrap().as_deref(), Some(raw));
    let mut log = TrainingLog::open(db).unwrap();
    assert!(log.take_notices().is_empty());
    assert_eq!(log.records().len(), 3);
    assert_eq!(log.record(key("2024-01-01")).memo, "bench");
    assert_eq!(log.weight_series().latest().map(|s| s.weight), Some(70.0));
}

#[tokio::test(start_paused = true)]
async fn countdown_and_stopwatch_tick_independently() {
    let (scheduler, mut ticks) = IntervalScheduler::new();
    let mut tracker = TimeTracker::new(scheduler, 1_000);
    tracker.start_countdown();
    tracker.start_stopwatch();

    let mut finished = false;
    while !finished {
        let kind = ticks.recv().await.unwrap();
        if let Some(Event::CountdownFinished { duration_ms, .. }) = tracker.on_tick(kind) {
            assert_eq!(duration_ms, 1_000);
            finished = true;
        }
    }

    assert_eq!(tracker.display(TimerKind::Countdown), "00:00.00");
    assert!(!tracker.is_running(TimerKind::Countdown));
    assert!(tracker.is_running(TimerKind::Stopwatch));
    assert!(tracker.stopwatch().elapsed_ms() > 0);
}
