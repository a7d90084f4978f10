pub mod calendar;
pub mod config;
pub mod folder;
pub mod record;
pub mod timer;
pub mod weight;

use musclelog_core::{Config, Database, DateKey, TrainingLog, ValidationError};

/// Open the training log on the on-disk database, honouring the configured quota.
/// Problems found while loading are reported right away.
pub fn open_log() -> Result<TrainingLog<Database>, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open(config.storage.capacity_bytes)?;
    let mut log = TrainingLog::open(db)?;
    report_notices(&mut log);
    Ok(log)
}

/// Print pending save notices. They never change the exit status.
pub fn report_notices(log: &mut TrainingLog<Database>) {
    for notice in log.take_notices() {
        eprintln!("warning: {}", notice.message);
    }
}

/// `--date` value parser.
pub fn parse_date(s: &str) -> Result<DateKey, ValidationError> {
    DateKey::parse(s)
}

/// The given date, or today.
pub fn date_or_today(date: Option<DateKey>) -> DateKey {
    date.unwrap_or_else(DateKey::today)
}
