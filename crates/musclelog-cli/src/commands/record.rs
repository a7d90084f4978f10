use clap::Subcommand;
use musclelog_core::BodyPart;

use super::{date_or_today, open_log, parse_date, report_notices};

fn parse_part(s: &str) -> Result<BodyPart, musclelog_core::ValidationError> {
    s.parse()
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Print the record for a day (an empty record if nothing was logged)
    Show {
        /// Day as YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<musclelog_core::DateKey>,
    },
    /// Toggle a trained body part: chest, arms, abs, back, glutes, legs
    Stamp {
        #[arg(value_parser = parse_part)]
        part: BodyPart,
        #[arg(long, value_parser = parse_date)]
        date: Option<musclelog_core::DateKey>,
    },
    /// Set the bodyweight; non-numeric input is kept but left out of the trend
    Weight {
        #[arg(allow_hyphen_values = true)]
        value: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<musclelog_core::DateKey>,
    },
    /// Replace the memo
    Memo {
        #[arg(allow_hyphen_values = true)]
        text: String,
        #[arg(long, value_parser = parse_date)]
        date: Option<musclelog_core::DateKey>,
    },
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut log = open_log()?;

    let events = match action {
        RecordAction::Show { date } => {
            let record = log.record(date_or_today(date));
            println!("{}", serde_json::to_string_pretty(&record)?);
            return Ok(());
        }
        RecordAction::Stamp { part, date } => log.toggle_stamp(date_or_today(date), part),
        RecordAction::Weight { value, date } => log.set_weight(date_or_today(date), &value),
        RecordAction::Memo { text, date } => log.set_memo(date_or_today(date), &text),
    };

    for event in &events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    report_notices(&mut log);
    Ok(())
}
