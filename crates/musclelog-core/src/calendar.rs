//! Week and month calendar grids.
//!
//! Weeks start on Monday. A month grid is padded with the neighbouring
//! months' days so it always covers whole weeks.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::record::{BodyPart, DateKey, RecordStore};

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Week,
    Month,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Week => ViewMode::Month,
            ViewMode::Month => ViewMode::Week,
        }
    }
}

/// One day in the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: DateKey,
    /// Whether the day belongs to the selected date's month.
    pub in_month: bool,
    pub selected: bool,
    pub stamps: BTreeSet<BodyPart>,
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

fn end_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(6 - date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new(offset)).unwrap_or(date)
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// First and last day (inclusive) shown for `selected` in `mode`.
pub fn calendar_range(selected: NaiveDate, mode: ViewMode) -> (NaiveDate, NaiveDate) {
    match mode {
        ViewMode::Week => (start_of_week(selected), end_of_week(selected)),
        ViewMode::Month => (
            start_of_week(start_of_month(selected)),
            end_of_week(end_of_month(selected)),
        ),
    }
}

/// Every day of the grid in order.
pub fn calendar_days(selected: NaiveDate, mode: ViewMode) -> Vec<NaiveDate> {
    let (start, end) = calendar_range(selected, mode);
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Grid cells annotated with each day's stamps.
pub fn build_calendar(store: &RecordStore, selected: DateKey, mode: ViewMode) -> Vec<CalendarCell> {
    let sel = selected.date();
    calendar_days(sel, mode)
        .into_iter()
        .map(|day| {
            let date = DateKey::new(day);
            CalendarCell {
                date,
                in_month: day.year() == sel.year() && day.month() == sel.month(),
                selected: day == sel,
                stamps: store
                    .get(date)
                    .map(|r| r.stamps.clone())
                    .unwrap_or_default(),
            }
        })
        .collect()
}
