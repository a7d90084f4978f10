//! Per-day training records.
//!
//! A [`RecordStore`] maps each calendar day to at most one [`DayRecord`].
//! Days that were never touched are not stored; reading them yields an
//! empty default record instead of an error.
//!
//! Mutators consume the store and return the updated one, so an update is
//! a plain function from `(store, args)` to a new store. Callers that need
//! the previous version clone it before updating.

mod weight;

pub use weight::{
    compute_series, parse_weight, PlotPoint, WeightSample, WeightSeries, MIN_TREND_SAMPLES,
    PLOT_MARGIN,
};

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Canonical `YYYY-MM-DD` identifier of a calendar day.
///
/// Ordering follows the calendar, since it compares the parsed date rather
/// than the string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a canonical `YYYY-MM-DD` key. Non-padded or impossible dates are rejected.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.len() != 10 {
            return Err(ValidationError::InvalidDateKey(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDateKey(s.to_string()))
    }

    /// Today's key in local time.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DateKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Body part that can be stamped on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPart {
    Chest,
    Arms,
    Abs,
    Back,
    Glutes,
    Legs,
}

impl BodyPart {
    /// All parts in display order.
    pub const ALL: [BodyPart; 6] = [
        BodyPart::Chest,
        BodyPart::Arms,
        BodyPart::Abs,
        BodyPart::Back,
        BodyPart::Glutes,
        BodyPart::Legs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BodyPart::Chest => "chest",
            BodyPart::Arms => "arms",
            BodyPart::Abs => "abs",
            BodyPart::Back => "back",
            BodyPart::Glutes => "glutes",
            BodyPart::Legs => "legs",
        }
    }

    /// One-letter marker used in compact calendar cells.
    pub fn marker(&self) -> char {
        match self {
            BodyPart::Chest => 'C',
            BodyPart::Arms => 'R',
            BodyPart::Abs => 'A',
            BodyPart::Back => 'B',
            BodyPart::Glutes => 'G',
            BodyPart::Legs => 'L',
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyPart {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        BodyPart::ALL
            .into_iter()
            .find(|part| part.name() == wanted)
            .ok_or_else(|| ValidationError::UnknownBodyPart(s.to_string()))
    }
}

/// Everything logged for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: DateKey,
    #[serde(default)]
    pub stamps: BTreeSet<BodyPart>,
    /// Raw bodyweight input, kept verbatim even when it is not a number.
    #[serde(
        default,
        deserialize_with = "weight_input",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<String>,
    #[serde(default)]
    pub memo: String,
}

/// Weight as stored: normally a string, but a bare JSON number is accepted
/// and kept in its textual form.
fn weight_input<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stored {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Stored>::deserialize(deserializer)?.map(|stored| match stored {
        Stored::Text(text) => text,
        Stored::Number(n) => n.to_string(),
    }))
}

impl DayRecord {
    pub fn empty(date: DateKey) -> Self {
        Self {
            date,
            stamps: BTreeSet::new(),
            weight: None,
            memo: String::new(),
        }
    }

    pub fn has_stamp(&self, part: BodyPart) -> bool {
        self.stamps.contains(&part)
    }

    /// Bodyweight as a number, if the raw input parses to a finite value.
    pub fn weight_value(&self) -> Option<f64> {
        self.weight.as_deref().and_then(parse_weight)
    }
}

/// Map from day to record. At most one record per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: HashMap<DateKey, DayRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored record for `date`, or an empty one if the day was never touched.
    pub fn get_record(&self, date: DateKey) -> DayRecord {
        self.records
            .get(&date)
            .cloned()
            .unwrap_or_else(|| DayRecord::empty(date))
    }

    /// The stored record only, without synthesizing a default.
    pub fn get(&self, date: DateKey) -> Option<&DayRecord> {
        self.records.get(&date)
    }

    /// Flip `part` for `date`: removed if stamped, added otherwise.
    pub fn toggle_stamp(self, date: DateKey, part: BodyPart) -> Self {
        self.update(date, |record| {
            if !record.stamps.remove(&part) {
                record.stamps.insert(part);
            }
        })
    }

    /// Store the raw weight input verbatim. Invalid numbers are accepted here
    /// and filtered out when the weight series is computed.
    pub fn set_weight(self, date: DateKey, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        self.update(date, |record| record.weight = Some(raw))
    }

    pub fn set_memo(self, date: DateKey, text: impl Into<String>) -> Self {
        let text = text.into();
        self.update(date, |record| record.memo = text)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored records in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &DayRecord> {
        self.records.values()
    }

    fn update(mut self, date: DateKey, apply: impl FnOnce(&mut DayRecord)) -> Self {
        let record = self
            .records
            .entry(date)
            .or_insert_with(|| DayRecord::empty(date));
        apply(record);
        self
    }
}

impl FromIterator<DayRecord> for RecordStore {
    fn from_iter<I: IntoIterator<Item = DayRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|r| (r.date, r)).collect(),
        }
    }
}
