//! The training log: folders and day records bound to a persistence backend.
//!
//! Every confirmed mutation is followed by a save of the affected
//! namespace. A failed save never undoes the change in memory; it is
//! logged, turned into an [`Event::SaveFailed`], and reported once as a
//! [`Notice`] until a later save of that namespace succeeds.
//!
//! Snapshots are read entry by entry. Entries that no longer parse are
//! skipped, and the stored snapshot is copied to the namespace's backup
//! key before anything can overwrite it.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::calendar::{build_calendar, CalendarCell, ViewMode};
use crate::error::{CoreError, StorageError};
use crate::events::Event;
use crate::folder::{Folder, FolderList};
use crate::record::{compute_series, BodyPart, DateKey, DayRecord, RecordStore, WeightSeries};
use crate::storage::{Namespace, Persistence};

/// Message for the user about data that was not saved or not fully loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub namespace: Namespace,
    pub message: String,
}

pub struct TrainingLog<P: Persistence> {
    folders: FolderList,
    records: RecordStore,
    storage: P,
    notices: Vec<Notice>,
    /// Namespaces whose last save failed and were already reported.
    reported: HashSet<Namespace>,
}

impl<P: Persistence> TrainingLog<P> {
    /// Load both snapshots from `storage`.
    ///
    /// Missing snapshots start from defaults. If a stored snapshot is only
    /// partly readable, the readable entries are loaded, the original text
    /// is kept with [`Persistence::save_backup`], and a [`Notice`] is queued.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read, or if an unreadable
    /// snapshot cannot be set aside.
    pub fn open(mut storage: P) -> Result<Self, StorageError> {
        let mut notices = Vec::new();

        let folders = match storage.load(Namespace::Folders)? {
            Some(raw) => {
                let (folders, complete) = read_entries::<Folder>(Namespace::Folders, &raw);
                if !complete {
                    set_aside(&mut storage, Namespace::Folders, &raw, &mut notices)?;
                }
                folders.into_iter().collect()
            }
            None => FolderList::default(),
        };

        let records = match storage.load(Namespace::Records)? {
            Some(raw) => {
                let (records, complete) = read_entries::<DayRecord>(Namespace::Records, &raw);
                if !complete {
                    set_aside(&mut storage, Namespace::Records, &raw, &mut notices)?;
                }
                records.into_iter().collect()
            }
            None => RecordStore::new(),
        };

        Ok(Self {
            folders,
            records,
            storage,
            notices,
            reported: HashSet::new(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn folders(&self) -> &FolderList {
        &self.folders
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn record(&self, date: DateKey) -> DayRecord {
        self.records.get_record(date)
    }

    pub fn weight_series(&self) -> WeightSeries {
        compute_series(&self.records)
    }

    pub fn calendar(&self, selected: DateKey, mode: ViewMode) -> Vec<CalendarCell> {
        build_calendar(&self.records, selected, mode)
    }

    pub fn storage(&self) -> &P {
        &self.storage
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ── Record commands ──────────────────────────────────────────────

    pub fn toggle_stamp(&mut self, date: DateKey, part: BodyPart) -> Vec<Event> {
        self.records = std::mem::take(&mut self.records).toggle_stamp(date, part);
        let active = self.records.get_record(date).has_stamp(part);
        let event = Event::StampToggled {
            date,
            part,
            active,
            at: Utc::now(),
        };
        self.after_change(Namespace::Records, event)
    }

    pub fn set_weight(&mut self, date: DateKey, raw: &str) -> Vec<Event> {
        self.records = std::mem::take(&mut self.records).set_weight(date, raw);
        let event = Event::WeightSet {
            date,
            raw: raw.to_string(),
            at: Utc::now(),
        };
        self.after_change(Namespace::Records, event)
    }

    pub fn set_memo(&mut self, date: DateKey, text: &str) -> Vec<Event> {
        self.records = std::mem::take(&mut self.records).set_memo(date, text);
        let event = Event::MemoSet {
            date,
            at: Utc::now(),
        };
        self.after_change(Namespace::Records, event)
    }

    // ── Folder commands ──────────────────────────────────────────────
    //
    // Invalid input is an error and changes nothing. Once the change is
    // applied the result is `Ok`, with `Event::SaveFailed` appended when
    // the snapshot could not be written.

    pub fn add_folder(&mut self, name: &str) -> Result<Vec<Event>, CoreError> {
        let folder_id = self.folders.add_folder(name)?;
        let name = self
            .folders
            .get(&folder_id)
            .map(|f| f.name.clone())
            .unwrap_or_default();
        let event = Event::FolderCreated {
            folder_id,
            name,
            at: Utc::now(),
        };
        Ok(self.after_change(Namespace::Folders, event))
    }

    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<Vec<Event>, CoreError> {
        self.folders.rename_folder(folder_id, name)?;
        let event = Event::FolderRenamed {
            folder_id: folder_id.to_string(),
            name: name.trim().to_string(),
            at: Utc::now(),
        };
        Ok(self.after_change(Namespace::Folders, event))
    }

    pub fn add_link(&mut self, folder_id: &str, url: &str) -> Result<Vec<Event>, CoreError> {
        let item = self.folders.add_link(folder_id, url)?;
        let event = Event::MediaAdded {
            folder_id: folder_id.to_string(),
            item_id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind,
            at: Utc::now(),
        };
        Ok(self.after_change(Namespace::Folders, event))
    }

    pub fn add_image(&mut self, folder_id: &str, path: &Path) -> Result<Vec<Event>, CoreError> {
        let item = self.folders.add_image(folder_id, path)?;
        let event = Event::MediaAdded {
            folder_id: folder_id.to_string(),
            item_id: item.id.clone(),
            title: item.title.clone(),
            kind: item.kind,
            at: Utc::now(),
        };
        Ok(self.after_change(Namespace::Folders, event))
    }

    pub fn delete_item(&mut self, folder_id: &str, item_id: &str) -> Result<Vec<Event>, CoreError> {
        let item = self.folders.delete_item(folder_id, item_id)?;
        let event = Event::MediaRemoved {
            folder_id: folder_id.to_string(),
            item_id: item.id,
            at: Utc::now(),
        };
        Ok(self.after_change(Namespace::Folders, event))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn after_change(&mut self, namespace: Namespace, event: Event) -> Vec<Event> {
        tracing::debug!(event = event.name(), %namespace, "state changed");
        let mut events = vec![event];
        events.extend(self.persist(namespace));
        events
    }

    fn persist(&mut self, namespace: Namespace) -> Option<Event> {
        let result = match namespace {
            Namespace::Folders => serde_json::to_string(&self.folders),
            Namespace::Records => serde_json::to_string(&self.records),
        }
        .map_err(CoreError::from)
        .and_then(|snapshot| {
            self.storage
                .save(namespace, &snapshot)
                .map_err(CoreError::from)
        });

        match result {
            Ok(()) => {
                self.reported.remove(&namespace);
                None
            }
            Err(err) => {
                tracing::warn!(%namespace, error = %err, "snapshot not saved");
                if self.reported.insert(namespace) {
                    self.notices.push(Notice {
                        namespace,
                        message: notice_message(&err),
                    });
                }
                Some(Event::SaveFailed {
                    namespace,
                    message: err.to_string(),
                    at: Utc::now(),
                })
            }
        }
    }
}

fn notice_message(err: &CoreError) -> String {
    match err {
        CoreError::Storage(e) if e.is_capacity_exceeded() => {
            "Storage is full. Delete photos you no longer need to free up space; \
             your latest changes are kept until then."
                .to_string()
        }
        other => format!("Could not save your changes: {other}"),
    }
}

/// Parse a snapshot (a JSON object or array) one entry at a time.
///
/// Returns the readable entries and whether every entry was readable.
fn read_entries<T: DeserializeOwned>(namespace: Namespace, raw: &str) -> (Vec<T>, bool) {
    let entries: Vec<(String, Value)> = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        Ok(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Ok(_) => {
            tracing::warn!(%namespace, "snapshot is neither an object nor an array");
            return (Vec::new(), false);
        }
        Err(e) => {
            tracing::warn!(%namespace, error = %e, "snapshot is not valid JSON");
            return (Vec::new(), false);
        }
    };

    let mut complete = true;
    let mut values = Vec::with_capacity(entries.len());
    for (entry, value) in entries {
        match serde_json::from_value(value) {
            Ok(v) => values.push(v),
            Err(e) => {
                tracing::warn!(%namespace, entry, error = %e, "skipping unreadable entry");
                complete = false;
            }
        }
    }
    (values, complete)
}

fn set_aside<P: Persistence>(
    storage: &mut P,
    namespace: Namespace,
    raw: &str,
    notices: &mut Vec<Notice>,
) -> Result<(), StorageError> {
    storage.save_backup(namespace, raw)?;
    notices.push(Notice {
        namespace,
        message: format!(
            "Some saved {namespace} could not be read and were skipped. \
             The original data was kept under '{}'.",
            namespace.backup_key()
        ),
    });
    Ok(())
}
