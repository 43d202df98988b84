use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::reminder::Reminder;

const STORE_FILE: &str = "reminders.json";
const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("reminder storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode reminder data: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    version: u32,
    reminders: Vec<Reminder>,
}

/// JSON-file persistence for the reminder list. The whole list is written
/// on every save; unreadable data degrades to an empty list rather than an
/// error, so a corrupt file never takes the app down.
#[derive(Debug, Clone)]
pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(STORE_FILE),
        }
    }

    pub fn load(&self) -> Result<Vec<Reminder>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if let Ok(state) = serde_json::from_str::<StoredState>(&raw) {
            return Ok(state.reminders);
        }
        // The mobile app persisted a bare array before the versioned
        // envelope existed; accept it and migrate on the next save.
        if let Ok(reminders) = serde_json::from_str::<Vec<Reminder>>(&raw) {
            return Ok(reminders);
        }
        warn!(path = %self.path.display(), "unreadable reminder data, starting empty");
        Ok(Vec::new())
    }

    pub fn save(&self, reminders: &[Reminder]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let state = StoredState {
            version: SCHEMA_VERSION,
            reminders: reminders.to_vec(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&state)?)?;
        Ok(())
    }

    /// Unknown ids are a no-op.
    pub fn patch(&self, id: Uuid, patch: ReminderPatch) -> Result<(), StoreError> {
        let mut reminders = self.load()?;
        match reminders.iter_mut().find(|r| r.id == id) {
            Some(reminder) => patch.apply(reminder),
            None => return Ok(()),
        }
        self.save(&reminders)
    }
}

/// `None` leaves the field alone.
#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    pub completed_count: Option<u32>,
    pub last_reset: Option<NaiveDate>,
}

impl ReminderPatch {
    fn apply(&self, reminder: &mut Reminder) {
        if let Some(count) = self.completed_count {
            reminder.completed_count = count;
        }
        if let Some(marker) = self.last_reset {
            reminder.last_reset = Some(marker);
        }
    }
}
