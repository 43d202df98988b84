use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::reconcile;
use crate::reminder::{Reminder, ReminderDraft};
use crate::store::{ReminderPatch, ReminderStore};
use crate::today::{is_due_today, DailyProgress};

#[derive(Debug, Clone, Serialize)]
pub struct TodaySnapshot {
    pub reminders: Vec<Reminder>,
    pub progress: DailyProgress,
}

/// Facade the surrounding shell drives. Every mutation is a
/// read-modify-write of the full in-memory list that persists before
/// returning, so views never observe unsaved state.
pub struct ReminderService {
    store: ReminderStore,
    reminders: RwLock<Vec<Reminder>>,
    clock: Box<dyn Clock>,
}

pub struct ReminderServiceBuilder {
    data_dir: Option<PathBuf>,
    clock: Option<Box<dyn Clock>>,
}

impl ReminderServiceBuilder {
    pub fn new() -> Self {
        Self {
            data_dir: None,
            clock: None,
        }
    }

    pub fn data_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Loads the stored list and runs the app-start rollover pass, so no
    /// caller ever sees a stale counter.
    pub fn build(self) -> Result<ReminderService> {
        let data_dir = self.data_dir.ok_or_else(|| anyhow!("data directory not set"))?;
        let store = ReminderStore::new(&data_dir);
        let service = ReminderService {
            reminders: RwLock::new(store.load()?),
            store,
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock)),
        };
        service.reconcile_all()?;
        info!(data_dir = %data_dir.display(), "reminder service ready");
        Ok(service)
    }
}

impl Default for ReminderServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderService {
    pub fn builder() -> ReminderServiceBuilder {
        ReminderServiceBuilder::new()
    }

    fn today_date(&self) -> NaiveDate {
        self.clock.now().date()
    }

    /// Foreground/resume trigger. Idempotent, safe to call redundantly.
    pub fn on_foreground(&self) -> Result<()> {
        self.reconcile_all()
    }

    /// Tab-change / pull-to-refresh trigger.
    pub fn refresh(&self) -> Result<()> {
        self.reconcile_all()
    }

    fn reconcile_all(&self) -> Result<()> {
        let today = self.today_date();
        let mut reminders = self.reminders.write();
        if reconcile::reconcile_all(&mut reminders, today) {
            self.store.save(&reminders)?;
            info!(%today, "reminder counters rolled over");
        }
        Ok(())
    }

    pub fn create(&self, draft: ReminderDraft) -> Result<Reminder> {
        let reminder = Reminder::new(draft, self.clock.now());
        let mut reminders = self.reminders.write();
        reminders.push(reminder.clone());
        self.store.save(&reminders)?;
        info!(id = %reminder.id, title = %reminder.title, "reminder created");
        Ok(reminder)
    }

    pub fn edit(&self, id: Uuid, draft: ReminderDraft) -> Result<Option<Reminder>> {
        let mut reminders = self.reminders.write();
        let Some(existing) = reminders.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        existing.apply_draft(draft);
        let updated = existing.clone();
        self.store.save(&reminders)?;
        Ok(Some(updated))
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        let mut reminders = self.reminders.write();
        let before = reminders.len();
        reminders.retain(|r| r.id != id);
        if reminders.len() != before {
            self.store.save(&reminders)?;
            info!(%id, "reminder deleted");
        }
        Ok(())
    }

    pub fn complete(&self, id: Uuid) -> Result<Option<Reminder>> {
        self.adjust_counter(id, Reminder::increment)
    }

    pub fn uncomplete(&self, id: Uuid) -> Result<Option<Reminder>> {
        self.adjust_counter(id, Reminder::decrement)
    }

    fn adjust_counter(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Reminder),
    ) -> Result<Option<Reminder>> {
        let updated = {
            let mut reminders = self.reminders.write();
            let Some(reminder) = reminders.iter_mut().find(|r| r.id == id) else {
                return Ok(None);
            };
            apply(reminder);
            reminder.clone()
        };
        self.store.patch(
            id,
            ReminderPatch {
                completed_count: Some(updated.completed_count),
                last_reset: None,
            },
        )?;
        Ok(Some(updated))
    }

    /// The due-today list and its progress summary. Callers fire
    /// [`ReminderService::on_foreground`] or [`ReminderService::refresh`]
    /// first when "today" may have changed.
    pub fn today(&self) -> TodaySnapshot {
        let today = self.today_date();
        let reminders = self.reminders.read();
        let mut due: Vec<Reminder> = reminders
            .iter()
            .filter(|r| is_due_today(r, today))
            .cloned()
            .collect();
        due.sort_by_key(|r| Reverse(r.created_at));
        let progress = DailyProgress::for_reminders(&due);
        TodaySnapshot {
            reminders: due,
            progress,
        }
    }

    pub fn all(&self) -> Vec<Reminder> {
        let mut all = self.reminders.read().clone();
        all.sort_by_key(|r| Reverse(r.created_at));
        all
    }

    pub fn get(&self, id: Uuid) -> Option<Reminder> {
        self.reminders.read().iter().find(|r| r.id == id).cloned()
    }
}
