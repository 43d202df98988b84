use chrono::NaiveDate;
use tracing::debug;

use crate::period::period_start;
use crate::reminder::{Reminder, Repeat};

/// Roll a reminder's counter over if a new period has begun since its last
/// reset. Returns `Some(updated)` only when something changed, so callers
/// persist exactly when needed; calling again with the same `today` is a
/// no-op.
pub fn reconcile(reminder: &Reminder, today: NaiveDate) -> Option<Reminder> {
    if reminder.repeat == Repeat::NoRepeat {
        return None;
    }
    let current = period_start(today, reminder.repeat);
    if reminder.last_reset == current {
        return None;
    }
    debug!(id = %reminder.id, period = ?current, "rolling counter over into new period");
    let mut updated = reminder.clone();
    updated.completed_count = 0;
    updated.last_reset = current;
    Some(updated)
}

/// Returns whether any counter rolled over, so the caller knows a save is
/// due.
pub fn reconcile_all(reminders: &mut [Reminder], today: NaiveDate) -> bool {
    let mut changed = false;
    for reminder in reminders.iter_mut() {
        if let Some(updated) = reconcile(reminder, today) {
            *reminder = updated;
            changed = true;
        }
    }
    changed
}
