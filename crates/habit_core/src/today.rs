use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::period::period_start;
use crate::reminder::{Reminder, Repeat};

/// Whether a reminder belongs in the "Today" list. The checks on
/// `last_reset` are deliberately defensive: they hold even if the reset
/// engine has not run yet for the current period.
pub fn is_due_today(reminder: &Reminder, today: NaiveDate) -> bool {
    // Nothing surfaces before its anchor date.
    if today < reminder.date {
        return false;
    }
    match reminder.repeat {
        Repeat::NoRepeat => reminder.date == today,
        Repeat::Daily => reminder.last_reset == period_start(today, Repeat::Daily),
        Repeat::Weekly => {
            reminder.last_reset == period_start(today, Repeat::Weekly)
                && (today - reminder.date).num_days() % 7 == 0
        }
        Repeat::Monthly => today.day() == anchor_day_this_month(reminder.date.day(), today),
    }
}

/// The anchor's day-of-month clamped to the length of the month containing
/// `today`, so a reminder anchored on the 31st fires on the 30th of a
/// 30-day month and on Feb 28/29 instead of never firing.
fn anchor_day_this_month(anchor_day: u32, today: NaiveDate) -> u32 {
    anchor_day.min(days_in_month(today))
}

fn days_in_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    match next_month {
        Some(next) => (next - first).num_days() as u32,
        None => 31,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub total: u32,
    pub completed: u32,
    pub remaining: u32,
}

impl DailyProgress {
    pub fn for_reminders(due: &[Reminder]) -> Self {
        let total: u32 = due.iter().map(|r| r.frequency).sum();
        let completed: u32 = due.iter().map(|r| r.completed_count).sum();
        Self {
            total,
            completed,
            remaining: total.saturating_sub(completed),
        }
    }
}
