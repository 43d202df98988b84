use chrono::{Datelike, Duration, NaiveDate};

use crate::reminder::Repeat;

/// Canonical start of the period containing `date` under a recurrence rule.
/// Daily periods start on the day itself, weekly periods on the ISO Monday,
/// monthly periods on the first of the month. `NoRepeat` has no period.
pub fn period_start(date: NaiveDate, repeat: Repeat) -> Option<NaiveDate> {
    match repeat {
        Repeat::NoRepeat => None,
        Repeat::Daily => Some(date),
        Repeat::Weekly => {
            let days_past_monday = date.weekday().num_days_from_monday() as i64;
            Some(date - Duration::days(days_past_monday))
        }
        Repeat::Monthly => date.with_day(1),
    }
}
