use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::period::period_start;

/// Recurrence rule for a reminder. Serialized with the tags the mobile app
/// stored (`"No repeat"`, `"Daily"`, ...); any tag we do not recognize reads
/// back as [`Repeat::NoRepeat`] so stale data can never trigger a reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Repeat {
    #[default]
    NoRepeat,
    Daily,
    Weekly,
    Monthly,
}

impl Repeat {
    pub fn as_str(self) -> &'static str {
        match self {
            Repeat::NoRepeat => "No repeat",
            Repeat::Daily => "Daily",
            Repeat::Weekly => "Weekly",
            Repeat::Monthly => "Monthly",
        }
    }
}

impl From<String> for Repeat {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Daily" => Repeat::Daily,
            "Weekly" => Repeat::Weekly,
            "Monthly" => Repeat::Monthly,
            _ => Repeat::NoRepeat,
        }
    }
}

impl From<Repeat> for String {
    fn from(repeat: Repeat) -> Self {
        repeat.as_str().to_string()
    }
}

/// A recurring or one-off reminder. `date` anchors the recurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub icon: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub repeat: Repeat,
    pub frequency: u32,
    #[serde(default)]
    pub completed_count: u32,
    pub created_at: i64,
    /// Start of the period in which the counter was last zeroed. `None` for
    /// non-repeating reminders and records written before resets existed.
    #[serde(default)]
    pub last_reset: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDraft {
    pub icon: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub repeat: Repeat,
    pub frequency: u32,
}

impl Reminder {
    /// `last_reset` is stamped with the current period so the reset engine
    /// leaves a fresh reminder alone until the period actually rolls over.
    pub fn new(draft: ReminderDraft, now: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            last_reset: period_start(now.date(), draft.repeat),
            icon: draft.icon,
            title: draft.title,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            repeat: draft.repeat,
            frequency: draft.frequency,
            completed_count: 0,
            created_at: now.and_utc().timestamp_millis(),
        }
    }

    pub fn apply_draft(&mut self, draft: ReminderDraft) {
        self.icon = draft.icon;
        self.title = draft.title;
        self.date = draft.date;
        self.start_time = draft.start_time;
        self.end_time = draft.end_time;
        self.repeat = draft.repeat;
        self.frequency = draft.frequency;
        self.completed_count = self.completed_count.min(self.frequency);
    }

    pub fn increment(&mut self) {
        self.completed_count = self.completed_count.saturating_add(1).min(self.frequency);
    }

    pub fn decrement(&mut self) {
        self.completed_count = self.completed_count.saturating_sub(1);
    }

    pub fn is_complete(&self) -> bool {
        self.completed_count >= self.frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(repeat: Repeat, frequency: u32) -> ReminderDraft {
        ReminderDraft {
            icon: "drop.fill".to_string(),
            title: "Drink Water".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start_time: "2024-01-01T09:00:00Z".parse().unwrap(),
            end_time: "2024-01-01T10:00:00Z".parse().unwrap(),
            repeat,
            frequency,
        }
    }

    fn noon(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn new_reminder_starts_at_zero_with_current_period() {
        let reminder = Reminder::new(draft(Repeat::Weekly, 3), noon(2024, 3, 13));
        assert_eq!(reminder.completed_count, 0);
        // 2024-03-13 is a Wednesday; its week starts on Monday the 11th.
        assert_eq!(
            reminder.last_reset,
            Some(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap())
        );
    }

    #[test]
    fn new_no_repeat_reminder_has_no_reset_marker() {
        let reminder = Reminder::new(draft(Repeat::NoRepeat, 1), noon(2024, 3, 13));
        assert_eq!(reminder.last_reset, None);
    }

    #[test]
    fn counter_stays_within_bounds_across_any_tap_sequence() {
        let mut reminder = Reminder::new(draft(Repeat::Daily, 3), noon(2024, 1, 1));
        reminder.decrement();
        assert_eq!(reminder.completed_count, 0);
        for _ in 0..10 {
            reminder.increment();
            assert!(reminder.completed_count <= reminder.frequency);
        }
        assert_eq!(reminder.completed_count, 3);
        assert!(reminder.is_complete());
        for _ in 0..10 {
            reminder.decrement();
        }
        assert_eq!(reminder.completed_count, 0);
    }

    #[test]
    fn counter_clamp_holds_at_the_numeric_limit() {
        // No upper bound is assumed on frequency; the clamp must not
        // overflow once the counter reaches it.
        let mut reminder = Reminder::new(draft(Repeat::Daily, u32::MAX), noon(2024, 1, 1));
        reminder.completed_count = u32::MAX;
        reminder.increment();
        assert_eq!(reminder.completed_count, u32::MAX);
    }

    #[test]
    fn editing_keeps_identity_and_clamps_counter_to_new_target() {
        let mut reminder = Reminder::new(draft(Repeat::Daily, 5), noon(2024, 1, 1));
        let id = reminder.id;
        let created_at = reminder.created_at;
        for _ in 0..5 {
            reminder.increment();
        }

        let mut edited = draft(Repeat::Daily, 2);
        edited.title = "Stretch".to_string();
        reminder.apply_draft(edited);

        assert_eq!(reminder.id, id);
        assert_eq!(reminder.created_at, created_at);
        assert_eq!(reminder.title, "Stretch");
        assert_eq!(reminder.completed_count, 2);
    }

    #[test]
    fn unknown_repeat_tag_reads_back_as_no_repeat() {
        let parsed: Repeat = serde_json::from_str("\"Fortnightly\"").unwrap();
        assert_eq!(parsed, Repeat::NoRepeat);
        let parsed: Repeat = serde_json::from_str("\"Weekly\"").unwrap();
        assert_eq!(parsed, Repeat::Weekly);
    }

    #[test]
    fn serializes_with_the_mobile_app_field_names() {
        let reminder = Reminder::new(draft(Repeat::Daily, 3), noon(2024, 1, 1));
        let json = serde_json::to_string(&reminder).unwrap();
        assert!(json.contains("\"completedCount\""));
        assert!(json.contains("\"lastReset\""));
        assert!(json.contains("\"repeat\":\"Daily\""));

        let roundtrip: Reminder = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, reminder);
    }

    #[test]
    fn reads_records_missing_counter_fields() {
        // Early versions of the app persisted reminders without
        // completedCount or lastReset.
        let json = r#"{
            "id": "6f3b9a44-7a39-4a4e-9cf0-64c0f0a7c9d1",
            "icon": "pencil",
            "title": "Journal",
            "date": "2024-02-05",
            "startTime": "2024-02-05T08:00:00Z",
            "endTime": "2024-02-05T08:30:00Z",
            "repeat": "Daily",
            "frequency": 1,
            "createdAt": 1707120000000
        }"#;
        let reminder: Reminder = serde_json::from_str(json).unwrap();
        assert_eq!(reminder.completed_count, 0);
        assert_eq!(reminder.last_reset, None);
    }
}
