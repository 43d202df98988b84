pub mod clock;
pub mod period;
pub mod reconcile;
pub mod reminder;
pub mod service;
pub mod store;
pub mod today;

pub use crate::service::{ReminderService, ReminderServiceBuilder, TodaySnapshot};
