use chrono::{Local, NaiveDateTime};

/// Source of "now" for period math, injected so rollover behavior can be
/// driven deterministically in tests. Local wall time: period boundaries
/// (midnight, Monday, the first of the month) are local-time concepts.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
