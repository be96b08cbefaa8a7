use chrono::{NaiveDate, NaiveTime};

/// One user's clock-in/clock-out pair for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub user_id: u64,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub start: NaiveTime,
    pub end: NaiveTime,
}
