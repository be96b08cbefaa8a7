use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::PresenceError;
use crate::model::attendance::{AttendanceRecord, Presence};

/// Presence entries of a single user, ordered by date.
pub type DatePresence = BTreeMap<NaiveDate, Presence>;

/// Attendance log grouped by user and date.
///
/// Built once from a full record set and never mutated afterwards; a cache
/// refresh replaces the whole store.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AttendanceStore {
    users: BTreeMap<u64, DatePresence>,
}

impl AttendanceStore {
    /// Later records for an existing (user, date) pair overwrite earlier ones.
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AttendanceRecord>,
    {
        let mut users: BTreeMap<u64, DatePresence> = BTreeMap::new();
        for record in records {
            users.entry(record.user_id).or_default().insert(
                record.date,
                Presence {
                    start: record.start,
                    end: record.end,
                },
            );
        }
        Self { users }
    }

    pub fn lookup(&self, user_id: u64) -> Result<&DatePresence, PresenceError> {
        self.users
            .get(&user_id)
            .ok_or(PresenceError::UserNotFound { user_id })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
