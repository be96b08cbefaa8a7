use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use crate::error::PresenceError;
use crate::model::attendance::AttendanceRecord;
use crate::model::store::AttendanceStore;
use crate::utils::memoizer::ExpiringMemoizer;

/// Shared, periodically refreshed snapshot of the attendance log.
pub type StoreCache = ExpiringMemoizer<Arc<AttendanceStore>, PresenceError>;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Trims a field and drops one pair of surrounding double quotes.
fn unquote(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

/// Parses one `user_id,date,start,end` line.
///
/// Header and footer lines have a different field count and are rejected
/// like any other malformed row.
pub fn parse_row(line_no: usize, line: &str) -> Result<AttendanceRecord, PresenceError> {
    let malformed = |reason: String| PresenceError::MalformedRecord {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(',').map(unquote).collect();
    let [user_id, date, start, end] = fields.as_slice() else {
        return Err(malformed(format!("expected 4 fields, got {}", fields.len())));
    };

    let user_id = user_id
        .parse::<u64>()
        .map_err(|e| malformed(format!("user id {user_id:?}: {e}")))?;
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| malformed(format!("date {date:?}: {e}")))?;
    let start = NaiveTime::parse_from_str(start, TIME_FORMAT)
        .map_err(|e| malformed(format!("start {start:?}: {e}")))?;
    let end = NaiveTime::parse_from_str(end, TIME_FORMAT)
        .map_err(|e| malformed(format!("end {end:?}: {e}")))?;

    Ok(AttendanceRecord {
        user_id,
        date,
        start,
        end,
    })
}

/// Reads every row, skipping the ones that do not parse.
///
/// Only I/O failures abort the read; a line that is not valid UTF-8 is
/// skipped like any other malformed row.
pub fn read_records<R: BufRead>(
    reader: R,
    source: &str,
) -> Result<Vec<AttendanceRecord>, PresenceError> {
    let mut records = Vec::new();

    for (index, raw) in reader.split(b'\n').enumerate() {
        let raw = raw.map_err(|e| PresenceError::source_unavailable(source, e))?;
        let line_no = index + 1;

        let parsed = std::str::from_utf8(&raw)
            .map_err(|e| PresenceError::MalformedRecord {
                line: line_no,
                reason: e.to_string(),
            })
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    parse_row(line_no, line).map(Some)
                }
            });

        match parsed {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => debug!(error = %e, "Skipping row"),
        }
    }

    Ok(records)
}

/// Loads the attendance CSV and builds a fresh store from it.
pub fn load_store(path: &Path) -> Result<AttendanceStore, PresenceError> {
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| PresenceError::source_unavailable(&source, e))?;

    let records = read_records(BufReader::new(file), &source)?;
    let store = AttendanceStore::build(records);
    if store.is_empty() {
        warn!(path = %source, "Attendance file has no usable rows");
    }

    info!(path = %source, users = store.len(), "Attendance data loaded");
    Ok(store)
}

pub fn store_cache(path: impl Into<PathBuf>, ttl: Duration) -> StoreCache {
    let path = path.into();
    StoreCache::new("attendance_store", ttl, move || load_store(&path).map(Arc::new))
}
